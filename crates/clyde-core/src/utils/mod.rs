//! Utility functions and helpers.
//!
//! Common functionality used across multiple Clyde crates.

pub mod path;

// Re-export commonly used utilities
pub use path::{cache_root, normalize_path, DEPS_DIR};
