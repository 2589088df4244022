//! # clyde-core
//!
//! Core types and utilities shared across all Clyde crates.
//!
//! This crate provides:
//! - Version, Constraint and VersionRange types for semantic versioning
//! - PackageType and package-name helpers for scoped `@org/name` packages
//! - ClydeError enum for unified error handling
//! - Path utilities used when walking on-disk dependency trees
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (Version, Constraint, VersionRange, etc.)
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{ClydeError, ClydeResult};
pub use types::{Constraint, Op, PackageName, PackageType, Version, VersionRange};
