//! Core data types for Clyde package management.
//!
//! This module provides the fundamental types used throughout Clyde:
//! - Version types for semantic versioning
//! - Constraint and range types for version requirements
//! - Package identity types (type, scoped names)

pub mod package;
pub mod range;
pub mod version;

// Re-export all public types
pub use package::{PackageName, PackageType};
pub use range::{Constraint, Op, VersionRange};
pub use version::Version;
