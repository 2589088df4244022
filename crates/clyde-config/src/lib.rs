//! Manifest parsing and package loading for Clyde
//!
//! This crate handles parsing and validation of `clyde.toml` manifests and
//! turns a package directory into the [`Package`] handle the dependency
//! resolver walks.

pub mod loader;
pub mod manifest;
pub mod package;

// Re-export main types
pub use loader::{ManifestLoader, MANIFEST_FILES};
pub use manifest::{Manifest, PackageSection, Requirement, VariantSection};
pub use package::Package;

use clyde_core::error::ClydeError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ClydeError>;
