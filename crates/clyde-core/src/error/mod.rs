//! Error types and result aliases for Clyde operations.
//!
//! Provides a unified error type that covers version parsing, manifest
//! loading and dependency graph construction with actionable messages.

use thiserror::Error;

/// Unified error type for all Clyde operations
#[derive(Error, Debug)]
pub enum ClydeError {
    // Version errors
    #[error("Invalid version format: '{input}'")]
    InvalidVersionFormat { input: String },

    #[error("Invalid version constraint '{input}': {reason}")]
    InvalidConstraintFormat { input: String, reason: String },

    // Manifest errors
    #[error("No manifest found in {path}")]
    ManifestNotFound { path: String },

    #[error("Failed to parse manifest {path}: {message}")]
    ManifestParse { path: String, message: String },

    #[error("Manifest field '{field}' is invalid: {reason}")]
    ManifestValidation { field: String, reason: String },

    #[error("Package at {path} is named '{found}', expected '{expected}'")]
    PackageNameMismatch {
        expected: String,
        found: String,
        path: String,
    },

    // Resolution errors
    #[error(
        "Dependency '{name}' required by '{required_by}' not found (tried: {})",
        .tried.join(", ")
    )]
    DependencyNotFound {
        name: String,
        required_by: String,
        tried: Vec<String>,
    },

    #[error("Package '{name}' is not part of the dependency graph")]
    PackageNotRegistered { name: String },

    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Clyde operations
pub type ClydeResult<T> = Result<T, ClydeError>;

impl ClydeError {
    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Create a constraint error for the given input
    pub fn constraint(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConstraintFormat {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ClydeError::InvalidVersionFormat { .. } => {
                Some("Versions must look like MAJOR.MINOR.PATCH, e.g. 1.2.3 or 1.2.3-beta.1")
            },
            ClydeError::InvalidConstraintFormat { .. } => {
                Some("Use an operator (^ ~ = > < >= <=) followed by a full version, e.g. ^1.2.3")
            },
            ClydeError::ManifestNotFound { .. } => {
                Some("Create a clyde.toml with a [package] section in the package directory")
            },
            ClydeError::DependencyNotFound { .. } => {
                Some("Run 'clyde install' to populate deps/, or check the local: path")
            },
            ClydeError::PackageNameMismatch { .. } => {
                Some("The installed copy does not match its directory; reinstall the dependency")
            },
            ClydeError::CircularDependency { .. } => {
                Some("Remove circular dependencies by restructuring your packages")
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_not_found_lists_paths() {
        let err = ClydeError::DependencyNotFound {
            name: "zlib".to_string(),
            required_by: "app".to_string(),
            tried: vec![
                "/proj/deps/zlib (missing)".to_string(),
                "/proj/app/deps/zlib (missing)".to_string(),
            ],
        };

        let message = err.to_string();
        assert!(message.contains("'zlib'"));
        assert!(message.contains("/proj/deps/zlib (missing), /proj/app/deps/zlib (missing)"));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_circular_dependency_message() {
        let err = ClydeError::CircularDependency {
            cycle: "a -> b -> a".to_string(),
        };
        assert_eq!(err.to_string(), "Circular dependency detected: a -> b -> a");
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error;

        let err = ClydeError::io(
            "Failed to read clyde.toml".to_string(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.source().is_some());
        assert!(err.suggestion().is_none());
    }
}
