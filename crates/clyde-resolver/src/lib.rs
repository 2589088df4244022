//! Dependency resolution engine for Clyde
//!
//! This crate selects concrete versions from candidate lists and builds the
//! package graph of an on-disk project, detecting cycles and producing a
//! dependency-first build order for C and C++ packages.

pub mod graph;
pub mod semver;

// Re-export main types
pub use graph::{DependencyNode, DependencyResolver, GraphEdge, GraphExport, GraphNode};
pub use semver::VersionResolver;

use clyde_core::error::ClydeError;

/// Result type for resolver operations
pub type ResolverResult<T> = Result<T, ClydeError>;
