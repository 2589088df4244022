//! Clyde benchmarking suite
//!
//! Benchmarks for version parsing and selection, manifest parsing, and
//! dependency graph construction and traversal.

pub mod common;

pub use common::*;
