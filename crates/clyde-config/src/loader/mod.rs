//! Manifest discovery on disk

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use clyde_core::error::ClydeError;

use crate::package::Package;
use crate::ConfigResult;

/// Manifest filenames, in lookup order
pub const MANIFEST_FILES: [&str; 2] = ["clyde.toml", "package.toml"];

/// Locates and loads the package a command operates on
pub struct ManifestLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
}

impl ManifestLoader {
    /// Create a new manifest loader
    pub fn new(cwd: impl Into<Utf8PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    /// Manifest file inside `dir`, if any
    pub fn find_manifest(dir: &Utf8Path) -> Option<Utf8PathBuf> {
        MANIFEST_FILES
            .iter()
            .map(|file| dir.join(file))
            .find(|path| path.is_file())
    }

    /// Find the nearest directory holding a manifest (walks up directory tree)
    pub fn resolve_project_root(&self) -> Option<Utf8PathBuf> {
        let mut current = self.cwd.as_path();

        loop {
            if Self::find_manifest(current).is_some() {
                return Some(current.to_path_buf());
            }

            // Move up one directory
            match current.parent() {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    /// Load the project containing the working directory
    pub fn load_project(&self) -> ConfigResult<Package> {
        let root = self
            .resolve_project_root()
            .ok_or_else(|| ClydeError::ManifestNotFound {
                path: format!("{} or any parent directory", self.cwd),
            })?;

        debug!("Project root: {}", root);
        Package::load(&root)
    }
}
