//! Loaded package handle: a directory plus its parsed manifest

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};

use clyde_core::error::ClydeError;
use clyde_core::types::{PackageName, PackageType, Version};
use clyde_core::utils::normalize_path;

use crate::loader::ManifestLoader;
use crate::manifest::{load_from_file, Manifest, Requirement};
use crate::ConfigResult;

/// A package on disk
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    path: Utf8PathBuf,
    name: PackageName,
    manifest: Manifest,
}

impl Package {
    /// Create a package handle from an already parsed manifest
    pub fn new(path: impl Into<Utf8PathBuf>, manifest: Manifest) -> ConfigResult<Self> {
        let name = PackageName::parse(&manifest.package.name)?;
        Ok(Self {
            path: normalize_path(&path.into()),
            name,
            manifest,
        })
    }

    /// Load the package in `dir`
    pub fn load(dir: &Utf8Path) -> ConfigResult<Self> {
        let manifest_path =
            ManifestLoader::find_manifest(dir).ok_or_else(|| ClydeError::ManifestNotFound {
                path: dir.to_string(),
            })?;

        debug!("Loading manifest {}", manifest_path);
        let manifest = load_from_file(&manifest_path)?;
        Self::new(dir, manifest)
    }

    /// Load the package in `dir`, requiring it to be named `expected`
    pub fn load_expecting(dir: &Utf8Path, expected: &str) -> ConfigResult<Self> {
        let package = Self::load(dir)?;

        if package.name() != expected {
            warn!(
                "Package at {} is named '{}', expected '{}'",
                dir,
                package.name(),
                expected
            );
            return Err(ClydeError::PackageNameMismatch {
                expected: expected.to_string(),
                found: package.name().to_string(),
                path: dir.to_string(),
            });
        }

        Ok(package)
    }

    /// Package directory
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Parsed manifest
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Name as declared in the manifest
    pub fn name(&self) -> &str {
        &self.manifest.package.name
    }

    /// Parsed name
    pub fn package_name(&self) -> &PackageName {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.manifest.package.version
    }

    pub fn package_type(&self) -> PackageType {
        self.manifest.package.package_type
    }

    /// Organization of a scoped package
    pub fn organization(&self) -> Option<&str> {
        self.name.organization()
    }

    /// Declared requirements parsed into [`Requirement`]s, in manifest order.
    ///
    /// Variant requirements are merged in and override same-named entries.
    pub fn requirements(&self) -> ConfigResult<Vec<(String, Requirement)>> {
        self.manifest
            .declared_requirements()
            .into_iter()
            .map(|(name, spec)| {
                let requirement =
                    Requirement::parse(spec).map_err(|e| ClydeError::ManifestValidation {
                        field: format!("requires.{}", name),
                        reason: format!("{} (in {})", e, self.path),
                    })?;
                Ok((name.to_string(), requirement))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    fn write_manifest(dir: &Utf8Path, body: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("clyde.toml"), body).unwrap();
    }

    #[test]
    fn test_load_package() {
        let temp = TempDir::new().unwrap();
        let root = utf8(&temp);
        write_manifest(
            &root,
            r#"
[package]
name = "@org1/lib1"
version = "1.0.0"
type = "library"

[requires]
"@org2/lib2" = "^2.0.0"
"#,
        );

        let package = Package::load(&root).unwrap();
        assert_eq!(package.name(), "@org1/lib1");
        assert_eq!(package.organization(), Some("org1"));
        assert_eq!(package.version(), &Version::new(1, 0, 0));
        assert_eq!(package.package_type(), PackageType::Library);
        assert_eq!(package.path(), root.as_path());

        let requirements = package.requirements().unwrap();
        assert_eq!(requirements.len(), 1);
        assert_eq!(requirements[0].0, "@org2/lib2");
        assert!(!requirements[0].1.is_local());
    }

    #[test]
    fn test_load_missing_manifest() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            Package::load(&utf8(&temp)),
            Err(ClydeError::ManifestNotFound { .. })
        ));
    }

    #[test]
    fn test_load_expecting_mismatch() {
        let temp = TempDir::new().unwrap();
        let root = utf8(&temp);
        write_manifest(&root, "[package]\nname = \"lib2\"\nversion = \"1.0.0\"\n");

        assert!(Package::load_expecting(&root, "lib2").is_ok());
        match Package::load_expecting(&root, "@org2/lib2") {
            Err(ClydeError::PackageNameMismatch { expected, found, .. }) => {
                assert_eq!(expected, "@org2/lib2");
                assert_eq!(found, "lib2");
            },
            other => panic!("expected name mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_path_is_normalized() {
        let manifest = Manifest::new("app", Version::new(0, 1, 0));
        let package = Package::new("/work/app/../app/./", manifest).unwrap();
        assert_eq!(package.path(), Utf8Path::new("/work/app"));
    }
}
