//! Package identity types.
//!
//! Defines the package kind and the `[@org/]name` naming scheme used to lay
//! dependencies out in the `deps/` cache.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ClydeError, ClydeResult};

/// Kind of package being built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    /// Static library linked into dependents
    #[default]
    Library,
    /// Executable
    Application,
    /// Package with its own build system
    Foreign,
}

/// Parsed package name, optionally scoped to an organization
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName {
    organization: Option<String>,
    name: String,
}

impl PackageType {
    /// Lowercase name as written in manifests
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Library => "library",
            PackageType::Application => "application",
            PackageType::Foreign => "foreign",
        }
    }
}

impl FromStr for PackageType {
    type Err = ClydeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "library" => Ok(PackageType::Library),
            "application" => Ok(PackageType::Application),
            "foreign" => Ok(PackageType::Foreign),
            _ => Err(ClydeError::ManifestValidation {
                field: "type".to_string(),
                reason: format!("'{}' is not one of library, application, foreign", s),
            }),
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PackageName {
    /// Parse `name` or `@org/name`
    pub fn parse(input: &str) -> ClydeResult<Self> {
        let invalid = || ClydeError::ManifestValidation {
            field: "name".to_string(),
            reason: format!(
                "'{}' must be [A-Za-z0-9_-]+, optionally scoped as @organization/name",
                input
            ),
        };

        let (organization, name) = match input.strip_prefix('@') {
            Some(scoped) => {
                let (org, name) = scoped.split_once('/').ok_or_else(invalid)?;
                (Some(org), name)
            },
            None => (None, input),
        };

        if !organization.map_or(true, is_valid_segment) || !is_valid_segment(name) {
            return Err(invalid());
        }

        Ok(Self {
            organization: organization.map(str::to_string),
            name: name.to_string(),
        })
    }

    /// Check if a package name is valid
    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    /// Organization of a scoped name, without the `@`
    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    /// Unscoped package name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if this name carries an `@organization/` scope
    pub fn is_scoped(&self) -> bool {
        self.organization.is_some()
    }

    /// Location relative to a `deps/` directory: `@org/name` or `name`
    pub fn cache_path(&self) -> Utf8PathBuf {
        match &self.organization {
            Some(org) => Utf8PathBuf::from(format!("@{}", org)).join(&self.name),
            None => Utf8PathBuf::from(&self.name),
        }
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl FromStr for PackageName {
    type Err = ClydeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.organization {
            Some(org) => write!(f, "@{}/{}", org, self.name),
            None => f.write_str(&self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_type_parsing() {
        assert_eq!("library".parse::<PackageType>().unwrap(), PackageType::Library);
        assert_eq!("Application".parse::<PackageType>().unwrap(), PackageType::Application);
        assert_eq!("FOREIGN".parse::<PackageType>().unwrap(), PackageType::Foreign);
        assert!("plugin".parse::<PackageType>().is_err());
        assert_eq!(PackageType::default(), PackageType::Library);
    }

    #[test]
    fn test_unscoped_name() {
        let name = PackageName::parse("zlib-ng").unwrap();
        assert_eq!(name.organization(), None);
        assert_eq!(name.name(), "zlib-ng");
        assert!(!name.is_scoped());
        assert_eq!(name.cache_path(), Utf8PathBuf::from("zlib-ng"));
        assert_eq!(name.to_string(), "zlib-ng");
    }

    #[test]
    fn test_scoped_name() {
        let name = PackageName::parse("@org1/lib_1").unwrap();
        assert_eq!(name.organization(), Some("org1"));
        assert_eq!(name.name(), "lib_1");
        assert!(name.is_scoped());
        assert_eq!(name.cache_path(), Utf8PathBuf::from("@org1").join("lib_1"));
        assert_eq!(name.to_string(), "@org1/lib_1");
    }

    #[test]
    fn test_invalid_names() {
        for input in ["", "@", "@org", "@org/", "@/pkg", "org/pkg", "@org/pkg/extra", "has space", "dots.bad", "@o rg/pkg"] {
            assert!(!PackageName::is_valid(input), "expected '{}' to be rejected", input);
        }
    }
}
