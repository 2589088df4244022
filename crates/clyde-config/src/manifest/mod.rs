//! clyde.toml manifest parsing and serialization

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use clyde_core::error::ClydeError;
use clyde_core::types::{PackageName, PackageType, Version, VersionRange};

use crate::ConfigResult;

/// Complete clyde.toml manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Package metadata section
    pub package: PackageSection,

    /// Build and runtime requirements (name -> spec)
    #[serde(default)]
    pub requires: IndexMap<String, String>,

    /// Development-only requirements, not walked by the resolver
    #[serde(default, rename = "dev-requires")]
    pub dev_requires: IndexMap<String, String>,

    /// Free-form build traits
    #[serde(default)]
    pub traits: IndexMap<String, String>,

    /// Build variants, each possibly adding requirements
    #[serde(default)]
    pub variants: IndexMap<String, VariantSection>,
}

/// Package metadata section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name, `name` or `@organization/name` (required)
    pub name: String,

    /// Package version (required)
    pub version: Version,

    /// Package kind
    #[serde(default, rename = "type")]
    pub package_type: PackageType,

    /// Source language (c, cpp, cxx, c++)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Source files
    #[serde(default)]
    pub sources: Vec<String>,

    /// Package description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Build variant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantSection {
    /// Requirements added when the variant is built
    #[serde(default)]
    pub requires: IndexMap<String, String>,

    /// Traits overriding the package traits
    #[serde(default)]
    pub traits: IndexMap<String, String>,
}

/// Parsed requirement spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// `local:<path>`, relative to the requiring package
    Local(Utf8PathBuf),
    /// Version range resolved against the deps/ cache
    Range(VersionRange),
}

const LANGUAGES: [&str; 4] = ["c", "cpp", "cxx", "c++"];

impl Requirement {
    /// Prefix marking a path dependency
    pub const LOCAL_PREFIX: &'static str = "local:";

    /// Parse a requirement spec string
    pub fn parse(spec: &str) -> ConfigResult<Self> {
        match spec.strip_prefix(Self::LOCAL_PREFIX) {
            Some(path) if path.trim().is_empty() => {
                Err(ClydeError::constraint(spec, "local: requires a path"))
            },
            Some(path) => Ok(Requirement::Local(Utf8PathBuf::from(path.trim()))),
            None => Ok(Requirement::Range(VersionRange::parse(spec)?)),
        }
    }

    /// Check if this is a path dependency
    pub fn is_local(&self) -> bool {
        matches!(self, Requirement::Local(_))
    }
}

impl Manifest {
    /// Create a manifest with only the required fields
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            package: PackageSection {
                name: name.into(),
                version,
                package_type: PackageType::default(),
                language: None,
                sources: Vec::new(),
                description: None,
            },
            requires: IndexMap::new(),
            dev_requires: IndexMap::new(),
            traits: IndexMap::new(),
            variants: IndexMap::new(),
        }
    }

    /// Add a requirement, builder style
    pub fn with_requirement(mut self, name: impl Into<String>, spec: impl Into<String>) -> Self {
        self.requires.insert(name.into(), spec.into());
        self
    }

    /// Declared requirements: own `requires` merged with every variant's.
    ///
    /// Variant entries override same-named package entries.
    pub fn declared_requirements(&self) -> IndexMap<&str, &str> {
        let mut declared: IndexMap<&str, &str> = self
            .requires
            .iter()
            .map(|(name, spec)| (name.as_str(), spec.as_str()))
            .collect();

        for variant in self.variants.values() {
            for (name, spec) in &variant.requires {
                declared.insert(name.as_str(), spec.as_str());
            }
        }

        declared
    }
}

/// Parse TOML string to Manifest
pub fn parse_manifest(content: &str) -> ConfigResult<Manifest> {
    // First try with toml_edit for better error reporting
    content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| ClydeError::ManifestParse {
            path: "<input>".to_string(),
            message: format!("TOML syntax error: {}", e),
        })?;

    // Then parse with serde for type safety
    let manifest: Manifest = toml::from_str(content).map_err(|e| ClydeError::ManifestParse {
        path: "<input>".to_string(),
        message: e.to_string(),
    })?;

    validate_manifest(&manifest)?;

    Ok(manifest)
}

/// Load and parse a manifest file
pub fn load_from_file(path: &Utf8Path) -> ConfigResult<Manifest> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ClydeError::io(format!("Failed to read {}", path), e))?;

    parse_manifest(&content).map_err(|e| match e {
        ClydeError::ManifestParse { message, .. } => ClydeError::ManifestParse {
            path: path.to_string(),
            message,
        },
        ClydeError::ManifestValidation { field, reason } => ClydeError::ManifestValidation {
            field,
            reason: format!("{} (in {})", reason, path),
        },
        other => other,
    })
}

/// Serialize Manifest to TOML string
pub fn serialize_manifest(manifest: &Manifest) -> ConfigResult<String> {
    toml::to_string_pretty(manifest).map_err(|e| ClydeError::ManifestParse {
        path: "<output>".to_string(),
        message: format!("TOML serialization error: {}", e),
    })
}

/// Validate manifest completeness
pub fn validate_manifest(manifest: &Manifest) -> ConfigResult<()> {
    PackageName::parse(&manifest.package.name)?;

    if let Some(language) = &manifest.package.language {
        if !LANGUAGES.contains(&language.to_ascii_lowercase().as_str()) {
            return Err(ClydeError::ManifestValidation {
                field: "package.language".to_string(),
                reason: format!("'{}' is not one of {}", language, LANGUAGES.join(", ")),
            });
        }
    }

    validate_requirements("requires", &manifest.requires)?;
    validate_requirements("dev-requires", &manifest.dev_requires)?;

    for (variant, section) in &manifest.variants {
        validate_requirements(&format!("variants.{}.requires", variant), &section.requires)?;
    }

    Ok(())
}

fn validate_requirements(table: &str, requires: &IndexMap<String, String>) -> ConfigResult<()> {
    for (name, spec) in requires {
        let field = format!("{}.{}", table, name);

        let parsed = Requirement::parse(spec).map_err(|e| ClydeError::ManifestValidation {
            field: field.clone(),
            reason: e.to_string(),
        })?;

        // Path dependencies are registered under their key, which may be any label
        if !parsed.is_local() && !PackageName::is_valid(name) {
            return Err(ClydeError::ManifestValidation {
                field,
                reason: format!("'{}' is not a valid package name", name),
            });
        }
    }

    Ok(())
}
