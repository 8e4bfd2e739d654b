use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tree::{ConfigNode, ConfigRoot};

/// Block kind a well-known section is expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Object,
    Table,
}

impl SectionKind {
    fn of(node: &ConfigNode) -> Option<Self> {
        match node {
            ConfigNode::Object(_) | ConfigNode::Root(_) => Some(Self::Object),
            ConfigNode::Table(_) => Some(Self::Table),
            ConfigNode::Set(_) | ConfigNode::Unset(_) => None,
        }
    }
}

impl Display for SectionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => write!(f, "object"),
            Self::Table => write!(f, "table"),
        }
    }
}

/// A known top-level section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KnownSection {
    pub name: String,
    pub kind: SectionKind,
    #[serde(default)]
    pub note: String,
}

/// A section present in a configuration with a different kind than expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionMismatch {
    pub name: String,
    pub expected: SectionKind,
    pub found: &'static str,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    section: Vec<KnownSection>,
}

/// Errors returned when loading catalog files.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read section catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse section catalog {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Well-known sections and their expected kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionCatalog {
    sections: Vec<KnownSection>,
}

impl SectionCatalog {
    pub fn new(sections: Vec<KnownSection>) -> Self {
        Self { sections }
    }

    /// Load a catalog from a TOML file of `[[section]]` tables.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw, path.display().to_string())
    }

    /// Parse catalog TOML; `origin` names the source in errors.
    pub fn from_toml(raw: &str, origin: String) -> Result<Self, CatalogError> {
        let parsed: CatalogFile = toml::from_str(raw).map_err(|source| CatalogError::Parse {
            path: origin,
            source,
        })?;
        Ok(Self::new(parsed.section))
    }

    pub fn sections(&self) -> &[KnownSection] {
        &self.sections
    }

    pub fn get(&self, name: &str) -> Option<&KnownSection> {
        let wanted: Vec<&str> = name.split_whitespace().collect();
        self.sections
            .iter()
            .find(|s| s.name.split_whitespace().eq(wanted.iter().copied()))
    }

    /// Sections of `root` whose kind differs from the catalog.
    pub fn check(&self, root: &ConfigRoot) -> Vec<SectionMismatch> {
        root.sections(None)
            .filter_map(|(name, node)| {
                let known = self.get(name)?;
                let kind = SectionKind::of(node)?;
                (kind != known.kind).then(|| SectionMismatch {
                    name: name.to_string(),
                    expected: known.kind,
                    found: node.kind(),
                })
            })
            .collect()
    }
}

impl Default for SectionCatalog {
    /// The catalog shipped with the crate.
    fn default() -> Self {
        let embedded = include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/catalog/sections.toml"
        ));
        match Self::from_toml(embedded, "embedded catalog".to_string()) {
            Ok(catalog) if !catalog.sections.is_empty() => catalog,
            _ => fallback_catalog(),
        }
    }
}

fn fallback_catalog() -> SectionCatalog {
    SectionCatalog::new(vec![
        KnownSection {
            name: "system global".to_string(),
            kind: SectionKind::Object,
            note: "device-wide settings".to_string(),
        },
        KnownSection {
            name: "system interface".to_string(),
            kind: SectionKind::Table,
            note: "interfaces keyed by name".to_string(),
        },
        KnownSection {
            name: "firewall policy".to_string(),
            kind: SectionKind::Table,
            note: "policies keyed by id".to_string(),
        },
    ])
}
