//! Catalog metadata and construction options.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Tag identifying which source representation a catalog was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    /// Rows already in the canonical schema.
    Native,
    /// Big-endian rupture records from a merged ensemble file.
    SyntheticBinary,
    /// Events returned by an external catalog feed.
    ExternalService,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Native => "native",
            SourceFormat::SyntheticBinary => "synthetic-binary",
            SourceFormat::ExternalService => "external-service",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional metadata supplied when a catalog is constructed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogOptions {
    pub name: Option<String>,
    /// Ensemble-member identifier.
    pub catalog_id: Option<String>,
    pub filename: Option<PathBuf>,
    /// Section format version, for catalogs decoded from an ensemble file.
    pub format_version: Option<i16>,
}

impl CatalogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_id(mut self, catalog_id: impl Into<String>) -> Self {
        self.catalog_id = Some(catalog_id.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_format_version(mut self, version: i16) -> Self {
        self.format_version = Some(version);
        self
    }
}

/// Metadata carried by every catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogMetadata {
    pub name: Option<String>,
    pub catalog_id: Option<String>,
    pub format: SourceFormat,
    pub filename: Option<PathBuf>,
    pub format_version: Option<i16>,
}

impl CatalogMetadata {
    pub fn from_options(format: SourceFormat, options: CatalogOptions) -> Self {
        Self {
            name: options.name,
            catalog_id: options.catalog_id,
            format,
            filename: options.filename,
            format_version: options.format_version,
        }
    }

    /// Name for display, falling back to the member id and then the format tag.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.catalog_id.as_deref())
            .unwrap_or_else(|| self.format.as_str())
    }
}
