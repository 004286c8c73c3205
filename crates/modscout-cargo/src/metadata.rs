//! `cargo metadata` output, used when crate sources are not found on disk.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{CargoError, Result};

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<MetadataPackage>,
}

/// One package of the resolved dependency graph.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MetadataPackage {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    pub manifest_path: PathBuf,
}

impl MetadataPackage {
    /// Directory containing the package's Cargo.toml.
    pub fn root(&self) -> Option<PathBuf> {
        self.manifest_path.parent().map(PathBuf::from)
    }
}

/// Parses `cargo metadata --format-version 1` JSON.
pub fn parse_metadata(json: &str) -> Result<Vec<MetadataPackage>> {
    let metadata: Metadata =
        serde_json::from_str(json).map_err(|e| CargoError::MetadataError { source: e })?;
    Ok(metadata.packages)
}

/// Package named `name`, treating `-` and `_` as equal. The highest version
/// wins when several are in the graph.
pub fn find_package<'a>(packages: &'a [MetadataPackage], name: &str) -> Option<&'a MetadataPackage> {
    let wanted = name.replace('-', "_");
    packages
        .iter()
        .filter(|p| p.name.replace('-', "_") == wanted)
        .max_by(|a, b| {
            let a = semver::Version::parse(&a.version).ok();
            let b = semver::Version::parse(&b.version).ok();
            a.cmp(&b)
        })
}
