//! Manifest location and the parsed dependency model.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Declared dependencies of one manifest.
///
/// Maps are keyed by the declared name; inserting a duplicate replaces the
/// earlier declaration, so the last one in the file wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestDependencies {
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
}

impl ManifestDependencies {
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.dev_dependencies.is_empty()
    }

    /// Looks a name up in regular then dev dependencies.
    pub fn version_of(&self, name: &str) -> Option<&str> {
        self.dependencies
            .get(name)
            .or_else(|| self.dev_dependencies.get(name))
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.version_of(name).is_some()
    }

    /// All declared names, regular dependencies first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .keys()
            .chain(
                self.dev_dependencies
                    .keys()
                    .filter(|name| !self.dependencies.contains_key(*name)),
            )
            .map(String::as_str)
    }

    /// Declared `(name, version, is_dev)` triples, regular dependencies first.
    pub fn entries(&self, include_dev: bool) -> Vec<(&str, &str, bool)> {
        let mut entries: Vec<(&str, &str, bool)> = self
            .dependencies
            .iter()
            .map(|(name, version)| (name.as_str(), version.as_str(), false))
            .collect();

        if include_dev {
            entries.extend(
                self.dev_dependencies
                    .iter()
                    .filter(|(name, _)| !self.dependencies.contains_key(*name))
                    .map(|(name, version)| (name.as_str(), version.as_str(), true)),
            );
        }
        entries
    }
}

/// A located manifest together with its parsed dependencies.
#[derive(Debug, Clone, Default)]
pub struct LoadedManifest {
    pub path: Option<PathBuf>,
    pub deps: ManifestDependencies,
}

impl LoadedManifest {
    /// Directory containing the manifest.
    pub fn dir(&self) -> Option<&Path> {
        self.path.as_deref().and_then(Path::parent)
    }

    pub fn file_name(&self) -> Option<String> {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
    }
}

/// Walks from `start` towards the filesystem root looking for a manifest.
///
/// Within one directory the file names are checked in the given priority
/// order. A relative `start` is taken from the current directory. The
/// filesystem root itself is never searched.
///
/// # Examples
///
/// ```
/// use modscout_core::manifest::locate_manifest;
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("go.mod"), "module example.com/app\n").unwrap();
/// let nested = dir.path().join("cmd/app");
/// std::fs::create_dir_all(&nested).unwrap();
///
/// let found = locate_manifest(&nested, &["go.mod"]).unwrap();
/// assert_eq!(found, dir.path().join("go.mod"));
/// ```
pub fn locate_manifest(start: &Path, filenames: &[&str]) -> Option<PathBuf> {
    let start = match std::path::absolute(start) {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!("cannot resolve {}: {}", start.display(), e);
            return None;
        }
    };
    let mut current = Some(start.as_path());

    while let Some(dir) = current {
        let parent = dir.parent();
        if parent.is_none() {
            break;
        }

        for filename in filenames {
            let candidate = dir.join(filename);
            if candidate.is_file() {
                tracing::debug!("located manifest: {}", candidate.display());
                return Some(candidate);
            }
        }

        current = parent;
    }

    None
}

/// Normalizes a version value that may be a nested structure.
///
/// Returns the nested `version` string when present, otherwise
/// [`LATEST_VERSION`](crate::types::LATEST_VERSION).
pub fn version_or_latest(version: Option<&str>) -> String {
    match version {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => crate::types::LATEST_VERSION.to_string(),
    }
}
