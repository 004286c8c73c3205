//! Local Maven repository lookup.
//!
//! Artifacts live in `<repo>/<group as path>/<artifact>/<version>/` as
//! `<artifact>-<version>.jar` next to `<artifact>-<version>.pom`. The
//! repository is `~/.m2/repository` unless `~/.m2/settings.xml` names
//! another `<localRepository>`.

use std::path::{Path, PathBuf};

use semver::Version;

use crate::error::Result;
use crate::xml::{Node, is_path, walk};

/// Files of one resolved artifact version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFiles {
    pub version: String,
    pub jar: PathBuf,
    pub pom: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenRepository {
    root: PathBuf,
}

impl MavenRepository {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn discover() -> Option<Self> {
        let m2 = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(|home| PathBuf::from(home).join(".m2"))?;

        let configured = std::fs::read_to_string(m2.join("settings.xml"))
            .ok()
            .and_then(|content| match local_repository(&content) {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!("ignoring malformed settings.xml: {e}");
                    None
                }
            });
        Some(Self::with_root(
            configured.map_or_else(|| m2.join("repository"), PathBuf::from),
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn artifact_dir(&self, group_id: &str, artifact_id: &str) -> PathBuf {
        let mut dir = self.root.clone();
        dir.extend(group_id.split('.'));
        dir.join(artifact_id)
    }

    /// Jar of `group_id:artifact_id`. A concrete `version` is tried first;
    /// otherwise, or when it is absent, the highest downloaded version wins.
    pub fn find(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: Option<&str>,
    ) -> Option<ArtifactFiles> {
        let dir = self.artifact_dir(group_id, artifact_id);
        if let Some(version) = version.filter(|v| is_concrete(v))
            && let Some(files) = artifact_files(&dir, artifact_id, version)
        {
            return Some(files);
        }

        let mut downloaded: Vec<ArtifactFiles> = std::fs::read_dir(&dir)
            .ok()?
            .filter_map(std::result::Result::ok)
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .filter_map(|v| artifact_files(&dir, artifact_id, &v))
            .collect();
        downloaded.sort_by(|a, b| {
            lenient_version(&a.version)
                .cmp(&lenient_version(&b.version))
                .then_with(|| a.version.cmp(&b.version))
        });
        downloaded.pop()
    }
}

fn artifact_files(dir: &Path, artifact_id: &str, version: &str) -> Option<ArtifactFiles> {
    let version_dir = dir.join(version);
    let jar = version_dir.join(format!("{artifact_id}-{version}.jar"));
    jar.is_file().then(|| ArtifactFiles {
        version: version.to_string(),
        pom: version_dir.join(format!("{artifact_id}-{version}.pom")),
        jar,
    })
}

/// Ranges (`[1.0,2.0)`), unresolved properties and `latest` are not versions.
fn is_concrete(version: &str) -> bool {
    !version.is_empty()
        && version != modscout_core::LATEST_VERSION
        && !version.contains(['[', '(', ',', '$'])
}

/// Maven versions padded to semver: `1.0` → `1.0.0`, `33.0.0-jre` as is.
fn lenient_version(version: &str) -> Option<Version> {
    if let Ok(parsed) = Version::parse(version) {
        return Some(parsed);
    }
    let (release, qualifier) = match version.split_once('-') {
        Some((release, qualifier)) => (release, Some(qualifier)),
        None => (version, None),
    };
    let mut parts: Vec<&str> = release.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    parts.resize(3, "0");
    let padded = match qualifier {
        Some(q) => format!("{}-{q}", parts.join(".")),
        None => parts.join("."),
    };
    Version::parse(&padded).ok()
}

/// `<localRepository>` of a Maven settings.xml.
pub fn local_repository(settings: &str) -> Result<Option<String>> {
    let mut found = None;
    walk(settings, |node| {
        if let Node::Text { path, text } = node
            && is_path(path, &["settings", "localRepository"])
        {
            found = Some(text);
        }
    })?;
    Ok(found)
}
