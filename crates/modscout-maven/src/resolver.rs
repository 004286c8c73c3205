//! Java import resolution plugged into the shared discovery engine.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use modscout_core::introspect::MAX_SUBMODULES;
use modscout_core::{
    EcosystemKind, ImportResolver, LoadedManifest, ManifestDependencies, ResolvedModule,
    StandardLibrary, StructuralScan,
};

use crate::jar::JarIndex;
use crate::parser::{load_dependencies, load_pom};
use crate::repository::MavenRepository;
use crate::statement::extract_root;
use crate::stdlib::JAVA_STDLIB;

const MANIFEST_FILENAME: &str = "pom.xml";

const MANIFEST_FILENAMES: &[&str] = &[MANIFEST_FILENAME];

const SOURCE_EXTENSIONS: &[&str] = &[".java"];

const SOURCE_ROOTS: &[&str] = &["src/main/java", "src/test/java"];

/// Artifact-name words too short to identify a package on their own.
const MIN_ARTIFACT_WORD: usize = 3;

/// Java knowledge for the discovery engine.
#[derive(Debug, Default, Clone)]
pub struct MavenResolver {
    repository: Option<MavenRepository>,
}

impl MavenResolver {
    pub const fn new() -> Self {
        Self { repository: None }
    }

    /// Uses `repository` instead of the user's local repository.
    #[must_use]
    pub fn with_repository(mut self, repository: MavenRepository) -> Self {
        self.repository = Some(repository);
        self
    }

    fn repository(&self) -> Option<MavenRepository> {
        self.repository.clone().or_else(MavenRepository::discover)
    }
}

/// How well `coordinate` (`groupId:artifactId`) accounts for `package`,
/// with the length of the matched group prefix as tie-breaker.
///
/// A groupId prefix and every artifactId word equal to a package segment
/// score two each. Without a full groupId prefix, a package under the groupId's
/// parent (`com.google` for `com.google.guava`) scores one. Zero means no
/// match.
fn match_score(package: &str, coordinate: &str) -> (u8, usize) {
    let (group, artifact) = coordinate.split_once(':').unwrap_or(("", coordinate));
    let under = |prefix: &str| {
        !prefix.is_empty()
            && package
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    };

    let mut score: u8 = 0;
    let mut matched = 0;
    if under(group) {
        score += 2;
        matched = group.len();
    } else if group.matches('.').count() >= 2
        && let Some((parent, _)) = group.rsplit_once('.')
        && under(parent)
    {
        score += 1;
        matched = parent.len();
    }

    let segment_hits = artifact
        .split(['-', '.', '_'])
        .filter(|word| word.len() >= MIN_ARTIFACT_WORD)
        .filter(|word| package.split('.').any(|segment| segment == *word))
        .count()
        .min(8);
    score += 2 * u8::try_from(segment_hits).unwrap_or(8);
    (score, matched)
}

/// Package path of the module: its own name, or the jar's common package
/// when a coordinate was requested.
fn target_package(module: &ResolvedModule, index: &JarIndex) -> String {
    if module.name.contains(':') {
        index.common_package()
    } else {
        module.name.clone()
    }
}

fn open_index(module: &ResolvedModule) -> Option<JarIndex> {
    match JarIndex::open(&module.root) {
        Ok(index) => Some(index),
        Err(e) => {
            tracing::debug!("{e}");
            None
        }
    }
}

#[async_trait]
impl ImportResolver for MavenResolver {
    fn kind(&self) -> EcosystemKind {
        EcosystemKind::Java
    }

    fn manifest_filenames(&self) -> &'static [&'static str] {
        MANIFEST_FILENAMES
    }

    fn parse_manifest(&self, path: &Path) -> ManifestDependencies {
        load_dependencies(path)
    }

    fn extract_root(&self, statement: &str) -> Option<String> {
        extract_root(statement)
    }

    fn stdlib(&self) -> &StandardLibrary {
        &JAVA_STDLIB
    }

    /// Best coordinate by groupId prefix and artifactId words; ties go to
    /// the longer groupId, then to declaration order.
    fn match_declared(&self, root: &str, deps: &ManifestDependencies) -> Option<String> {
        if deps.contains(root) {
            return Some(root.to_string());
        }
        let mut best: Option<((u8, usize), &str)> = None;
        for coordinate in deps.names() {
            let score = match_score(root, coordinate);
            if score.0 == 0 {
                continue;
            }
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, coordinate));
            }
        }
        best.map(|(_, coordinate)| coordinate.to_string())
    }

    /// Packages of the project's own sources, or under its own groupId.
    fn local_import_reason(&self, root: &str, manifest: &LoadedManifest) -> Option<String> {
        let dir = manifest.dir()?;
        let relative: PathBuf = root.split('.').collect();
        if SOURCE_ROOTS
            .iter()
            .any(|source_root| dir.join(source_root).join(&relative).is_dir())
        {
            return Some(format!("'{root}' is a package of the current project"));
        }

        let group = manifest
            .path
            .as_deref()
            .filter(|_| manifest.file_name().as_deref() == Some(MANIFEST_FILENAME))
            .and_then(load_pom)?
            .group_id?;
        root.strip_prefix(group.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
            .then(|| format!("'{root}' is under the project's groupId {group}"))
    }

    fn source_extensions(&self) -> &'static [&'static str] {
        SOURCE_EXTENSIONS
    }

    /// `name` is a coordinate, or a package mapped onto a declared one.
    fn locate_installed(&self, name: &str, manifest: &LoadedManifest) -> Option<ResolvedModule> {
        let coordinate = if name.contains(':') {
            name.to_string()
        } else {
            self.match_declared(name, &manifest.deps)?
        };
        let (group, artifact) = coordinate.split_once(':')?;
        let version = manifest.deps.version_of(&coordinate);

        let files = self.repository()?.find(group, artifact, version)?;
        let description = load_pom(&files.pom).and_then(|pom| pom.description.or(pom.name));
        Some(ResolvedModule::new(name, files.jar).with_description(description))
    }

    fn structural_exports(&self, module: &ResolvedModule, _max_depth: usize) -> StructuralScan {
        let Some(index) = open_index(module) else {
            return StructuralScan::default();
        };
        let package = target_package(module, &index);
        let mut scan = StructuralScan::default();
        match index.exports(&package) {
            Ok(exports) => exports.into_iter().for_each(|e| scan.push_export(e)),
            Err(e) => tracing::debug!("cannot list classes of {package}: {e}"),
        }
        scan
    }

    /// Packages one level below the module's package.
    fn submodules(&self, module: &ResolvedModule) -> Vec<String> {
        let Some(index) = open_index(module) else {
            return Vec::new();
        };
        let mut children = index.subpackages(&target_package(module, &index));
        children.truncate(MAX_SUBMODULES);
        children
    }

    /// Runtime dependencies of the artifact's own pom.
    fn module_dependencies(&self, module: &ResolvedModule) -> Vec<String> {
        load_pom(&module.root.with_extension("pom"))
            .map(|pom| pom.runtime_coordinates())
            .unwrap_or_default()
    }
}
