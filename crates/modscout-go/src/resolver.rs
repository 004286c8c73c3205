//! Go package resolution plugged into the shared discovery engine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use modscout_core::introspect::MAX_SUBMODULES;
use modscout_core::process::run_tool_lenient;
use modscout_core::{
    EcosystemKind, ImportResolver, LoadedManifest, ManifestDependencies, ResolvedModule,
    StandardLibrary, StructuralScan,
};
use serde::Deserialize;

use crate::error::{GoError, Result};
use crate::introspect::{package_doc, package_files, scan_package};
use crate::modcache::GoModCache;
use crate::parser::{GoMod, is_path_prefix, load_dependencies, load_go_mod};
use crate::statement::{extract_root, is_relative};
use crate::stdlib::GO_STDLIB;

const MANIFEST_FILENAME: &str = "go.mod";

const MANIFEST_FILENAMES: &[&str] = &[MANIFEST_FILENAME];

const SOURCE_EXTENSIONS: &[&str] = &[".go"];

/// Directories that never hold importable packages.
const SKIPPED_DIRS: &[&str] = &["internal", "testdata", "vendor"];

/// Subset of `go list -json` output.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoListPackage {
    dir: Option<PathBuf>,
    #[serde(default)]
    doc: Option<String>,
    #[serde(default)]
    standard: bool,
}

fn parse_go_list(stdout: &str) -> Result<GoListPackage> {
    serde_json::from_str(stdout).map_err(|source| GoError::GoListError { source })
}

/// Go knowledge for the discovery engine.
#[derive(Debug, Default, Clone)]
pub struct GoResolver {
    mod_cache: Option<GoModCache>,
}

impl GoResolver {
    pub const fn new() -> Self {
        Self { mod_cache: None }
    }

    /// Uses `cache` instead of the environment's module cache.
    #[must_use]
    pub fn with_mod_cache(mut self, cache: GoModCache) -> Self {
        self.mod_cache = Some(cache);
        self
    }

    fn mod_cache(&self) -> Option<GoModCache> {
        self.mod_cache.clone().or_else(GoModCache::discover)
    }

    fn module_at(name: &str, dir: &Path) -> ResolvedModule {
        ResolvedModule::new(name, dir).with_description(package_doc(dir))
    }

    /// Package directory of `name` through go.mod requirements and replacements.
    fn locate_required(&self, name: &str, gomod: &GoMod, project_dir: &Path) -> Result<PathBuf> {
        let not_found = || GoError::package_not_found(name);
        let owner = gomod.owning_require(name).ok_or_else(not_found)?;
        let subpath = name[owner.module_path.len()..].trim_start_matches('/');

        let dir = match gomod.replacement_for(&owner.module_path, Some(&owner.version)) {
            Some(replace) if replace.is_local() => {
                let dir = project_dir.join(&replace.replacement).join(subpath);
                dir.is_dir().then_some(dir)
            }
            Some(replace) => {
                let version = replace
                    .replacement_version
                    .as_deref()
                    .unwrap_or(&owner.version);
                let replaced = if subpath.is_empty() {
                    replace.replacement.clone()
                } else {
                    format!("{}/{subpath}", replace.replacement)
                };
                self.mod_cache()
                    .and_then(|cache| cache.package_dir(&replace.replacement, version, &replaced))
            }
            None => self
                .mod_cache()
                .and_then(|cache| cache.package_dir(&owner.module_path, &owner.version, name)),
        };
        dir.ok_or_else(not_found)
    }
}

/// Parsed go.mod behind a loaded manifest.
fn go_mod_of(manifest: &LoadedManifest) -> Option<GoMod> {
    let path = manifest.path.as_deref()?;
    (manifest.file_name().as_deref() == Some(MANIFEST_FILENAME)).then(|| load_go_mod(path))
}

fn has_go_sources(dir: &Path) -> bool {
    !package_files(dir).is_empty()
}

#[async_trait]
impl ImportResolver for GoResolver {
    fn kind(&self) -> EcosystemKind {
        EcosystemKind::Go
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
        &GO_STDLIB
    }

    /// The declared module whose path is the longest prefix of the import path.
    fn match_declared(&self, root: &str, deps: &ManifestDependencies) -> Option<String> {
        deps.names()
            .filter(|module| is_path_prefix(module, root))
            .max_by_key(|module| module.len())
            .map(str::to_string)
    }

    fn local_import_reason(&self, root: &str, manifest: &LoadedManifest) -> Option<String> {
        if is_relative(root) {
            return Some(format!("'{root}' is a relative import of a local package"));
        }
        let module_path = go_mod_of(manifest)?.module_path?;
        is_path_prefix(&module_path, root)
            .then(|| format!("'{root}' is a package of the current module {module_path}"))
    }

    /// Identifiers starting with a lowercase letter are unexported.
    fn is_private(&self, name: &str) -> bool {
        !name.chars().next().is_some_and(char::is_uppercase)
    }

    fn source_extensions(&self) -> &'static [&'static str] {
        SOURCE_EXTENSIONS
    }

    /// `vendor/<path>` first, then go.mod replacements and the module cache.
    fn locate_installed(&self, name: &str, manifest: &LoadedManifest) -> Option<ResolvedModule> {
        let project_dir = manifest.dir()?;

        let vendored = project_dir.join("vendor").join(name);
        if has_go_sources(&vendored) {
            return Some(Self::module_at(name, &vendored));
        }

        let gomod = go_mod_of(manifest)?;
        match self.locate_required(name, &gomod, project_dir) {
            Ok(dir) => Some(Self::module_at(name, &dir)),
            Err(e) => {
                tracing::debug!("{e}");
                None
            }
        }
    }

    async fn resolve_with_toolchain(
        &self,
        name: &str,
        project_dir: &Path,
        timeout: Duration,
    ) -> Option<ResolvedModule> {
        let stdout = run_tool_lenient(
            "go",
            &["list", "-find", "-json", name],
            Some(project_dir),
            timeout,
        )
        .await?;

        let package = match parse_go_list(&stdout) {
            Ok(package) => package,
            Err(e) => {
                tracing::debug!("ignoring go list output for {name}: {e}");
                return None;
            }
        };
        if package.standard {
            return None;
        }
        let dir = package.dir.filter(|d| d.is_dir())?;
        let description = package.doc.or_else(|| package_doc(&dir));
        Some(ResolvedModule::new(name, dir).with_description(description))
    }

    fn structural_exports(&self, module: &ResolvedModule, _max_depth: usize) -> StructuralScan {
        scan_package(&module.root)
    }

    /// Child directories that contain Go sources.
    fn submodules(&self, module: &ResolvedModule) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&module.root) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| has_go_sources(p))
            .filter_map(|p| p.file_name()?.to_str().map(str::to_string))
            .filter(|n| !n.starts_with(['.', '_']) && !SKIPPED_DIRS.contains(&n.as_str()))
            .collect();
        names.sort();
        names.truncate(MAX_SUBMODULES);
        names
    }

    /// Direct requirements of the go.mod owning the package directory.
    /// Vendored packages carry no go.mod of their own.
    fn module_dependencies(&self, module: &ResolvedModule) -> Vec<String> {
        module
            .root
            .ancestors()
            .take_while(|dir| dir.file_name().is_none_or(|n| n != "vendor"))
            .map(|dir| dir.join(MANIFEST_FILENAME))
            .find(|path| path.is_file())
            .map(|path| {
                load_go_mod(&path)
                    .requires
                    .into_iter()
                    .filter(|r| !r.indirect)
                    .map(|r| r.module_path)
                    .collect()
            })
            .unwrap_or_default()
    }
}
