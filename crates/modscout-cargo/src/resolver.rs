//! Rust crate resolution plugged into the shared discovery engine.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use modscout_core::process::run_tool_lenient;
use modscout_core::{
    EcosystemKind, ImportResolver, LoadedManifest, ManifestDependencies, ResolvedModule,
    StandardLibrary, StructuralScan,
};

use crate::introspect::scan_module;
use crate::metadata::{find_package, parse_metadata};
use crate::parser::{PackageMeta, load_declared, load_dependencies};
use crate::sources::CrateSources;
use crate::statement::{extract_root, is_local_root};
use crate::stdlib::RUST_STDLIB;
use crate::types::DependencySource;

const MANIFEST_FILENAMES: &[&str] = &["Cargo.toml"];

const SOURCE_EXTENSIONS: &[&str] = &[".rs"];

/// Rust knowledge for the discovery engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct CargoResolver;

impl CargoResolver {
    pub const fn new() -> Self {
        Self
    }

    fn crate_module(name: &str, crate_dir: &Path) -> ResolvedModule {
        let meta = PackageMeta::load(crate_dir).unwrap_or_default();
        let module = ResolvedModule::new(name, crate_dir).with_description(meta.description.clone());
        match meta.lib_entry(crate_dir) {
            Some(entry) => module.with_entry(entry),
            None => module,
        }
    }
}

/// Crate names compare equal when they differ only in `-` versus `_`.
pub fn same_crate(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a.bytes()
            .zip(b.bytes())
            .all(|(x, y)| x == y || matches!((x, y), (b'-', b'_') | (b'_', b'-')))
}

#[async_trait]
impl ImportResolver for CargoResolver {
    fn kind(&self) -> EcosystemKind {
        EcosystemKind::Rust
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
        &RUST_STDLIB
    }

    /// `use serde_json` is provided by a `serde-json` or `serde_json` key;
    /// renamed dependencies are matched by their key.
    fn match_declared(&self, root: &str, deps: &ManifestDependencies) -> Option<String> {
        deps.names()
            .find(|declared| same_crate(declared, root))
            .map(str::to_string)
    }

    fn local_import_reason(&self, root: &str, _manifest: &LoadedManifest) -> Option<String> {
        is_local_root(root).then(|| format!("'{root}' refers to a module of the current crate"))
    }

    fn source_extensions(&self) -> &'static [&'static str] {
        SOURCE_EXTENSIONS
    }

    /// Path dependencies resolve next to the manifest; registry crates are
    /// looked up under their package name in `vendor/` and the cargo registry.
    fn locate_installed(&self, name: &str, manifest: &LoadedManifest) -> Option<ResolvedModule> {
        let project_dir = manifest.dir()?;
        let declared = manifest
            .path
            .as_deref()
            .map(load_declared)
            .unwrap_or_default()
            .into_iter()
            .find(|krate| same_crate(&krate.key, name));

        let (package, requirement) = match &declared {
            Some(krate) => {
                if let DependencySource::Path { path } = &krate.source {
                    let dir = project_dir.join(path);
                    return dir
                        .join("Cargo.toml")
                        .is_file()
                        .then(|| Self::crate_module(name, &dir));
                }
                (krate.package.as_str(), Some(krate.version.as_str()))
            }
            None => (name, None),
        };

        let crate_dir = CrateSources::for_project(project_dir).find(package, requirement)?;
        Some(Self::crate_module(name, &crate_dir))
    }

    async fn resolve_with_toolchain(
        &self,
        name: &str,
        project_dir: &Path,
        timeout: Duration,
    ) -> Option<ResolvedModule> {
        let stdout = run_tool_lenient(
            "cargo",
            &["metadata", "--format-version", "1", "--offline"],
            Some(project_dir),
            timeout,
        )
        .await?;

        let packages = parse_metadata(&stdout)
            .inspect_err(|e| tracing::debug!("{e}"))
            .ok()?;
        let root = find_package(&packages, name)?.root()?;
        Some(Self::crate_module(name, &root))
    }

    fn structural_exports(&self, module: &ResolvedModule, max_depth: usize) -> StructuralScan {
        module
            .entry
            .as_deref()
            .map(|entry| scan_module(entry, max_depth))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::tests::unpack;
    use std::fs;

    fn deps(names: &[&str]) -> ManifestDependencies {
        let mut deps = ManifestDependencies::default();
        for name in names {
            deps.dependencies.insert((*name).to_string(), "1".to_string());
        }
        deps
    }

    #[test]
    fn test_same_crate() {
        assert!(same_crate("serde_json", "serde-json"));
        assert!(same_crate("tokio", "tokio"));
        assert!(!same_crate("serde", "serde_json"));
        assert!(!same_crate("a_b", "a.b"));
    }

    #[test]
    fn test_match_dash_underscore() {
        let resolver = CargoResolver::new();
        assert_eq!(
            resolver.match_declared("tokio_util", &deps(&["tokio-util"])).as_deref(),
            Some("tokio-util")
        );
        assert_eq!(
            resolver.match_declared("serde", &deps(&["serde_json"])),
            None
        );
    }

    #[test]
    fn test_local_roots() {
        let resolver = CargoResolver::new();
        assert!(resolver.local_import_reason("crate", &LoadedManifest::default()).is_some());
        assert!(resolver.local_import_reason("super", &LoadedManifest::default()).is_some());
        assert!(resolver.local_import_reason("serde", &LoadedManifest::default()).is_none());
        assert_eq!(resolver.match_declared("crate", &deps(&["serde"])), None);
    }

    #[test]
    fn test_locate_vendored_renamed_crate() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            r#"
[package]
name = "app"

[dependencies]
widget2 = { package = "modscout-fixture-widget", version = "2" }
"#,
        )
        .unwrap();
        let vendor = dir.path().join("vendor");
        unpack(&vendor, "modscout-fixture-widget-1.4.0", "modscout-fixture-widget", "1.4.0", "");
        let v2 = unpack(
            &vendor,
            "modscout-fixture-widget-2.1.0",
            "modscout-fixture-widget",
            "2.1.0",
            "pub fn draw() {}\n",
        );

        let manifest = LoadedManifest {
            path: Some(dir.path().join("Cargo.toml")),
            deps: ManifestDependencies::default(),
        };
        let resolver = CargoResolver::new();
        let module = resolver.locate_installed("widget2", &manifest).unwrap();
        assert_eq!(module.root, v2);
        assert_eq!(module.name, "widget2");
        assert_eq!(
            module.description.as_deref(),
            Some("The modscout-fixture-widget crate")
        );

        let scan = resolver.structural_exports(&module, 1);
        assert_eq!(scan.exports[0].signature.as_deref(), Some("draw()"));
        assert_eq!(resolver.module_dependencies(&module), vec!["itoa"]);
    }

    #[test]
    fn test_locate_path_dependency() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            "[dependencies]\nshared = { path = \"crates/shared\" }\n",
        )
        .unwrap();
        let crates = dir.path().join("crates");
        let shared = unpack(&crates, "shared", "shared", "0.1.0", "pub mod util;\n");
        fs::write(shared.join("src/util.rs"), "").unwrap();

        let manifest = LoadedManifest {
            path: Some(dir.path().join("Cargo.toml")),
            deps: ManifestDependencies::default(),
        };
        let resolver = CargoResolver::new();
        let module = resolver.locate_installed("shared", &manifest).unwrap();
        assert_eq!(module.root, shared);
        assert_eq!(module.entry, Some(shared.join("src/lib.rs")));
        assert_eq!(resolver.submodules(&module), vec!["util"]);
    }

    #[test]
    fn test_locate_missing_path_dependency() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            "[dependencies]\nghost = { path = \"../ghost\" }\n",
        )
        .unwrap();
        let manifest = LoadedManifest {
            path: Some(dir.path().join("Cargo.toml")),
            deps: ManifestDependencies::default(),
        };
        assert!(CargoResolver::new().locate_installed("ghost", &manifest).is_none());
    }

    #[tokio::test]
    async fn test_toolchain_outside_a_cargo_project() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = CargoResolver::new()
            .resolve_with_toolchain("serde", dir.path(), Duration::from_secs(5))
            .await;
        assert!(resolved.is_none());
    }
}
