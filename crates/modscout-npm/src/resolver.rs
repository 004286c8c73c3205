//! Node.js module resolution plugged into the shared discovery engine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use modscout_core::introspect::parse_runtime_bindings;
use modscout_core::process::run_tool_lenient;
use modscout_core::{
    EcosystemKind, ImportResolver, LoadedManifest, ManifestDependencies, ResolvedModule,
    RuntimeBinding, StandardLibrary, StructuralScan,
};

use crate::introspect::scan_module;
use crate::parser::{PackageMeta, load_dependencies};
use crate::statement::{extract_root, is_relative};
use crate::stdlib::NODE_STDLIB;

const MANIFEST_FILENAMES: &[&str] = &["package.json"];

const SOURCE_EXTENSIONS: &[&str] = &[
    ".d.ts", ".d.mts", ".d.cts", ".ts", ".tsx", ".mts", ".cts", ".js", ".jsx", ".mjs", ".cjs",
];

const TYPES_SCOPE: &str = "@types/";

/// Prints the resolved entry of `argv[1]` as seen from the working directory.
const RESOLVE_SCRIPT: &str =
    "process.stdout.write(require.resolve(process.argv[1], { paths: [process.cwd()] }))";

/// Loads `argv[1]` and prints `[{name, shape}]` for its enumerable bindings.
const PROBE_SCRIPT: &str = r"
const mod = require(process.argv[1]);
const shapeOf = (v) => {
  if (typeof v === 'function') {
    return /^class[\s{]/.test(Function.prototype.toString.call(v)) ? 'class' : 'callable';
  }
  return v !== null && typeof v === 'object' ? 'object' : 'other';
};
const out = Object.keys(mod).map((name) => ({ name, shape: shapeOf(mod[name]) }));
if (out.length === 0 && typeof mod === 'function') out.push({ name: 'default', shape: shapeOf(mod) });
process.stdout.write(JSON.stringify(out));
";

/// JavaScript/TypeScript knowledge for the discovery engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct NpmResolver;

impl NpmResolver {
    pub const fn new() -> Self {
        Self
    }

    fn module_at(name: &str, package_dir: &Path) -> ResolvedModule {
        let meta = PackageMeta::load(package_dir).unwrap_or_default();
        let module = ResolvedModule::new(name, package_dir).with_description(meta.description.clone());
        match meta.entry_file(package_dir) {
            Some(entry) => module.with_entry(entry),
            None => module,
        }
    }
}

/// Walks up from `start` looking for `node_modules/<name>`.
pub fn find_in_node_modules(start: &Path, name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join("node_modules").join(name))
        .find(|candidate| candidate.is_dir())
}

/// Package directory owning `file`: the nearest ancestor whose package.json
/// names `name`, or failing that the nearest ancestor with any package.json.
fn package_dir_of(file: &Path, name: &str) -> Option<PathBuf> {
    let mut nearest = None;
    for dir in file.ancestors().skip(1) {
        if !dir.join("package.json").is_file() {
            continue;
        }
        if nearest.is_none() {
            nearest = Some(dir.to_path_buf());
        }
        if PackageMeta::load(dir).and_then(|m| m.name).as_deref() == Some(name) {
            return Some(dir.to_path_buf());
        }
    }
    nearest
}

#[async_trait]
impl ImportResolver for NpmResolver {
    fn kind(&self) -> EcosystemKind {
        EcosystemKind::JavaScript
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
        &NODE_STDLIB
    }

    /// Exact name, or a package paired with its `@types/` declarations.
    fn match_declared(&self, root: &str, deps: &ManifestDependencies) -> Option<String> {
        if deps.contains(root) {
            return Some(root.to_string());
        }

        let typed = format!("{TYPES_SCOPE}{}", types_package_suffix(root));
        if deps.contains(&typed) {
            return Some(typed);
        }

        root.strip_prefix(TYPES_SCOPE)
            .map(untyped_package_name)
            .filter(|untyped| deps.contains(untyped))
    }

    fn local_import_reason(&self, root: &str, _manifest: &LoadedManifest) -> Option<String> {
        is_relative(root).then(|| format!("'{root}' is a relative import of a local file"))
    }

    fn source_extensions(&self) -> &'static [&'static str] {
        SOURCE_EXTENSIONS
    }

    fn locate_installed(&self, name: &str, manifest: &LoadedManifest) -> Option<ResolvedModule> {
        let start = manifest.dir()?;
        let package_dir = find_in_node_modules(start, name)?;
        Some(Self::module_at(name, &package_dir))
    }

    async fn resolve_with_toolchain(
        &self,
        name: &str,
        project_dir: &Path,
        timeout: Duration,
    ) -> Option<ResolvedModule> {
        let resolved =
            run_tool_lenient("node", &["-e", RESOLVE_SCRIPT, name], Some(project_dir), timeout)
                .await?;
        let entry = PathBuf::from(resolved);
        if !entry.is_absolute() {
            // built-in that slipped past the stdlib table
            return None;
        }

        let module = match package_dir_of(&entry, name) {
            Some(dir) => Self::module_at(name, &dir),
            None => ResolvedModule::new(name, entry.parent().unwrap_or(project_dir)),
        };
        Some(module.with_entry(entry))
    }

    fn structural_exports(&self, module: &ResolvedModule, max_depth: usize) -> StructuralScan {
        module
            .entry
            .as_deref()
            .map(|entry| scan_module(entry, max_depth))
            .unwrap_or_default()
    }

    async fn runtime_exports(
        &self,
        module: &ResolvedModule,
        project_dir: &Path,
        timeout: Duration,
    ) -> Vec<RuntimeBinding> {
        let target = module.root.to_string_lossy();
        run_tool_lenient("node", &["-e", PROBE_SCRIPT, &target], Some(project_dir), timeout)
            .await
            .map(|stdout| parse_runtime_bindings(&stdout))
            .unwrap_or_default()
    }

    fn manifest_exports(&self, module: &ResolvedModule) -> Vec<String> {
        PackageMeta::load(&module.root)
            .map(|meta| meta.export_subpaths())
            .unwrap_or_default()
    }

    fn module_dependencies(&self, module: &ResolvedModule) -> Vec<String> {
        PackageMeta::load(&module.root)
            .map(|meta| meta.dependencies)
            .unwrap_or_default()
    }
}

/// `@scope/name` is typed by `@types/scope__name`.
fn types_package_suffix(name: &str) -> String {
    match name.strip_prefix('@') {
        Some(scoped) => scoped.replacen('/', "__", 1),
        None => name.to_string(),
    }
}

fn untyped_package_name(suffix: &str) -> String {
    match suffix.split_once("__") {
        Some((scope, name)) => format!("@{scope}/{name}"),
        None => suffix.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn deps(names: &[&str]) -> ManifestDependencies {
        let mut deps = ManifestDependencies::default();
        for name in names {
            deps.dependencies.insert((*name).to_string(), "^1.0.0".to_string());
        }
        deps
    }

    #[test]
    fn test_match_exact() {
        let resolver = NpmResolver::new();
        assert_eq!(
            resolver.match_declared("react", &deps(&["react"])).as_deref(),
            Some("react")
        );
        assert_eq!(resolver.match_declared("react", &deps(&["preact"])), None);
    }

    #[test]
    fn test_match_types_pairs() {
        let resolver = NpmResolver::new();
        assert_eq!(
            resolver.match_declared("node", &deps(&["@types/node"])).as_deref(),
            Some("@types/node")
        );
        assert_eq!(
            resolver.match_declared("@types/lodash", &deps(&["lodash"])).as_deref(),
            Some("lodash")
        );
        assert_eq!(
            resolver
                .match_declared("@babel/core", &deps(&["@types/babel__core"]))
                .as_deref(),
            Some("@types/babel__core")
        );
        assert_eq!(
            resolver
                .match_declared("@types/babel__core", &deps(&["@babel/core"]))
                .as_deref(),
            Some("@babel/core")
        );
    }

    #[test]
    fn test_local_reason() {
        let resolver = NpmResolver::new();
        assert!(resolver.local_import_reason("./utils", &LoadedManifest::default()).is_some());
        assert!(resolver.local_import_reason("utils", &LoadedManifest::default()).is_none());
    }

    #[test]
    fn test_locate_installed_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = dir.path().join("node_modules/@scope/widget");
        fs::create_dir_all(pkg.join("dist")).unwrap();
        fs::write(
            pkg.join("package.json"),
            r#"{"name":"@scope/widget","description":"Widgets","main":"dist/index.js"}"#,
        )
        .unwrap();
        fs::write(pkg.join("dist/index.js"), "exports.render = function () {};").unwrap();

        let app = dir.path().join("packages/app");
        fs::create_dir_all(&app).unwrap();
        fs::write(app.join("package.json"), "{}").unwrap();

        let manifest = LoadedManifest {
            path: Some(app.join("package.json")),
            deps: ManifestDependencies::default(),
        };
        let module = NpmResolver::new()
            .locate_installed("@scope/widget", &manifest)
            .unwrap();
        assert_eq!(module.root, pkg);
        assert_eq!(module.entry.as_deref(), Some(pkg.join("dist/index.js").as_path()));
        assert_eq!(module.description.as_deref(), Some("Widgets"));
    }

    #[test]
    fn test_locate_without_manifest() {
        let manifest = LoadedManifest {
            path: None,
            deps: ManifestDependencies::default(),
        };
        assert!(NpmResolver::new().locate_installed("react", &manifest).is_none());
    }

    #[test]
    fn test_package_dir_of_prefers_matching_name() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = dir.path().join("node_modules/left-pad");
        fs::create_dir_all(pkg.join("lib")).unwrap();
        fs::write(pkg.join("package.json"), r#"{"name":"left-pad"}"#).unwrap();
        fs::write(pkg.join("lib/package.json"), r#"{"type":"module"}"#).unwrap();
        fs::write(pkg.join("lib/index.js"), "").unwrap();

        assert_eq!(package_dir_of(&pkg.join("lib/index.js"), "left-pad"), Some(pkg.clone()));
        assert_eq!(
            package_dir_of(&pkg.join("lib/index.js"), "other"),
            Some(pkg.join("lib"))
        );
    }

    #[test]
    fn test_structural_and_manifest_tiers() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"name":"kit","exports":{".":"./index.js","./server":"./server.js"},
                "dependencies":{"ms":"^2.0.0"}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("index.js"), "export function start() {}").unwrap();

        let resolver = NpmResolver::new();
        let module = NpmResolver::module_at("kit", dir.path());
        let scan = resolver.structural_exports(&module, 2);
        assert_eq!(scan.exports[0].name, "start");
        assert_eq!(resolver.manifest_exports(&module), vec![".", "./server"]);
        assert_eq!(resolver.module_dependencies(&module), vec!["ms"]);
    }

    #[tokio::test]
    async fn test_toolchain_absent_or_unresolvable() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = NpmResolver::new()
            .resolve_with_toolchain(
                "definitely-not-installed-pkg-xyz",
                dir.path(),
                Duration::from_secs(5),
            )
            .await;
        assert!(resolved.is_none());
    }
}
