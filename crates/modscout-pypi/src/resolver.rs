//! Python import resolution plugged into the shared discovery engine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use modscout_core::introspect::parse_runtime_bindings;
use modscout_core::process::run_tool_lenient;
use modscout_core::{
    EcosystemKind, ImportResolver, LoadedManifest, ManifestDependencies, ResolvedModule,
    RuntimeBinding, StandardLibrary, StructuralScan,
};

use crate::introspect::{module_source, scan_module};
use crate::names::{candidate_distributions, import_name_of, normalize};
use crate::parser::load_dependencies;
use crate::site::{InstalledPackage, VirtualEnv, find_dist_info};
use crate::statement::{RELATIVE_ROOT, extract_root};
use crate::stdlib::PYTHON_STDLIB;

const MANIFEST_FILENAMES: &[&str] = &["pyproject.toml", "requirements.txt"];

const SOURCE_EXTENSIONS: &[&str] = &[".py", ".pyi"];

const SYSTEM_PYTHON: &str = "python3";

/// Prints the origin file of module `argv[1]`, or nothing.
const FIND_SPEC_SCRIPT: &str = "import importlib.util, sys
spec = importlib.util.find_spec(sys.argv[1])
print(spec.origin if spec and spec.origin and spec.has_location else '')";

/// Imports module `argv[1]` and prints `[{name, shape, signature}]`.
const PROBE_SCRIPT: &str = "import importlib, inspect, json, sys
mod = importlib.import_module(sys.argv[1])
names = getattr(mod, '__all__', None) or [n for n in dir(mod) if not n.startswith('__')]
out = []
for name in names:
    value = getattr(mod, name, None)
    if inspect.isclass(value):
        shape = 'class'
    elif callable(value):
        shape = 'callable'
    elif inspect.ismodule(value) or isinstance(value, dict):
        shape = 'object'
    else:
        shape = 'other'
    signature = None
    if shape == 'callable':
        try:
            signature = name + str(inspect.signature(value))
        except (TypeError, ValueError):
            pass
    out.append({'name': name, 'shape': shape, 'signature': signature})
print(json.dumps(out))";

/// Python knowledge for the discovery engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct PypiResolver;

impl PypiResolver {
    pub const fn new() -> Self {
        Self
    }

    fn module_from_install(name: &str, installed: &InstalledPackage) -> ResolvedModule {
        let module = ResolvedModule::new(name, &installed.location)
            .with_description(installed.summary());
        match module_source(&installed.location) {
            Some(entry) => module.with_entry(entry),
            None => module,
        }
    }

    fn interpreter(project_dir: &Path) -> String {
        VirtualEnv::discover(project_dir)
            .and_then(|venv| venv.python())
            .map_or_else(
                || SYSTEM_PYTHON.to_string(),
                |path| path.to_string_lossy().into_owned(),
            )
    }

    fn installed(module: &ResolvedModule) -> InstalledPackage {
        let dist_info = module
            .root
            .parent()
            .and_then(|site| find_dist_info(site, &module.name));
        InstalledPackage {
            location: module.root.clone(),
            dist_info,
        }
    }
}

/// Dotted import name of a resolved module, from its location on disk.
fn import_target(module: &ResolvedModule) -> String {
    let stem = if module.root.is_dir() {
        module.root.file_name()
    } else {
        module.root.file_stem()
    };
    stem.and_then(|s| s.to_str())
        .map_or_else(|| import_name_of(&module.name), str::to_string)
}

#[async_trait]
impl ImportResolver for PypiResolver {
    fn kind(&self) -> EcosystemKind {
        EcosystemKind::Python
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
        &PYTHON_STDLIB
    }

    /// PEP 503-normalized comparison, with well-known import aliases
    /// (`yaml` is provided by `PyYAML`).
    fn match_declared(&self, root: &str, deps: &ManifestDependencies) -> Option<String> {
        if root == RELATIVE_ROOT {
            return None;
        }
        let candidates = candidate_distributions(root);
        deps.names()
            .find(|declared| candidates.contains(&normalize(declared)))
            .map(str::to_string)
    }

    fn local_import_reason(&self, root: &str, _manifest: &LoadedManifest) -> Option<String> {
        (root == RELATIVE_ROOT)
            .then(|| "relative import of a module in the current package".to_string())
    }

    fn source_extensions(&self) -> &'static [&'static str] {
        SOURCE_EXTENSIONS
    }

    fn locate_installed(&self, name: &str, manifest: &LoadedManifest) -> Option<ResolvedModule> {
        let venv = VirtualEnv::discover(manifest.dir()?)?;
        let installed = venv.find_module(name)?;
        Some(Self::module_from_install(name, &installed))
    }

    async fn resolve_with_toolchain(
        &self,
        name: &str,
        project_dir: &Path,
        timeout: Duration,
    ) -> Option<ResolvedModule> {
        let python = Self::interpreter(project_dir);
        let import_name = if name.contains('-') {
            import_name_of(name)
        } else {
            name.to_string()
        };
        let origin = run_tool_lenient(
            &python,
            &["-c", FIND_SPEC_SCRIPT, &import_name],
            Some(project_dir),
            timeout,
        )
        .await?;

        let entry = PathBuf::from(origin);
        if !entry.is_file() {
            return None;
        }
        let root = match entry.file_name().and_then(|n| n.to_str()) {
            Some("__init__.py") => entry.parent().map_or_else(|| entry.clone(), Path::to_path_buf),
            _ => entry.clone(),
        };
        let installed = Self::installed(&ResolvedModule::new(name, &root));
        Some(
            ResolvedModule::new(name, root)
                .with_entry(entry)
                .with_description(installed.summary()),
        )
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
        let python = Self::interpreter(project_dir);
        let target = import_target(module);
        run_tool_lenient(
            &python,
            &["-c", PROBE_SCRIPT, &target],
            Some(project_dir),
            timeout,
        )
        .await
        .map(|stdout| parse_runtime_bindings(&stdout))
        .unwrap_or_default()
    }

    /// Single-file modules have no siblings of their own.
    fn submodules(&self, module: &ResolvedModule) -> Vec<String> {
        if !module.root.is_dir() {
            return Vec::new();
        }
        modscout_core::introspect::sibling_sources(
            &module.root,
            module.entry.as_deref(),
            SOURCE_EXTENSIONS,
        )
    }

    fn module_dependencies(&self, module: &ResolvedModule) -> Vec<String> {
        Self::installed(module).requirements()
    }
}
