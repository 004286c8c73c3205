use async_trait::async_trait;
use std::any::Any;
use std::path::Path;
use std::time::Duration;

use crate::introspect::{self, ResolvedModule, RuntimeBinding, StructuralScan};
use crate::manifest::{LoadedManifest, ManifestDependencies};
use crate::stdlib::StandardLibrary;
use crate::types::{
    DiscoverRequest, DiscoveryBatch, EcosystemKind, IntrospectRequest, ModuleDescriptor,
    SearchRequest, ValidateRequest, ValidationOutcome,
};

/// Ecosystem-specific knowledge plugged into the shared discovery engine.
///
/// Implementations are stateless apart from their static tables. Every method
/// is best effort: parse failures and missing tools yield empty results and
/// are logged, never propagated.
#[async_trait]
pub trait ImportResolver: Send + Sync + 'static {
    fn kind(&self) -> EcosystemKind;

    /// Manifest file names in priority order within one directory.
    fn manifest_filenames(&self) -> &'static [&'static str];

    /// Parses the manifest at `path`. Unreadable or malformed files yield
    /// empty maps.
    fn parse_manifest(&self, path: &Path) -> ManifestDependencies;

    /// Extracts the root identifier an import statement refers to.
    fn extract_root(&self, statement: &str) -> Option<String>;

    fn stdlib(&self) -> &StandardLibrary;

    /// Name of the declared dependency that provides `root`, if any.
    fn match_declared(&self, root: &str, deps: &ManifestDependencies) -> Option<String> {
        deps.contains(root).then(|| root.to_string())
    }

    /// Informational reason when `root` refers to project-local code.
    fn local_import_reason(&self, _root: &str, _manifest: &LoadedManifest) -> Option<String> {
        None
    }

    fn is_private(&self, name: &str) -> bool {
        introspect::underscore_private(name)
    }

    /// File suffixes counted as source files when listing submodules.
    fn source_extensions(&self) -> &'static [&'static str];

    /// Finds an installed copy of `name` relative to the project manifest.
    fn locate_installed(&self, name: &str, manifest: &LoadedManifest) -> Option<ResolvedModule>;

    /// Asks the ecosystem's own toolchain where `name` lives.
    async fn resolve_with_toolchain(
        &self,
        _name: &str,
        _project_dir: &Path,
        _timeout: Duration,
    ) -> Option<ResolvedModule> {
        None
    }

    /// First tier: static analysis of the module's entry source.
    fn structural_exports(&self, module: &ResolvedModule, max_depth: usize) -> StructuralScan;

    /// Second tier: load the module in its runtime and list its bindings.
    async fn runtime_exports(
        &self,
        _module: &ResolvedModule,
        _project_dir: &Path,
        _timeout: Duration,
    ) -> Vec<RuntimeBinding> {
        Vec::new()
    }

    /// Third tier: export subpaths declared by the module's own manifest.
    fn manifest_exports(&self, _module: &ResolvedModule) -> Vec<String> {
        Vec::new()
    }

    fn submodules(&self, module: &ResolvedModule) -> Vec<String> {
        let dir = module
            .entry
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(&module.root);
        introspect::sibling_sources(dir, module.entry.as_deref(), self.source_extensions())
    }

    /// Dependencies declared by the module's own manifest, if it ships one.
    fn module_dependencies(&self, module: &ResolvedModule) -> Vec<String> {
        self.manifest_filenames()
            .iter()
            .map(|filename| module.root.join(filename))
            .find(|path| path.is_file())
            .map(|path| {
                self.parse_manifest(&path)
                    .dependencies
                    .into_keys()
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// The four discovery operations, one implementation per ecosystem.
///
/// Operations never fail: anything that goes wrong below this boundary turns
/// into an empty batch, an invalid outcome, or an unresolved descriptor.
///
/// # Examples
///
/// ```no_run
/// use modscout_core::{Ecosystem, ValidateRequest};
///
/// async fn check(ecosystem: &dyn Ecosystem) -> bool {
///     let outcome = ecosystem
///         .validate_import(&ValidateRequest::new("import { z } from 'zod'"))
///         .await;
///     outcome.valid
/// }
/// ```
#[async_trait]
pub trait Ecosystem: Send + Sync {
    fn kind(&self) -> EcosystemKind;

    /// Canonical identifier (e.g. "javascript", "python").
    fn id(&self) -> &'static str {
        self.kind().id()
    }

    /// Human-readable name used in validation reasons.
    fn display_name(&self) -> &'static str {
        self.kind().display_name()
    }

    fn manifest_filenames(&self) -> &'static [&'static str];

    async fn discover_packages(&self, request: &DiscoverRequest) -> DiscoveryBatch;

    async fn validate_import(&self, request: &ValidateRequest) -> ValidationOutcome;

    async fn introspect_module(&self, request: &IntrospectRequest) -> ModuleDescriptor;

    async fn search_affordances(&self, request: &SearchRequest) -> DiscoveryBatch;

    /// Downcast to the concrete ecosystem type.
    fn as_any(&self) -> &dyn Any;
}
