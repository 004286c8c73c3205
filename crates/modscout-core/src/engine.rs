//! The discovery algorithm shared by every ecosystem.
//!
//! [`DiscoveryEngine`] composes an [`ImportResolver`] with the shared result
//! cache. All four operations are read-through cached under a key built from
//! the operation name, the ecosystem id, every request field and the project
//! directory the request was evaluated against.

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CachedPayload, ResultCache, cache_key};
use crate::ecosystem::ImportResolver;
use crate::introspect::{self, ResolvedModule};
use crate::manifest::{LoadedManifest, locate_manifest};
use crate::process::DEFAULT_PROCESS_TIMEOUT;
use crate::scoring;
use crate::suggest::suggest;
use crate::types::{
    DiscoverRequest, DiscoveryBatch, ExportDescriptor, ExportKind, IntrospectRequest,
    ModuleDescriptor, PackageRecord, SearchRequest, ValidateRequest, ValidationOutcome,
};

/// Runtime settings shared by every engine in a registry.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Directory the manifest search starts from.
    pub project_root: PathBuf,
    /// Upper bound on each external tool invocation.
    pub process_timeout: Duration,
    /// When false, results are neither read from nor written to the cache.
    pub cache_enabled: bool,
}

impl EngineSettings {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Self::default()
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            project_root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            process_timeout: DEFAULT_PROCESS_TIMEOUT,
            cache_enabled: true,
        }
    }
}

pub struct DiscoveryEngine<R> {
    resolver: R,
    cache: Arc<ResultCache>,
    settings: EngineSettings,
}

impl<R: ImportResolver> DiscoveryEngine<R> {
    pub fn new(resolver: R, cache: Arc<ResultCache>, settings: EngineSettings) -> Self {
        Self {
            resolver,
            cache,
            settings,
        }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Locates and parses the nearest manifest above `start`.
    pub fn load_manifest(&self, start: &Path) -> LoadedManifest {
        match locate_manifest(start, self.resolver.manifest_filenames()) {
            Some(path) => {
                let deps = self.resolver.parse_manifest(&path);
                LoadedManifest {
                    path: Some(path),
                    deps,
                }
            }
            None => {
                tracing::debug!(
                    ecosystem = %self.resolver.kind(),
                    "no manifest found above {}",
                    start.display()
                );
                LoadedManifest::default()
            }
        }
    }

    fn cached(&self, key: &str) -> Option<CachedPayload> {
        if !self.settings.cache_enabled {
            return None;
        }
        let hit = self.cache.get(key);
        if hit.is_some() {
            tracing::debug!("cache hit: {key}");
        } else {
            tracing::debug!("cache miss: {key}");
        }
        hit
    }

    fn store(&self, key: String, payload: CachedPayload) {
        if self.settings.cache_enabled {
            self.cache.set(key, payload);
        }
    }

    fn project_dir_key(&self) -> String {
        self.settings.project_root.to_string_lossy().into_owned()
    }

    pub async fn discover_packages(&self, request: &DiscoverRequest) -> DiscoveryBatch {
        let max = request.max_results.to_string();
        let dev = request.include_dev_dependencies.to_string();
        let dir = self.project_dir_key();
        let key = cache_key(
            "discover_packages",
            &[
                Some(self.resolver.kind().id()),
                request.search_term.as_deref(),
                Some(dev.as_str()),
                Some(max.as_str()),
                Some(dir.as_str()),
            ],
        );

        if let Some(CachedPayload::Batch(batch)) = self.cached(&key) {
            return batch;
        }

        let batch = self.compute_discovery(request);
        self.store(key, CachedPayload::Batch(batch.clone()));
        batch
    }

    fn compute_discovery(&self, request: &DiscoverRequest) -> DiscoveryBatch {
        let manifest = self.load_manifest(&self.settings.project_root);
        let term = request
            .search_term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);
        let matches = |name: &str| {
            term.as_deref()
                .is_none_or(|t| name.to_lowercase().contains(t))
        };
        let declared_path = manifest
            .path
            .as_deref()
            .map(|p| p.to_string_lossy().into_owned());

        let mut packages: Vec<PackageRecord> = manifest
            .deps
            .entries(request.include_dev_dependencies)
            .into_iter()
            .filter(|(name, _, _)| matches(name))
            .map(|(name, version, _)| {
                let mut record = PackageRecord::declared(name, version);
                if let Some(module) = self.resolver.locate_installed(name, &manifest) {
                    record.installed = true;
                    record.description = module.description;
                }
                record.declared_path.clone_from(&declared_path);
                record
            })
            .collect();

        if packages.len() < request.max_results {
            let stdlib_records: Vec<PackageRecord> = self
                .resolver
                .stdlib()
                .entries()
                .iter()
                .filter(|entry| matches(entry.name))
                .filter(|entry| !packages.iter().any(|p| p.name == entry.name))
                .map(|entry| PackageRecord::stdlib(entry.name, entry.description))
                .collect();
            packages.extend(stdlib_records);
        }

        let total_found = packages.len();
        packages.truncate(request.max_results);

        tracing::debug!(
            ecosystem = %self.resolver.kind(),
            total_found,
            returned = packages.len(),
            "discovered packages"
        );

        DiscoveryBatch {
            packages,
            total_found,
            search_term: request.search_term.clone(),
            ecosystem: self.resolver.kind(),
            produced_at: Utc::now(),
        }
    }

    pub async fn validate_import(&self, request: &ValidateRequest) -> ValidationOutcome {
        // relative project paths are taken from the project root
        let start = request
            .project_path
            .as_deref()
            .map_or_else(|| self.settings.project_root.clone(), |path| {
                self.settings.project_root.join(path)
            });
        let dir = start.to_string_lossy().into_owned();
        let key = cache_key(
            "validate_import",
            &[
                Some(self.resolver.kind().id()),
                Some(request.import_statement.as_str()),
                Some(dir.as_str()),
            ],
        );

        if let Some(CachedPayload::Validation(outcome)) = self.cached(&key) {
            return outcome;
        }

        let outcome = self.compute_validation(&request.import_statement, &start);
        self.store(key, CachedPayload::Validation(outcome.clone()));
        outcome
    }

    fn compute_validation(&self, statement: &str, start: &Path) -> ValidationOutcome {
        let Some(root) = self.resolver.extract_root(statement) else {
            tracing::debug!("could not parse import statement: {statement}");
            return ValidationOutcome::unparseable();
        };
        let display = self.resolver.kind().display_name();

        if self.resolver.stdlib().is_standard_library(&root) {
            return ValidationOutcome::resolved(
                root.clone(),
                None,
                Some(format!("'{root}' is part of the {display} standard library")),
            );
        }

        let manifest = self.load_manifest(start);

        if let Some(declared) = self.resolver.match_declared(&root, &manifest.deps) {
            let resolved_path = self
                .resolver
                .locate_installed(&declared, &manifest)
                .map(|module| module.display_path());
            return ValidationOutcome::resolved(declared, resolved_path, None);
        }

        if let Some(reason) = self.resolver.local_import_reason(&root, &manifest) {
            return ValidationOutcome::resolved(root, None, Some(reason));
        }

        let suggestions = suggest(&root, manifest.deps.names(), self.resolver.stdlib().names());
        let reason = match manifest.file_name() {
            Some(file) => format!(
                "'{root}' is not declared in {file} and is not part of the {display} standard library"
            ),
            None => format!(
                "'{root}' is not part of the {display} standard library and no {} was found",
                self.resolver.manifest_filenames().join(" or ")
            ),
        };
        ValidationOutcome::unresolved(root, reason, suggestions)
    }

    pub async fn introspect_module(&self, request: &IntrospectRequest) -> ModuleDescriptor {
        let private = request.include_private.to_string();
        let depth = request.max_depth.to_string();
        let dir = self.project_dir_key();
        let key = cache_key(
            "introspect_module",
            &[
                Some(self.resolver.kind().id()),
                Some(request.module_name.as_str()),
                Some(private.as_str()),
                Some(depth.as_str()),
                Some(dir.as_str()),
            ],
        );

        if let Some(CachedPayload::Module(module)) = self.cached(&key) {
            return module;
        }

        let module = self.compute_introspection(request).await;
        self.store(key, CachedPayload::Module(module.clone()));
        module
    }

    async fn compute_introspection(&self, request: &IntrospectRequest) -> ModuleDescriptor {
        let name = request.module_name.trim();
        if name.is_empty() {
            return ModuleDescriptor::unresolved(name);
        }

        if let Some(entry) = self.resolver.stdlib().lookup(name) {
            return ModuleDescriptor {
                name: name.to_string(),
                resolved_path: crate::types::STDLIB_VERSION.to_string(),
                exports: vec![introspect::stdlib_export(name, entry.description)],
                submodules: Vec::new(),
                dependencies: Vec::new(),
            };
        }

        let Some(module) = self.resolve_module(name).await else {
            tracing::debug!(ecosystem = %self.resolver.kind(), "could not resolve module {name}");
            return ModuleDescriptor::unresolved(name);
        };

        let mut scan = self.resolver.structural_exports(&module, request.max_depth);
        let mut exports = std::mem::take(&mut scan.exports);

        if exports.is_empty() {
            exports = self
                .resolver
                .runtime_exports(
                    &module,
                    &self.settings.project_root,
                    self.settings.process_timeout,
                )
                .await
                .into_iter()
                .map(introspect::RuntimeBinding::into_export)
                .collect();
        }

        if exports.is_empty() {
            exports = self
                .resolver
                .manifest_exports(&module)
                .into_iter()
                .map(|subpath| ExportDescriptor::new(subpath, ExportKind::Namespace))
                .collect();
        }

        introspect::retain_visible(&mut exports, request.include_private, |n| {
            self.resolver.is_private(n)
        });

        let mut dependencies = self.resolver.module_dependencies(&module);
        for import in scan.imports {
            if !dependencies.contains(&import) {
                dependencies.push(import);
            }
        }

        ModuleDescriptor {
            name: name.to_string(),
            resolved_path: module.display_path(),
            exports,
            submodules: self.resolver.submodules(&module),
            dependencies,
        }
    }

    async fn resolve_module(&self, name: &str) -> Option<ResolvedModule> {
        let manifest = self.load_manifest(&self.settings.project_root);
        if let Some(module) = self.resolver.locate_installed(name, &manifest) {
            return Some(module);
        }

        let project_dir = manifest
            .dir()
            .map_or_else(|| self.settings.project_root.clone(), Path::to_path_buf);
        self.resolver
            .resolve_with_toolchain(name, &project_dir, self.settings.process_timeout)
            .await
    }

    pub async fn search_affordances(&self, request: &SearchRequest) -> DiscoveryBatch {
        let max = request.max_results.to_string();
        let dir = self.project_dir_key();
        let key = cache_key(
            "search_affordances",
            &[
                Some(self.resolver.kind().id()),
                Some(request.query.as_str()),
                request.category.map(|c| c.as_str()),
                Some(max.as_str()),
                Some(dir.as_str()),
            ],
        );

        if let Some(CachedPayload::Batch(batch)) = self.cached(&key) {
            return batch;
        }

        let everything = self
            .discover_packages(&DiscoverRequest {
                search_term: None,
                include_dev_dependencies: true,
                max_results: usize::MAX,
            })
            .await;

        let candidates: Vec<PackageRecord> = everything
            .packages
            .into_iter()
            .map(|mut record| {
                record.category = Some(scoring::categorize(&record));
                record
            })
            .collect();

        let ranked = scoring::rank(
            &request.query,
            candidates,
            request.category,
            request.max_results,
        );

        let batch = DiscoveryBatch {
            total_found: ranked.len(),
            packages: ranked,
            search_term: Some(request.query.clone()),
            ecosystem: self.resolver.kind(),
            produced_at: Utc::now(),
        };
        self.store(key, CachedPayload::Batch(batch.clone()));
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::{RuntimeBinding, RuntimeShape, StructuralScan};
    use crate::manifest::ManifestDependencies;
    use crate::stdlib::{StandardLibrary, StdlibEntry};
    use crate::types::{Category, EcosystemKind, UNKNOWN_PACKAGE};
    use async_trait::async_trait;
    use once_cell::sync::Lazy;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static ENTRIES: &[StdlibEntry] = &[
        StdlibEntry::new("fs", "File system access", Category::Utility),
        StdlibEntry::new("http", "HTTP server and client", Category::Network),
        StdlibEntry::new("test", "Built-in test runner", Category::Testing),
    ];

    static STDLIB: Lazy<StandardLibrary> =
        Lazy::new(|| StandardLibrary::new(ENTRIES).with_separator("/"));

    /// Line-oriented `name=version` manifest, `dev:` prefix for dev deps.
    struct FakeResolver {
        parses: AtomicUsize,
        runtime: Vec<RuntimeBinding>,
    }

    impl FakeResolver {
        fn new() -> Self {
            Self {
                parses: AtomicUsize::new(0),
                runtime: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl ImportResolver for FakeResolver {
        fn kind(&self) -> EcosystemKind {
            EcosystemKind::JavaScript
        }

        fn manifest_filenames(&self) -> &'static [&'static str] {
            &["deps.txt"]
        }

        fn parse_manifest(&self, path: &Path) -> ManifestDependencies {
            self.parses.fetch_add(1, Ordering::SeqCst);
            let mut deps = ManifestDependencies::default();
            let content = fs::read_to_string(path).unwrap_or_default();
            for line in content.lines() {
                let (dev, line) = match line.strip_prefix("dev:") {
                    Some(rest) => (true, rest),
                    None => (false, line),
                };
                if let Some((name, version)) = line.split_once('=') {
                    let target = if dev {
                        &mut deps.dev_dependencies
                    } else {
                        &mut deps.dependencies
                    };
                    target.insert(name.to_string(), version.to_string());
                }
            }
            deps
        }

        fn extract_root(&self, statement: &str) -> Option<String> {
            statement
                .strip_prefix("import ")
                .map(|rest| rest.split('/').next().unwrap_or(rest).trim().to_string())
        }

        fn stdlib(&self) -> &StandardLibrary {
            &STDLIB
        }

        fn local_import_reason(&self, root: &str, _manifest: &LoadedManifest) -> Option<String> {
            root.starts_with('.').then(|| "relative import".to_string())
        }

        fn source_extensions(&self) -> &'static [&'static str] {
            &[".js"]
        }

        fn locate_installed(&self, name: &str, manifest: &LoadedManifest) -> Option<ResolvedModule> {
            let dir = manifest.dir()?.join("mods").join(name);
            dir.is_dir()
                .then(|| ResolvedModule::new(name, &dir).with_entry(dir.join("index.js")))
        }

        fn structural_exports(&self, module: &ResolvedModule, _max_depth: usize) -> StructuralScan {
            let mut scan = StructuralScan::default();
            let content = module
                .entry
                .as_deref()
                .and_then(|p| fs::read_to_string(p).ok())
                .unwrap_or_default();
            for line in content.lines() {
                if let Some(name) = line.strip_prefix("export ") {
                    scan.push_export(ExportDescriptor::new(name.trim(), ExportKind::Function));
                }
                if let Some(target) = line.strip_prefix("uses ") {
                    scan.push_import(target.trim());
                }
            }
            scan
        }

        async fn runtime_exports(
            &self,
            _module: &ResolvedModule,
            _project_dir: &Path,
            _timeout: Duration,
        ) -> Vec<RuntimeBinding> {
            self.runtime.clone()
        }
    }

    fn project(manifest: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("deps.txt"), manifest).unwrap();
        dir
    }

    fn engine(dir: &Path) -> DiscoveryEngine<FakeResolver> {
        engine_with(dir, FakeResolver::new())
    }

    fn engine_with(dir: &Path, resolver: FakeResolver) -> DiscoveryEngine<FakeResolver> {
        let cache = Arc::new(ResultCache::new(100, Duration::from_secs(60)));
        DiscoveryEngine::new(resolver, cache, EngineSettings::new(dir))
    }

    #[tokio::test]
    async fn test_validate_declared_dependency() {
        let dir = project("vitest=^1.0.0\n");
        let outcome = engine(dir.path())
            .validate_import(&ValidateRequest::new("import vitest"))
            .await;
        assert!(outcome.valid);
        assert_eq!(outcome.package_name, "vitest");
        assert!(outcome.reason.is_none());
        assert!(outcome.suggestions.is_none());
    }

    #[tokio::test]
    async fn test_validate_stdlib_has_reason() {
        let dir = project("");
        let engine = engine(dir.path());
        for entry in ENTRIES {
            let outcome = engine
                .validate_import(&ValidateRequest::new(format!("import {}", entry.name)))
                .await;
            assert!(outcome.valid);
            let reason = outcome.reason.unwrap();
            assert!(reason.contains("standard library"));
        }
    }

    #[tokio::test]
    async fn test_validate_stdlib_before_manifest() {
        let dir = project("fs=1.0.0\n");
        let outcome = engine(dir.path())
            .validate_import(&ValidateRequest::new("import fs/promises"))
            .await;
        assert!(outcome.valid);
        assert!(outcome.reason.is_some());
    }

    #[tokio::test]
    async fn test_validate_unparseable() {
        let dir = project("");
        let outcome = engine(dir.path())
            .validate_import(&ValidateRequest::new("let x = 1"))
            .await;
        assert!(!outcome.valid);
        assert_eq!(outcome.package_name, UNKNOWN_PACKAGE);
    }

    #[tokio::test]
    async fn test_validate_unknown_with_suggestions() {
        let dir = project("fake-pkg=1.0.0\nreact=18\n");
        let outcome = engine(dir.path())
            .validate_import(&ValidateRequest::new("import totally-fake-pkg-9"))
            .await;
        assert!(!outcome.valid);
        assert_eq!(outcome.suggestions.unwrap(), vec!["fake-pkg"]);
        assert!(outcome.reason.unwrap().contains("deps.txt"));
    }

    #[tokio::test]
    async fn test_validate_local_import() {
        let dir = project("");
        let outcome = engine(dir.path())
            .validate_import(&ValidateRequest::new("import ./utils"))
            .await;
        assert!(outcome.valid);
        assert_eq!(outcome.reason.as_deref(), Some("relative import"));
    }

    #[tokio::test]
    async fn test_validate_relative_project_path() {
        let dir = project("");
        let service = dir.path().join("services/api");
        fs::create_dir_all(&service).unwrap();
        fs::write(service.join("deps.txt"), "zod=3\n").unwrap();

        let mut request = ValidateRequest::new("import zod");
        request.project_path = Some("services/api".to_string());
        let outcome = engine(dir.path()).validate_import(&request).await;
        assert!(outcome.valid);

        let outcome = engine(dir.path())
            .validate_import(&ValidateRequest::new("import zod"))
            .await;
        assert!(!outcome.valid);
    }

    #[tokio::test]
    async fn test_validate_uses_project_path() {
        let dir = project("");
        let other = project("zod=3\n");
        let mut request = ValidateRequest::new("import zod");
        request.project_path = Some(other.path().to_string_lossy().into_owned());
        let outcome = engine(dir.path()).validate_import(&request).await;
        assert!(outcome.valid);
    }

    #[tokio::test]
    async fn test_validate_is_cached() {
        let dir = project("vitest=^1.0.0\n");
        let engine = engine(dir.path());
        let request = ValidateRequest::new("import vitest");

        let first = engine.validate_import(&request).await;
        let second = engine.validate_import(&request).await;

        assert_eq!(first, second);
        assert_eq!(engine.resolver().parses.load(Ordering::SeqCst), 1);
        assert_eq!(engine.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_cache_disabled() {
        let dir = project("vitest=^1.0.0\n");
        let cache = Arc::new(ResultCache::default());
        let mut settings = EngineSettings::new(dir.path());
        settings.cache_enabled = false;
        let engine = DiscoveryEngine::new(FakeResolver::new(), cache, settings);
        let request = ValidateRequest::new("import vitest");

        engine.validate_import(&request).await;
        engine.validate_import(&request).await;

        assert_eq!(engine.resolver().parses.load(Ordering::SeqCst), 2);
        assert!(engine.cache().is_empty());
    }

    #[tokio::test]
    async fn test_discover_filters_and_truncates() {
        let dir = project(
            "vitest=1\njest-dom=2\nreact=18\ndev:testing-library=3\ndev:supertest=4\n",
        );
        let engine = engine(dir.path());
        let batch = engine
            .discover_packages(&DiscoverRequest {
                search_term: Some("TEST".into()),
                include_dev_dependencies: true,
                max_results: 5,
            })
            .await;

        assert!(batch.packages.len() <= 5);
        assert!(
            batch
                .packages
                .iter()
                .all(|p| p.name.to_lowercase().contains("test"))
        );
        assert_eq!(batch.packages[0].name, "vitest");
        // vitest, supertest, testing-library and the stdlib "test" module
        assert_eq!(batch.total_found, 4);
        assert!(batch.packages.iter().any(|p| p.is_stdlib()));
    }

    #[tokio::test]
    async fn test_discover_excludes_dev_by_default() {
        let dir = project("react=18\ndev:vitest=1\n");
        let batch = engine(dir.path())
            .discover_packages(&DiscoverRequest {
                search_term: Some("vitest".into()),
                ..DiscoverRequest::default()
            })
            .await;
        assert!(batch.packages.is_empty());
    }

    #[tokio::test]
    async fn test_discover_marks_installed_and_path() {
        let dir = project("react=18\nvue=3\n");
        fs::create_dir_all(dir.path().join("mods/react")).unwrap();
        let batch = engine(dir.path())
            .discover_packages(&DiscoverRequest::default())
            .await;

        let react = batch.packages.iter().find(|p| p.name == "react").unwrap();
        let vue = batch.packages.iter().find(|p| p.name == "vue").unwrap();
        assert!(react.installed);
        assert!(!vue.installed);
        assert!(react.declared_path.as_deref().unwrap().ends_with("deps.txt"));
    }

    #[tokio::test]
    async fn test_discover_without_manifest_lists_stdlib() {
        let dir = tempfile::tempdir().unwrap();
        let batch = engine(dir.path())
            .discover_packages(&DiscoverRequest::default())
            .await;
        assert_eq!(batch.packages.len(), ENTRIES.len());
        assert!(batch.packages.iter().all(PackageRecord::is_stdlib));
    }

    #[tokio::test]
    async fn test_introspect_stdlib_short_circuit() {
        let dir = project("");
        let module = engine(dir.path())
            .introspect_module(&IntrospectRequest::new("fs"))
            .await;
        assert_eq!(module.resolved_path, "stdlib");
        assert_eq!(module.exports.len(), 1);
        assert_eq!(module.exports[0].kind, ExportKind::Namespace);
        assert_eq!(module.exports[0].description.as_deref(), Some("File system access"));
    }

    #[tokio::test]
    async fn test_introspect_unresolved_is_empty() {
        let dir = project("");
        let module = engine(dir.path())
            .introspect_module(&IntrospectRequest::new("ghost"))
            .await;
        assert!(!module.is_resolved());
        assert!(module.exports.is_empty());
        assert!(module.dependencies.is_empty());
    }

    #[tokio::test]
    async fn test_introspect_structural_tier() {
        let dir = project("lib=1\n");
        let lib = dir.path().join("mods/lib");
        fs::create_dir_all(&lib).unwrap();
        fs::write(lib.join("index.js"), "export create\nexport _internal\nuses left-pad\n").unwrap();
        fs::write(lib.join("helpers.js"), "").unwrap();
        fs::write(lib.join("deps.txt"), "tslib=2\n").unwrap();

        let engine = engine(dir.path());
        let module = engine.introspect_module(&IntrospectRequest::new("lib")).await;
        assert!(module.resolved_path.ends_with("index.js"));
        assert_eq!(module.exports.len(), 1);
        assert_eq!(module.exports[0].name, "create");
        assert_eq!(module.submodules, vec!["helpers"]);
        assert_eq!(module.dependencies, vec!["tslib", "left-pad"]);

        let mut request = IntrospectRequest::new("lib");
        request.include_private = true;
        let module = engine.introspect_module(&request).await;
        assert_eq!(module.exports.len(), 2);
    }

    #[tokio::test]
    async fn test_introspect_runtime_fallback() {
        let dir = project("lib=1\n");
        let lib = dir.path().join("mods/lib");
        fs::create_dir_all(&lib).unwrap();
        fs::write(lib.join("index.js"), "").unwrap();

        let mut resolver = FakeResolver::new();
        resolver.runtime = vec![
            RuntimeBinding {
                name: "Client".into(),
                shape: RuntimeShape::Class,
                signature: None,
            },
            RuntimeBinding {
                name: "version".into(),
                shape: RuntimeShape::Other,
                signature: None,
            },
        ];
        let module = engine_with(dir.path(), resolver)
            .introspect_module(&IntrospectRequest::new("lib"))
            .await;
        assert_eq!(module.exports.len(), 2);
        assert_eq!(module.exports[0].kind, ExportKind::Class);
        assert_eq!(module.exports[1].kind, ExportKind::Constant);
    }

    #[tokio::test]
    async fn test_search_ranks_and_annotates() {
        let dir = project("socket.io=4\naxios=1\nlodash=4\n");
        let batch = engine(dir.path())
            .search_affordances(&SearchRequest {
                query: "http client".into(),
                category: Some(Category::Network),
                max_results: 10,
            })
            .await;

        let position = |name: &str| batch.packages.iter().position(|p| p.name == name);
        assert!(position("axios").unwrap() < position("socket.io").unwrap());
        assert!(batch.packages.iter().all(|p| p.score.is_some()));
        assert!(batch.packages.iter().all(|p| p.category.is_some()));
        assert!(batch.packages.iter().all(|p| p.name != "lodash"));
        assert_eq!(batch.search_term.as_deref(), Some("http client"));
    }
}
