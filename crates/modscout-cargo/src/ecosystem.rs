//! Rust ecosystem implementation.

use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

use modscout_core::{
    DiscoverRequest, DiscoveryBatch, DiscoveryEngine, Ecosystem, EcosystemKind, EngineSettings,
    IntrospectRequest, ModuleDescriptor, ResultCache, SearchRequest, ValidateRequest,
    ValidationOutcome,
};

use crate::resolver::CargoResolver;

/// Rust ecosystem.
///
/// Validates `use` paths against Cargo.toml (renames and `-`/`_` spelling
/// included) and introspects crate sources found in `vendor/`, the cargo
/// registry cache, or through `cargo metadata`.
pub struct CargoEcosystem {
    engine: DiscoveryEngine<CargoResolver>,
}

impl CargoEcosystem {
    pub fn new(cache: Arc<ResultCache>, settings: EngineSettings) -> Self {
        Self {
            engine: DiscoveryEngine::new(CargoResolver::new(), cache, settings),
        }
    }

    pub fn engine(&self) -> &DiscoveryEngine<CargoResolver> {
        &self.engine
    }
}

#[async_trait]
impl Ecosystem for CargoEcosystem {
    fn kind(&self) -> EcosystemKind {
        EcosystemKind::Rust
    }

    fn manifest_filenames(&self) -> &'static [&'static str] {
        &["Cargo.toml"]
    }

    async fn discover_packages(&self, request: &DiscoverRequest) -> DiscoveryBatch {
        self.engine.discover_packages(request).await
    }

    async fn validate_import(&self, request: &ValidateRequest) -> ValidationOutcome {
        self.engine.validate_import(request).await
    }

    async fn introspect_module(&self, request: &IntrospectRequest) -> ModuleDescriptor {
        self.engine.introspect_module(request).await
    }

    async fn search_affordances(&self, request: &SearchRequest) -> DiscoveryBatch {
        self.engine.search_affordances(request).await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::tests::unpack;
    use std::fs;

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            r#"
[package]
name = "app"
version = "0.1.0"

[dependencies]
serde = { version = "1.0", features = ["derive"] }
tokio-util = "0.7"
modscout-fixture-codec = "0.3"

[dev-dependencies]
tempfile = "3"
"#,
        )
        .unwrap();
        let codec = unpack(
            &dir.path().join("vendor"),
            "modscout-fixture-codec",
            "modscout-fixture-codec",
            "0.3.2",
            "use bytes::Bytes;\nmod frame;\npub use frame::*;\npub fn encode(input: &[u8]) -> Bytes {\n    todo!()\n}\npub fn _raw() {}\n",
        );
        fs::write(codec.join("src/frame.rs"), "pub struct Frame;\n").unwrap();
        dir
    }

    fn ecosystem(dir: &tempfile::TempDir) -> CargoEcosystem {
        CargoEcosystem::new(Arc::new(ResultCache::default()), EngineSettings::new(dir.path()))
    }

    #[test]
    fn test_identity() {
        let dir = tempfile::tempdir().unwrap();
        let eco = ecosystem(&dir);
        assert_eq!(eco.id(), "rust");
        assert_eq!(eco.display_name(), "Rust");
        assert!(eco.as_any().downcast_ref::<CargoEcosystem>().is_some());
    }

    #[tokio::test]
    async fn test_validate_imports() {
        let dir = project();
        let eco = ecosystem(&dir);

        let outcome = eco
            .validate_import(&ValidateRequest::new("use tokio_util::codec::Framed;"))
            .await;
        assert!(outcome.valid);
        assert_eq!(outcome.package_name, "tokio-util");

        let outcome = eco
            .validate_import(&ValidateRequest::new("use std::collections::HashMap;"))
            .await;
        assert!(outcome.valid);
        assert_eq!(
            outcome.reason.as_deref(),
            Some("'std' is part of the Rust standard library")
        );

        let outcome = eco
            .validate_import(&ValidateRequest::new("use crate::config::Settings;"))
            .await;
        assert!(outcome.valid);
        assert!(outcome.reason.is_some());
    }

    #[tokio::test]
    async fn test_validate_undeclared() {
        let dir = project();
        let outcome = ecosystem(&dir)
            .validate_import(&ValidateRequest::new("use serde_yaml::Value;"))
            .await;
        assert!(!outcome.valid);
        assert_eq!(outcome.package_name, "serde_yaml");
        assert!(outcome.reason.unwrap().contains("Cargo.toml"));
        assert_eq!(outcome.suggestions.unwrap(), vec!["serde"]);
    }

    #[tokio::test]
    async fn test_discover_vendored_crate() {
        let dir = project();
        let batch = ecosystem(&dir)
            .discover_packages(&DiscoverRequest {
                search_term: Some("codec".into()),
                include_dev_dependencies: false,
                max_results: 10,
            })
            .await;
        assert_eq!(batch.packages.len(), 1);
        let codec = &batch.packages[0];
        assert!(codec.installed);
        assert_eq!(codec.version, "0.3");
        assert_eq!(
            codec.description.as_deref(),
            Some("The modscout-fixture-codec crate")
        );
    }

    #[tokio::test]
    async fn test_introspect_crate() {
        let dir = project();
        let module = ecosystem(&dir)
            .introspect_module(&IntrospectRequest::new("modscout_fixture_codec"))
            .await;
        assert!(module.is_resolved());
        let names: Vec<&str> = module.exports.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["encode", "Frame"]);
        assert_eq!(module.submodules, vec!["frame"]);
        assert_eq!(module.dependencies, vec!["itoa", "bytes"]);
    }

    #[tokio::test]
    async fn test_introspect_std_module() {
        let dir = project();
        let module = ecosystem(&dir)
            .introspect_module(&IntrospectRequest::new("std::collections"))
            .await;
        assert_eq!(module.resolved_path, "stdlib");
        assert_eq!(module.exports.len(), 1);
    }

    #[tokio::test]
    async fn test_search_exact_name_first() {
        let dir = project();
        let batch = ecosystem(&dir)
            .search_affordances(&SearchRequest::new("serde"))
            .await;
        assert_eq!(batch.packages[0].name, "serde");
        assert!(batch.packages[0].score.unwrap() >= 100.0);
    }
}
