//! Python ecosystem implementation.

use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

use modscout_core::{
    DiscoverRequest, DiscoveryBatch, DiscoveryEngine, Ecosystem, EcosystemKind, EngineSettings,
    IntrospectRequest, ModuleDescriptor, ResultCache, SearchRequest, ValidateRequest,
    ValidationOutcome,
};

use crate::resolver::PypiResolver;

/// Python ecosystem.
///
/// Provides discovery for pyproject.toml and requirements.txt projects:
/// - PEP 621, PEP 735 and Poetry dependency tables
/// - validation with PEP 503 name normalization and import aliases
/// - `__init__.py` introspection with a `python3` runtime fallback
pub struct PypiEcosystem {
    engine: DiscoveryEngine<PypiResolver>,
}

impl PypiEcosystem {
    pub fn new(cache: Arc<ResultCache>, settings: EngineSettings) -> Self {
        Self {
            engine: DiscoveryEngine::new(PypiResolver::new(), cache, settings),
        }
    }

    pub fn engine(&self) -> &DiscoveryEngine<PypiResolver> {
        &self.engine
    }
}

#[async_trait]
impl Ecosystem for PypiEcosystem {
    fn kind(&self) -> EcosystemKind {
        EcosystemKind::Python
    }

    fn manifest_filenames(&self) -> &'static [&'static str] {
        &["pyproject.toml", "requirements.txt"]
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
    use crate::site::tests::{install, site_packages};
    use std::fs;

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("pyproject.toml"),
            r#"
[project]
name = "app"
dependencies = ["requests>=2.31", "PyYAML", "scikit-learn"]

[dependency-groups]
dev = ["pytest>=8"]
"#,
        )
        .unwrap();
        let site = site_packages(dir.path());
        install(
            &site,
            "requests",
            "2.31.0",
            "requests",
            "from .api import get, post\n__all__ = ['get', 'post', 'Session']\nclass Session:\n    pass\n",
        );
        fs::write(
            site.join("requests/api.py"),
            "def get(url, params=None, **kwargs):\n    pass\n\ndef post(url, data=None, json=None, **kwargs):\n    pass\n",
        )
        .unwrap();
        dir
    }

    fn ecosystem(dir: &tempfile::TempDir) -> PypiEcosystem {
        PypiEcosystem::new(Arc::new(ResultCache::default()), EngineSettings::new(dir.path()))
    }

    #[tokio::test]
    async fn test_validate_alias_and_stdlib() {
        let dir = project();
        let eco = ecosystem(&dir);

        let outcome = eco.validate_import(&ValidateRequest::new("import yaml")).await;
        assert!(outcome.valid);
        assert_eq!(outcome.package_name, "PyYAML");

        let outcome = eco
            .validate_import(&ValidateRequest::new("from sklearn.linear_model import LinearRegression"))
            .await;
        assert!(outcome.valid);

        let outcome = eco.validate_import(&ValidateRequest::new("import os.path")).await;
        assert!(outcome.valid);
        assert!(outcome.reason.unwrap().contains("Python standard library"));
    }

    #[tokio::test]
    async fn test_validate_unknown_and_relative() {
        let dir = project();
        let eco = ecosystem(&dir);

        let outcome = eco.validate_import(&ValidateRequest::new("import requests_oauth")).await;
        assert!(!outcome.valid);
        assert_eq!(outcome.suggestions.unwrap()[0], "requests");

        let outcome = eco.validate_import(&ValidateRequest::new("from . import views")).await;
        assert!(outcome.valid);
        assert!(outcome.reason.is_some());

        let outcome = eco.validate_import(&ValidateRequest::new("x = 1")).await;
        assert!(!outcome.valid);
        assert_eq!(outcome.package_name, "unknown");
    }

    #[tokio::test]
    async fn test_discover_dev_dependencies() {
        let dir = project();
        let eco = ecosystem(&dir);

        let batch = eco
            .discover_packages(&DiscoverRequest {
                search_term: Some("pytest".into()),
                include_dev_dependencies: false,
                max_results: 10,
            })
            .await;
        assert!(batch.packages.iter().all(|p| p.name != "pytest"));

        let batch = eco
            .discover_packages(&DiscoverRequest {
                search_term: Some("pytest".into()),
                include_dev_dependencies: true,
                max_results: 10,
            })
            .await;
        assert_eq!(batch.packages[0].name, "pytest");
        assert!(!batch.packages[0].installed);
    }

    #[tokio::test]
    async fn test_discover_installed_description() {
        let dir = project();
        let batch = ecosystem(&dir)
            .discover_packages(&DiscoverRequest {
                search_term: Some("requests".into()),
                include_dev_dependencies: false,
                max_results: 10,
            })
            .await;
        let requests = &batch.packages[0];
        assert!(requests.installed);
        assert_eq!(requests.description.as_deref(), Some("The requests package"));
    }

    #[tokio::test]
    async fn test_introspect_honours_all() {
        let dir = project();
        let module = ecosystem(&dir)
            .introspect_module(&IntrospectRequest::new("requests"))
            .await;
        let names: Vec<&str> = module.exports.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["get", "post", "Session"]);
        assert_eq!(module.submodules, vec!["api"]);
        assert_eq!(module.dependencies, vec!["numpy"]);
    }
}
