//! JavaScript/TypeScript ecosystem implementation.
//!
//! Implements the `Ecosystem` trait for Node.js projects on top of the
//! shared discovery engine, providing:
//! - package.json dependency discovery with node_modules install checks
//! - import validation for ES modules, CommonJS and `node:` built-ins
//! - tree-sitter export introspection with a Node.js runtime fallback
//! - keyword-ranked functionality search

use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

use modscout_core::{
    DiscoverRequest, DiscoveryBatch, DiscoveryEngine, Ecosystem, EcosystemKind, EngineSettings,
    IntrospectRequest, ModuleDescriptor, ResultCache, SearchRequest, ValidateRequest,
    ValidationOutcome,
};

use crate::resolver::NpmResolver;

/// JavaScript/TypeScript ecosystem.
pub struct NpmEcosystem {
    engine: DiscoveryEngine<NpmResolver>,
}

impl NpmEcosystem {
    /// Creates the ecosystem sharing `cache` with its siblings.
    pub fn new(cache: Arc<ResultCache>, settings: EngineSettings) -> Self {
        Self {
            engine: DiscoveryEngine::new(NpmResolver::new(), cache, settings),
        }
    }

    pub fn engine(&self) -> &DiscoveryEngine<NpmResolver> {
        &self.engine
    }
}

#[async_trait]
impl Ecosystem for NpmEcosystem {
    fn kind(&self) -> EcosystemKind {
        EcosystemKind::JavaScript
    }

    fn manifest_filenames(&self) -> &'static [&'static str] {
        &["package.json"]
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
