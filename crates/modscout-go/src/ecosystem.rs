//! Go ecosystem implementation.

use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

use modscout_core::{
    DiscoverRequest, DiscoveryBatch, DiscoveryEngine, Ecosystem, EcosystemKind, EngineSettings,
    IntrospectRequest, ModuleDescriptor, ResultCache, SearchRequest, ValidateRequest,
    ValidationOutcome,
};

use crate::resolver::GoResolver;

/// Go ecosystem.
///
/// Import paths are matched against go.mod requirements by module prefix.
/// Packages are read from `vendor/`, local `replace` targets or the module
/// cache, with `go list` as the fallback.
pub struct GoEcosystem {
    engine: DiscoveryEngine<GoResolver>,
}

impl GoEcosystem {
    pub fn new(cache: Arc<ResultCache>, settings: EngineSettings) -> Self {
        Self::with_resolver(GoResolver::new(), cache, settings)
    }

    pub fn with_resolver(
        resolver: GoResolver,
        cache: Arc<ResultCache>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            engine: DiscoveryEngine::new(resolver, cache, settings),
        }
    }

    pub fn engine(&self) -> &DiscoveryEngine<GoResolver> {
        &self.engine
    }
}

#[async_trait]
impl Ecosystem for GoEcosystem {
    fn kind(&self) -> EcosystemKind {
        EcosystemKind::Go
    }

    fn manifest_filenames(&self) -> &'static [&'static str] {
        &["go.mod"]
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
