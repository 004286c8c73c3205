//! Java ecosystem implementation.

use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

use modscout_core::{
    DiscoverRequest, DiscoveryBatch, DiscoveryEngine, Ecosystem, EcosystemKind, EngineSettings,
    IntrospectRequest, ModuleDescriptor, ResultCache, SearchRequest, ValidateRequest,
    ValidationOutcome,
};

use crate::resolver::MavenResolver;

/// Java ecosystem.
///
/// Maps import packages onto pom.xml coordinates and lists the public
/// classes of artifacts downloaded to the local Maven repository.
pub struct MavenEcosystem {
    engine: DiscoveryEngine<MavenResolver>,
}

impl MavenEcosystem {
    pub fn new(cache: Arc<ResultCache>, settings: EngineSettings) -> Self {
        Self::with_resolver(MavenResolver::new(), cache, settings)
    }

    pub fn with_resolver(
        resolver: MavenResolver,
        cache: Arc<ResultCache>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            engine: DiscoveryEngine::new(resolver, cache, settings),
        }
    }

    pub fn engine(&self) -> &DiscoveryEngine<MavenResolver> {
        &self.engine
    }
}

#[async_trait]
impl Ecosystem for MavenEcosystem {
    fn kind(&self) -> EcosystemKind {
        EcosystemKind::Java
    }

    fn manifest_filenames(&self) -> &'static [&'static str] {
        &["pom.xml"]
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
