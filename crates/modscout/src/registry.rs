use std::sync::Arc;

use modscout_cargo::CargoEcosystem;
use modscout_core::{EcosystemRegistry, EngineSettings, ResultCache};
use modscout_go::GoEcosystem;
use modscout_maven::MavenEcosystem;
use modscout_npm::NpmEcosystem;
use modscout_pypi::PypiEcosystem;

/// Registry holding all five engines over one shared result cache.
pub fn build_registry(cache: &Arc<ResultCache>, settings: &EngineSettings) -> EcosystemRegistry {
    let registry = EcosystemRegistry::new();
    registry.register(Arc::new(NpmEcosystem::new(Arc::clone(cache), settings.clone())));
    registry.register(Arc::new(PypiEcosystem::new(Arc::clone(cache), settings.clone())));
    registry.register(Arc::new(CargoEcosystem::new(Arc::clone(cache), settings.clone())));
    registry.register(Arc::new(GoEcosystem::new(Arc::clone(cache), settings.clone())));
    registry.register(Arc::new(MavenEcosystem::new(Arc::clone(cache), settings.clone())));
    registry
}
