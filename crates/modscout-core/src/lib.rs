//! Core abstractions for modscout.
//!
//! This crate provides the engine shared by every ecosystem implementation
//! (JavaScript/TypeScript, Python, Rust, Go, Java).
//!
//! # Architecture
//!
//! modscout-core defines:
//! - **Traits**: [`ImportResolver`] (ecosystem knowledge) and [`Ecosystem`]
//!   (the four public operations)
//! - **Engine**: [`DiscoveryEngine`], the discover/validate/introspect/search
//!   algorithm written once over an `ImportResolver`
//! - **Result Cache**: bounded TTL cache shared by all engines
//! - **Scoring**: keyword/category relevance scorer and the similarity suggester
//! - **Error Types**: unified error handling across all ecosystems
//!
//! # Examples
//!
//! Wiring an ecosystem crate into a registry:
//!
//! ```no_run
//! use modscout_core::{EcosystemRegistry, ResultCache};
//! use std::sync::Arc;
//!
//! let cache = Arc::new(ResultCache::default());
//! let registry = EcosystemRegistry::new();
//! // registry.register(Arc::new(NpmEcosystem::new(Arc::clone(&cache), settings)));
//! # let _ = (cache, registry);
//! ```

pub mod cache;
pub mod ecosystem;
pub mod ecosystem_registry;
pub mod engine;
pub mod error;
pub mod introspect;
pub mod manifest;
pub mod process;
pub mod scoring;
pub mod statement;
pub mod stdlib;
pub mod suggest;
pub mod types;

pub use cache::{CacheStats, CachedPayload, ResultCache, SweepHandle, TtlCache, cache_key, spawn_sweeper};
pub use ecosystem::{Ecosystem, ImportResolver};
pub use ecosystem_registry::EcosystemRegistry;
pub use engine::{DiscoveryEngine, EngineSettings};
pub use error::{Result, ScoutError};
pub use introspect::{ResolvedModule, RuntimeBinding, RuntimeShape, StructuralScan};
pub use manifest::{LoadedManifest, ManifestDependencies, locate_manifest};
pub use stdlib::{StandardLibrary, StdlibEntry, StdlibInfo};
pub use types::{
    Category, DiscoverRequest, DiscoveryBatch, EcosystemKind, ExportDescriptor, ExportKind,
    IntrospectRequest, LATEST_VERSION, MAX_DISCOVER_RESULTS, MAX_INTROSPECT_DEPTH,
    MAX_SEARCH_RESULTS, ModuleDescriptor, PackageRecord, ParameterInfo, STDLIB_VERSION,
    SearchRequest, UNKNOWN_PACKAGE, ValidateRequest, ValidationOutcome,
};
