use dashmap::DashMap;
use std::sync::Arc;

use crate::Ecosystem;
use crate::error::{Result, ScoutError};
use crate::types::EcosystemKind;

/// Registry of the available ecosystem engines.
///
/// Engines are looked up by canonical id or by any alias declared on their
/// [`EcosystemKind`]. Lookups are case-insensitive. Thread-safe for concurrent
/// access via `DashMap`.
///
/// # Examples
///
/// ```
/// use modscout_core::{EcosystemRegistry, ScoutError};
///
/// let registry = EcosystemRegistry::new();
/// assert!(registry.ecosystem_ids().is_empty());
/// assert!(matches!(
///     registry.resolve("cobol"),
///     Err(ScoutError::UnsupportedEcosystem(_))
/// ));
/// ```
pub struct EcosystemRegistry {
    /// Canonical id to engine
    ecosystems: DashMap<&'static str, Arc<dyn Ecosystem>>,
    /// Canonical id and every alias to canonical id
    aliases: DashMap<&'static str, &'static str>,
}

impl EcosystemRegistry {
    pub fn new() -> Self {
        Self {
            ecosystems: DashMap::new(),
            aliases: DashMap::new(),
        }
    }

    /// Registers an engine under its id and every alias of its kind.
    ///
    /// Registering a second engine for the same kind replaces the first.
    pub fn register(&self, ecosystem: Arc<dyn Ecosystem>) {
        let kind = ecosystem.kind();
        let id = kind.id();

        self.aliases.insert(id, id);
        for alias in kind.aliases() {
            self.aliases.insert(alias, id);
        }

        tracing::debug!("registered ecosystem: {}", ecosystem.display_name());
        self.ecosystems.insert(id, ecosystem);
    }

    /// Get an engine by id or alias.
    pub fn get(&self, id: &str) -> Option<Arc<dyn Ecosystem>> {
        let needle = id.trim().to_ascii_lowercase();
        let canonical = *self.aliases.get(needle.as_str())?;
        self.ecosystems.get(canonical).map(|e| Arc::clone(&e))
    }

    /// Like [`get`](Self::get), but reports an unknown id as
    /// [`ScoutError::UnsupportedEcosystem`].
    pub fn resolve(&self, id: &str) -> Result<Arc<dyn Ecosystem>> {
        self.get(id)
            .ok_or_else(|| ScoutError::UnsupportedEcosystem(id.to_string()))
    }

    pub fn get_kind(&self, kind: EcosystemKind) -> Option<Arc<dyn Ecosystem>> {
        self.ecosystems.get(kind.id()).map(|e| Arc::clone(&e))
    }

    /// Canonical ids of all registered engines, sorted.
    pub fn ecosystem_ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.ecosystems.iter().map(|e| *e.key()).collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for EcosystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}
