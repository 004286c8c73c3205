use crate::types::{DiscoveryBatch, ModuleDescriptor, ValidationOutcome};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Maximum number of cached entries to prevent unbounded memory growth.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Default time-to-live for cached results.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Delimiter joining the parts of a request fingerprint.
const KEY_DELIMITER: &str = ":";

/// Builds a request fingerprint from an operation name and its parameters.
///
/// Absent parameters are skipped, so logically identical requests always
/// produce the same key.
///
/// # Examples
///
/// ```
/// use modscout_core::cache::cache_key;
///
/// let key = cache_key("validate_import", &[Some("rust"), None, Some("use serde::Serialize;")]);
/// assert_eq!(key, "validate_import:rust:use serde::Serialize;");
/// ```
pub fn cache_key(operation: &str, parts: &[Option<&str>]) -> String {
    std::iter::once(operation)
        .chain(parts.iter().flatten().copied())
        .collect::<Vec<_>>()
        .join(KEY_DELIMITER)
}

struct CacheEntry<V> {
    value: V,
    created_at: Instant,
    ttl: Duration,
    /// Insertion rank; the smallest rank is evicted first.
    seq: u64,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) > self.ttl
    }
}

/// Point-in-time cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    /// Rough estimate in bytes: key lengths plus the fixed entry footprint.
    pub approx_memory: usize,
}

/// Bounded key-value cache with per-entry expiry.
///
/// Expired entries are evicted lazily on read and periodically by the
/// sweeper task (see [`spawn_sweeper`]). When a new key would exceed
/// `max_size`, the oldest-inserted entry is evicted first. Re-setting an
/// existing key replaces its value and expiry but keeps its insertion rank.
///
/// No operation fails: misses and expired entries simply return `None`.
///
/// # Examples
///
/// ```
/// use modscout_core::cache::TtlCache;
/// use std::time::Duration;
///
/// let cache: TtlCache<String> = TtlCache::new(2, Duration::from_secs(60));
/// cache.set("a", "1".to_string());
/// cache.set("b", "2".to_string());
/// cache.set("c", "3".to_string());
///
/// assert!(!cache.has("a"));
/// assert_eq!(cache.get("c").as_deref(), Some("3"));
/// assert_eq!(cache.stats().size, 2);
/// ```
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    max_size: usize,
    default_ttl: Duration,
    next_seq: AtomicU64,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(max_size: usize, default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_size: max_size.max(1),
            default_ttl,
            next_seq: AtomicU64::new(0),
        }
    }

    /// Returns a clone of the stored value, evicting it if it has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        {
            let entry = self.entries.get(key)?;
            if !entry.is_expired(Instant::now()) {
                return Some(entry.value.clone());
            }
        }

        self.entries
            .remove_if(key, |_, entry| entry.is_expired(Instant::now()));
        tracing::debug!("cache entry expired: {}", key);
        None
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Stores a value with the default TTL.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Stores a value, then evicts oldest-inserted entries until the cache
    /// is back within `max_size`.
    ///
    /// The new entry is visible before the trim, so concurrent writers may
    /// briefly overshoot `max_size`; every writer trims after its own insert,
    /// so the bound holds again once they all return.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let now = Instant::now();
        let inserted = match self.entries.entry(key.into()) {
            Entry::Occupied(mut occupied) => {
                let seq = occupied.get().seq;
                occupied.insert(CacheEntry {
                    value,
                    created_at: now,
                    ttl,
                    seq,
                });
                false
            }
            Entry::Vacant(vacant) => {
                vacant.insert(CacheEntry {
                    value,
                    created_at: now,
                    ttl,
                    seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                });
                true
            }
        };

        if inserted {
            while self.entries.len() > self.max_size {
                if !self.evict_oldest() {
                    break;
                }
            }
        }
    }

    pub fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn stats(&self) -> CacheStats {
        let entry_size = std::mem::size_of::<CacheEntry<V>>();
        let approx_memory = self
            .entries
            .iter()
            .map(|entry| entry.key().len() + entry_size)
            .sum();

        CacheStats {
            size: self.entries.len(),
            max_size: self.max_size,
            approx_memory,
        }
    }

    /// Removes every expired entry. Returns the number removed.
    ///
    /// Keys are collected first and removed one at a time, so no shard lock
    /// is held across the whole scan.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.value().is_expired(now))
            .map(|entry| entry.key().clone())
            .collect();

        let mut removed = 0;
        for key in expired {
            if self
                .entries
                .remove_if(&key, |_, entry| entry.is_expired(now))
                .is_some()
            {
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::debug!("swept {} expired cache entries", removed);
        }
        removed
    }

    /// Evicts the oldest-inserted entry. Returns `false` if the cache is empty.
    fn evict_oldest(&self) -> bool {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().seq)
            .map(|entry| entry.key().clone());

        match oldest {
            Some(key) => {
                self.entries.remove(&key);
                tracing::debug!("evicted oldest cache entry: {}", key);
                true
            }
            None => false,
        }
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_TTL)
    }
}

/// Handle to the background sweep task. Dropping it stops the sweep.
pub struct SweepHandle {
    task: JoinHandle<()>,
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns a task that sweeps expired entries every `ttl / 2`.
///
/// The task only holds a weak reference and exits once the cache is dropped.
/// Must be called from within a tokio runtime.
pub fn spawn_sweeper<V>(cache: &Arc<TtlCache<V>>) -> SweepHandle
where
    V: Clone + Send + Sync + 'static,
{
    let period = (cache.default_ttl / 2).max(Duration::from_millis(10));
    let weak: Weak<TtlCache<V>> = Arc::downgrade(cache);

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            interval.tick().await;
            let Some(cache) = weak.upgrade() else {
                break;
            };
            cache.sweep_expired();
        }
    });

    SweepHandle { task }
}

/// Result payloads stored in the shared cache.
#[derive(Debug, Clone)]
pub enum CachedPayload {
    Batch(DiscoveryBatch),
    Validation(ValidationOutcome),
    Module(ModuleDescriptor),
}

/// The single result cache shared by all ecosystem engines.
pub type ResultCache = TtlCache<CachedPayload>;
