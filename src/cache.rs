//! Time-bounded response cache for model lookups.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::error::YogiError;
use crate::types::{Model, ModelVersion};

/// Default entry time-to-live: five minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// A value memoized by the registry, keyed by operation and provider.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Model(Model),
    Models(Vec<Model>),
    Versions(Vec<ModelVersion>),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: CachedValue,
    inserted_at: Instant,
}

/// Key→value store whose entries expire a fixed TTL after they are written.
///
/// Expired entries are treated as absent and removed lazily on the next
/// read; there is no size-bounded eviction. Cheap to clone — clones share
/// the underlying map.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResponseCache {
    /// Create a cache whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// TTL applied to entries written through this cache.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up an unexpired entry, deleting it when stale.
    pub fn get(&self, key: &str) -> Result<Option<CachedValue>, YogiError> {
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() <= self.ttl => {
                Ok(Some(entry.value.clone()))
            }
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Store `value` under `key`, stamped with the current time. An existing
    /// entry is overwritten and its TTL restarts.
    pub fn insert(&self, key: impl Into<String>, value: CachedValue) -> Result<(), YogiError> {
        let mut entries = self.lock()?;
        entries.insert(
            key.into(),
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
        Ok(())
    }

    /// Drop all entries immediately.
    pub fn clear(&self) -> Result<(), YogiError> {
        self.lock()?.clear();
        Ok(())
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> Result<usize, YogiError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, YogiError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, CacheEntry>>, YogiError> {
        self.entries
            .lock()
            .map_err(|e| YogiError::Internal(format!("response cache lock poisoned: {e}")))
    }
}
