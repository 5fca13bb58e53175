//! Bounded key/value cache whose entries go stale after a fixed window.

use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use lru::LruCache;
use tracing::debug;

use crate::ports::Clock;

/// Cached value plus when it was stored.
struct Entry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

/// LRU cache with a single freshness window for every entry.
///
/// Stale entries are dropped on read. Loads run outside the lock, so two
/// callers missing the same key at once both hit the loader; the later
/// insert wins.
pub struct TtlCache<V> {
    name: &'static str,
    entries: Mutex<LruCache<String, Entry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(name: &'static str, capacity: NonZeroUsize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            name,
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
            clock,
        }
    }

    /// Fresh value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let fresh = match entries.get(key) {
            Some(entry) => self.is_fresh(entry, now),
            None => return None,
        };
        if fresh {
            entries.get(key).map(|entry| entry.value.clone())
        } else {
            entries.pop(key);
            None
        }
    }

    pub fn insert(&self, key: impl Into<String>, value: V) {
        let stored_at = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.put(key.into(), Entry { value, stored_at });
    }

    /// Drop `key`. Returns whether something was cached under it.
    pub fn invalidate(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.pop(key).is_some()
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached value for `key`, or the result of `load` (stored on success).
    ///
    /// Errors are returned as-is and never cached.
    pub async fn get_or_load<F, Fut, E>(&self, key: &str, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            debug!(cache = self.name, key, "Cache hit");
            return Ok(value);
        }

        debug!(cache = self.name, key, "Cache miss");
        let value = load().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    fn is_fresh(&self, entry: &Entry<V>, now: DateTime<Utc>) -> bool {
        // 時計が戻った場合（age が負）は新鮮とみなす
        match (now - entry.stored_at).to_std() {
            Ok(age) => age < self.ttl,
            Err(_) => true,
        }
    }
}
