//! Single-slot TTL cache.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use super::{CacheConfig, Stamped};

/// A cache holding exactly one shared value, such as a full table listing.
///
/// This cache is:
/// - Thread-safe (one mutex guards the slot)
/// - Read-through: a miss runs the caller's fetch outside the lock
/// - Clone-friendly (cloning is cheap, shares the same slot)
pub struct CachedSlot<V> {
    inner: Arc<Mutex<Option<Stamped<V>>>>,
    name: Arc<str>,
    ttl: Option<Duration>,
}

// Manual Clone implementation that doesn't require V: Clone
impl<V> Clone for CachedSlot<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            name: Arc::clone(&self.name),
            ttl: self.ttl,
        }
    }
}

impl<V: Clone> CachedSlot<V> {
    /// Create a new empty slot with the given name and config.
    pub fn new(name: impl Into<Arc<str>>, config: &CacheConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
            name: name.into(),
            ttl: config.ttl,
        }
    }

    /// Whether reads may be served from the slot.
    pub fn is_enabled(&self) -> bool {
        self.ttl.is_some()
    }

    /// Get the cached value if it is fresh at `now`.
    pub fn get_at(&self, now: Instant) -> Option<V> {
        let ttl = self.ttl?;
        let slot = self.inner.lock();
        slot.as_ref()
            .filter(|entry| entry.is_fresh(now, ttl))
            .map(|entry| entry.value.clone())
    }

    /// Overwrite the slot with a value fetched at `now`.
    ///
    /// No-op when the cache is disabled.
    pub fn store_at(&self, now: Instant, value: V) {
        if self.ttl.is_none() {
            return;
        }
        *self.inner.lock() = Some(Stamped::new(now, value));
    }

    /// Whether the slot holds a value, fresh or not.
    #[cfg(test)]
    pub fn is_populated(&self) -> bool {
        self.inner.lock().is_some()
    }

    /// Return the fresh cached value, or run `fetch` and store its result
    /// stamped with `now`.
    ///
    /// When disabled, `fetch` runs on every call and the slot is untouched.
    /// A failed fetch leaves the slot as it was.
    pub fn get_or_refresh_at<F, E>(&self, now: Instant, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if !self.is_enabled() {
            return fetch();
        }

        if let Some(value) = self.get_at(now) {
            debug!("Cache '{}' hit", self.name);
            return Ok(value);
        }

        debug!("Cache '{}' miss, fetching", self.name);
        let value = fetch()?;
        self.store_at(now, value.clone());
        Ok(value)
    }
}

impl<V> std::fmt::Debug for CachedSlot<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedSlot")
            .field("name", &self.name)
            .field("ttl", &self.ttl)
            .field("populated", &self.inner.lock().is_some())
            .finish()
    }
}
