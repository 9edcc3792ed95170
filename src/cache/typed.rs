//! Typed keyed cache wrapper around Moka.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::sync::Cache;
use tracing::debug;

use super::{CacheConfig, Stamped};

/// A typed keyed cache with a fixed TTL.
///
/// This cache is:
/// - Thread-safe (Moka's concurrent map, no lock held across store I/O)
/// - Bounded by `max_capacity`; TTL is checked on read, so expired entries
///   stay until overwritten, invalidated or evicted for space
/// - Clone-friendly (cloning is cheap, shares the same underlying cache)
pub struct TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Cache<K, Stamped<V>>>,
    name: Arc<str>,
    ttl: Option<Duration>,
}

// Manual Clone implementation that doesn't require K: Clone, V: Clone
impl<K, V> Clone for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            name: Arc::clone(&self.name),
            ttl: self.ttl,
        }
    }
}

impl<K, V> TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a new typed cache with the given name and config.
    pub fn new(name: impl Into<Arc<str>>, config: &CacheConfig) -> Self {
        // TTL is enforced by `Stamped`, not by Moka, so stale entries are
        // replaced on the next miss instead of expiring in the background.
        let inner = Cache::builder().max_capacity(config.max_capacity).build();

        Self {
            inner: Arc::new(inner),
            name: name.into(),
            ttl: config.ttl,
        }
    }

    /// Whether reads may be served from the cache.
    pub fn is_enabled(&self) -> bool {
        self.ttl.is_some()
    }

    /// Get a value from the cache if it is fresh at `now`.
    pub fn get_at<Q>(&self, key: &Q, now: Instant) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let ttl = self.ttl?;
        self.inner
            .get(key)
            .filter(|entry| entry.is_fresh(now, ttl))
            .map(|entry| entry.value)
    }

    /// Insert a value fetched at `now`, replacing any previous entry.
    ///
    /// No-op when the cache is disabled.
    pub fn insert_at(&self, key: K, now: Instant, value: V) {
        if self.ttl.is_none() {
            return;
        }
        self.inner.insert(key, Stamped::new(now, value));
    }

    /// Check if a key has an entry, fresh or not.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.contains_key(key)
    }

    /// Remove a key from the cache. No-op if absent.
    pub fn invalidate<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.invalidate(key);
    }

    /// Return the fresh cached value for `key`, or run `fetch` and store its
    /// result stamped with `now`.
    ///
    /// When disabled, `fetch` runs on every call and nothing is stored.
    /// A failed fetch leaves the entry as it was.
    pub fn get_or_refresh_at<Q, F, E>(&self, key: &Q, now: Instant, fetch: F) -> Result<V, E>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
        F: FnOnce() -> Result<V, E>,
    {
        if !self.is_enabled() {
            return fetch();
        }

        if let Some(value) = self.get_at(key, now) {
            debug!("Cache '{}' hit", self.name);
            return Ok(value);
        }

        debug!("Cache '{}' miss, fetching", self.name);
        let value = fetch()?;
        self.insert_at(key.to_owned(), now, value.clone());
        Ok(value)
    }
}

impl<K, V> std::fmt::Debug for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedCache")
            .field("name", &self.name)
            .field("ttl", &self.ttl)
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}
