//! Cache configuration.

use std::time::Duration;

/// Configuration for a cache instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    /// Ignored by single-slot caches.
    pub max_capacity: u64,

    /// Time-to-live for cache entries. `None` disables caching entirely:
    /// every read goes to the store.
    ///
    /// Expired entries are not evicted; they are overwritten on the next miss.
    pub ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(300)), // 5 minutes
        }
    }
}

impl CacheConfig {
    /// Set max capacity for cache (builder pattern).
    #[must_use]
    pub fn max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Set time-to-live from fractional seconds.
    ///
    /// Zero or negative values disable the cache. Values too large for a
    /// `Duration` saturate.
    #[must_use]
    pub fn ttl_secs(mut self, secs: f64) -> Self {
        self.ttl = if secs > 0.0 {
            Some(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
        } else {
            None
        };
        self
    }

    /// Whether reads may be served from the cache.
    pub fn is_enabled(&self) -> bool {
        self.ttl.is_some()
    }

    /// Create config for the event catalog.
    /// A single shared slot with a short TTL.
    pub fn catalog() -> Self {
        Self {
            max_capacity: 1,
            ttl: Some(Duration::from_secs(2)),
        }
    }

    /// Create config for per-user registration lists.
    /// Disabled until a TTL is configured.
    pub fn per_user() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: None,
        }
    }
}
