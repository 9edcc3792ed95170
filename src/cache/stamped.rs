//! Timestamped cache values.

use std::time::{Duration, Instant};

/// A cached value and the instant it was fetched from the store.
#[derive(Debug, Clone)]
pub struct Stamped<V> {
    pub at: Instant,
    pub value: V,
}

impl<V> Stamped<V> {
    pub fn new(at: Instant, value: V) -> Self {
        Self { at, value }
    }

    /// Fresh while `now - at < ttl`. An `at` later than `now` counts as age zero.
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.at) < ttl
    }
}
