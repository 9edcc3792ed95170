//! Registration repository with per-user caching.
//!
//! Each user's registered events are cached under their username. Writes
//! commit first and invalidate second, so a reader that starts after
//! `register` returns never sees the pre-write list. A reader that started
//! before the invalidation can still repopulate the entry with pre-write
//! rows; that window is bounded by the TTL.

use std::sync::Arc;
use std::time::Instant;

use rusqlite::params;
use tracing::debug;

use crate::cache::{CacheConfig, TypedCache};
use crate::database::{RegisteredEvent, Result, StorageHandle, StoreError};

const MY_EVENTS_QUERY: &str = "
    SELECT events.name, events.fee
    FROM events
    JOIN registrations ON events.id = registrations.event_id
    WHERE registrations.username = ?1
";

/// Repository for user registrations.
#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    cache: TypedCache<String, Arc<[RegisteredEvent]>>,
}

impl RegistrationRepository {
    /// Create a new repository; a disabled `config` queries on every call.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            cache: TypedCache::new("my_events", config),
        }
    }

    /// Get the events `username` is registered for.
    pub fn my_events(&self, handle: &StorageHandle, username: &str) -> Result<Arc<[RegisteredEvent]>> {
        self.my_events_at(handle, username, Instant::now())
    }

    /// Get the events `username` is registered for, as of `now`.
    pub fn my_events_at(
        &self,
        handle: &StorageHandle,
        username: &str,
        now: Instant,
    ) -> Result<Arc<[RegisteredEvent]>> {
        self.cache
            .get_or_refresh_at(username, now, || Self::fetch_for(handle, username))
    }

    /// Get directly from DB (internal).
    fn fetch_for(handle: &StorageHandle, username: &str) -> Result<Arc<[RegisteredEvent]>> {
        let mut stmt = handle
            .prepare_cached(MY_EVENTS_QUERY)
            .map_err(StoreError::Query)?;
        let events = stmt
            .query_map([username], RegisteredEvent::from_row)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(StoreError::Query)?;

        debug!("DB fetched {} registrations for {}", events.len(), username);
        Ok(events.into())
    }

    /// Register `username` for `event_id`.
    ///
    /// Neither the user nor the event is checked for existence, and repeat
    /// registrations are stored as separate rows. The cached list for
    /// `username` is invalidated only after the insert has committed; a
    /// failed write leaves the cache untouched.
    pub fn register(&self, handle: &mut StorageHandle, username: &str, event_id: i64) -> Result<()> {
        let tx = handle.transaction().map_err(StoreError::WriteFailure)?;
        tx.execute(
            "INSERT INTO registrations (username, event_id) VALUES (?1, ?2)",
            params![username, event_id],
        )
        .map_err(StoreError::WriteFailure)?;
        tx.commit().map_err(StoreError::WriteFailure)?;

        debug!("Registered {} for event {}", username, event_id);
        self.invalidate(username);
        Ok(())
    }

    /// Drop the cached list for `username`. No-op if nothing is cached.
    pub fn invalidate(&self, username: &str) {
        self.cache.invalidate(username);
        debug!("Invalidated my_events cache for {}", username);
    }

    /// Whether an entry, fresh or stale, is cached for `username`.
    #[cfg(test)]
    pub fn is_cached(&self, username: &str) -> bool {
        self.cache.contains(username)
    }
}
