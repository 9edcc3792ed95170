//! Event catalog repository.
//!
//! The whole catalog is cached in one shared slot with a short TTL.
//! There is no invalidation hook: the catalog is treated as near-static
//! and new events show up once the TTL lapses.

use std::sync::Arc;
use std::time::Instant;

use rusqlite::params;
use tracing::debug;

use crate::cache::{CacheConfig, CachedSlot};
use crate::database::{Event, Result, StorageHandle, StoreError};

/// Repository for the event catalog.
#[derive(Debug, Clone)]
pub struct EventRepository {
    cache: CachedSlot<Arc<[Event]>>,
}

impl EventRepository {
    /// Create a new repository; a disabled `config` queries on every call.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            cache: CachedSlot::new("events", config),
        }
    }

    /// Get every event, from the cache when fresh.
    pub fn catalog(&self, handle: &StorageHandle) -> Result<Arc<[Event]>> {
        self.catalog_at(handle, Instant::now())
    }

    /// Get every event as of `now`.
    pub fn catalog_at(&self, handle: &StorageHandle, now: Instant) -> Result<Arc<[Event]>> {
        self.cache.get_or_refresh_at(now, || Self::fetch_all(handle))
    }

    /// Get directly from DB (internal).
    fn fetch_all(handle: &StorageHandle) -> Result<Arc<[Event]>> {
        let mut stmt = handle
            .prepare_cached("SELECT id, name, fee FROM events")
            .map_err(StoreError::Query)?;
        let events = stmt
            .query_map([], Event::from_row)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(StoreError::Query)?;

        debug!("DB fetched {} events", events.len());
        Ok(events.into())
    }

    /// Insert a new event and return its id.
    ///
    /// Used for seeding; the cached catalog is left alone.
    pub fn create(&self, handle: &StorageHandle, name: &str, fee: i64) -> Result<i64> {
        handle
            .execute("INSERT INTO events (name, fee) VALUES (?1, ?2)", params![name, fee])
            .map_err(StoreError::WriteFailure)?;
        let id = handle.last_insert_rowid();

        debug!("Created event {} ({})", id, name);
        Ok(id)
    }
}
