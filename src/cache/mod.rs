//! Cache module - Read-through TTL caches in front of the store.
//!
//! ## Architecture
//!
//! - `CacheConfig` - Capacity and TTL for one cache, `None` TTL disables it
//! - `Stamped` - A cached value tagged with the instant it was fetched
//! - `CachedSlot` - Single shared slot (the event catalog)
//! - `TypedCache` - Keyed cache backed by Moka (per-user registrations)
//!
//! Both caches follow the same discipline: the lock is held only to read or
//! write the entry, never while the store is queried. Concurrent misses may
//! each query the store; the last writer wins.
//!
//! ## Usage
//!
//! ```rust
//! let cache: TypedCache<String, Arc<[RegisteredEvent]>> =
//!     TypedCache::new("my_events", &CacheConfig::per_user().ttl_secs(5.0));
//!
//! let rows = cache.get_or_refresh_at(username, Instant::now(), || fetch(username))?;
//! cache.invalidate(username);
//! ```

mod config;
mod slot;
mod stamped;
mod typed;

pub use config::CacheConfig;
pub use slot::CachedSlot;
pub use stamped::Stamped;
pub use typed::TypedCache;
