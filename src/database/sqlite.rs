//! SQLite handle provider.
//!
//! Each request opens its own [`StorageHandle`] and drops it when done.
//! Tuning pragmas (journal mode, sync mode, temp storage) run once per
//! [`Database`]; the busy timeout runs on every acquire.

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info, warn};

use super::{Result, StoreError};
use crate::config::Config;

/// Tracks whether one-time store tuning has been applied.
///
/// Checked without the lock first, then again under it, so only the very
/// first acquirers contend.
#[derive(Debug, Default)]
struct ProcessTuningState {
    applied: AtomicBool,
    lock: Mutex<()>,
}

impl ProcessTuningState {
    fn is_applied(&self) -> bool {
        self.applied.load(Ordering::Acquire)
    }

    /// Run `tune` exactly once across all callers that succeed.
    ///
    /// A failed `tune` leaves the flag unset so a later call retries.
    fn ensure<F>(&self, tune: F) -> rusqlite::Result<()>
    where
        F: FnOnce() -> rusqlite::Result<()>,
    {
        if self.is_applied() {
            return Ok(());
        }

        let _guard = self.lock.lock();
        if self.is_applied() {
            return Ok(());
        }

        tune()?;
        self.applied.store(true, Ordering::Release);
        Ok(())
    }
}

/// Handle provider for the SQLite store.
///
/// Cloning is cheap; clones share the tuning state.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    busy_timeout: Duration,
    tuning: Arc<ProcessTuningState>,
}

impl Database {
    /// Create a provider for the database at `path`.
    ///
    /// Nothing is opened until the first [`acquire`](Self::acquire).
    pub fn new(path: impl Into<PathBuf>, busy_timeout: Duration) -> Self {
        Self {
            path: path.into(),
            busy_timeout,
            tuning: Arc::new(ProcessTuningState::default()),
        }
    }

    /// Create a provider from application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.database_path, config.busy_timeout)
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether store-level tuning has been applied by this provider.
    #[cfg(test)]
    pub fn is_tuned(&self) -> bool {
        self.tuning.is_applied()
    }

    /// Open a new handle to the store.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] if the file cannot be opened or
    /// the connection cannot be configured.
    pub fn acquire(&self) -> Result<StorageHandle> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(StoreError::Unavailable)?;

        self.tuning
            .ensure(|| apply_tuning(&conn))
            .map_err(StoreError::Unavailable)?;

        conn.busy_timeout(self.busy_timeout)
            .map_err(StoreError::Unavailable)?;

        Ok(StorageHandle { conn })
    }
}

/// Apply one-time tuning pragmas. Only `journal_mode` persists in the file;
/// the other two take effect on the connection that runs them.
fn apply_tuning(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA temp_store = MEMORY;",
    )?;

    info!("SQLite tuning applied");
    Ok(())
}

/// A request-scoped connection to the store.
///
/// The connection closes when the handle is dropped, on every exit path.
/// Use [`close`](Self::close) to observe close errors.
#[derive(Debug)]
pub struct StorageHandle {
    conn: Connection,
}

impl StorageHandle {
    /// Close the handle, reporting any error from SQLite.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| {
            warn!("Failed to close SQLite handle: {}", e);
            StoreError::Unavailable(e)
        })?;
        debug!("SQLite handle closed");
        Ok(())
    }
}

impl Deref for StorageHandle {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl DerefMut for StorageHandle {
    fn deref_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU32;

    use super::*;

    fn temp_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("fest.db"), Duration::from_millis(3_000));
        (dir, db)
    }

    #[test]
    fn test_first_acquire_applies_tuning() {
        let (_dir, db) = temp_db();
        assert!(!db.is_tuned());

        let handle = db.acquire().unwrap();
        assert!(db.is_tuned());

        let mode: String = handle
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn test_every_handle_gets_busy_timeout() {
        let (_dir, db) = temp_db();

        for _ in 0..2 {
            let handle = db.acquire().unwrap();
            let timeout: i64 = handle
                .query_row("PRAGMA busy_timeout", [], |row| row.get(0))
                .unwrap();
            assert_eq!(timeout, 3_000);
        }
    }

    #[test]
    fn test_clones_share_tuning_state() {
        let (_dir, db) = temp_db();
        let other = db.clone();

        db.acquire().unwrap();

        assert!(other.is_tuned());
    }

    #[test]
    fn test_tuning_runs_once_under_contention() {
        let state = ProcessTuningState::default();
        let runs = AtomicU32::new(0);

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    state
                        .ensure(|| {
                            runs.fetch_add(1, Ordering::SeqCst);
                            Ok(())
                        })
                        .unwrap();
                });
            }
        });

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(state.is_applied());
    }

    #[test]
    fn test_failed_tuning_is_retried() {
        let state = ProcessTuningState::default();

        let first = state.ensure(|| Err(rusqlite::Error::QueryReturnedNoRows));
        assert!(first.is_err());
        assert!(!state.is_applied());

        state.ensure(|| Ok(())).unwrap();
        assert!(state.is_applied());
    }

    #[test]
    fn test_unopenable_path_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("missing").join("fest.db"), Duration::ZERO);

        let err = db.acquire().unwrap_err();

        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(!db.is_tuned());
    }

    #[test]
    fn test_explicit_close() {
        let (_dir, db) = temp_db();
        let handle = db.acquire().unwrap();

        handle.close().unwrap();
    }
}
