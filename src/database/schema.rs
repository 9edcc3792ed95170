//! Schema initialization.
//!
//! Runs once at startup, before any request is served.

use tracing::info;

use super::{Result, StorageHandle, StoreError};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (username TEXT PRIMARY KEY, password TEXT)",
    "CREATE TABLE IF NOT EXISTS events (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, fee INTEGER)",
    "CREATE TABLE IF NOT EXISTS registrations (username TEXT, event_id INTEGER)",
    // Both lookup directions: a user's registrations, and an event's registrants.
    "CREATE INDEX IF NOT EXISTS idx_registrations_username ON registrations(username)",
    "CREATE INDEX IF NOT EXISTS idx_registrations_event_id ON registrations(event_id)",
];

/// Create tables and indexes if absent. Idempotent.
///
/// # Errors
/// Returns [`StoreError::Schema`]; callers should refuse to start serving.
pub fn ensure_schema(handle: &mut StorageHandle) -> Result<()> {
    let tx = handle.transaction().map_err(StoreError::Schema)?;
    for statement in SCHEMA {
        tx.execute(statement, []).map_err(StoreError::Schema)?;
    }
    tx.commit().map_err(StoreError::Schema)?;

    info!("Database schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::database::Database;

    fn names(handle: &StorageHandle, kind: &str) -> Vec<String> {
        let mut stmt = handle
            .prepare("SELECT name FROM sqlite_master WHERE type = ?1 AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        stmt.query_map([kind], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap()
    }

    #[test]
    fn test_creates_tables_and_indexes() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("fest.db"), Duration::from_secs(3));
        let mut handle = db.acquire().unwrap();

        ensure_schema(&mut handle).unwrap();

        assert_eq!(names(&handle, "table"), ["events", "registrations", "users"]);
        assert_eq!(
            names(&handle, "index"),
            ["idx_registrations_event_id", "idx_registrations_username"]
        );
    }

    #[test]
    fn test_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("fest.db"), Duration::from_secs(3));

        let mut handle = db.acquire().unwrap();
        ensure_schema(&mut handle).unwrap();
        handle
            .execute("INSERT INTO events (name, fee) VALUES ('Hackathon', 100)", [])
            .unwrap();
        drop(handle);

        let mut handle = db.acquire().unwrap();
        ensure_schema(&mut handle).unwrap();

        let count: i64 = handle
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
