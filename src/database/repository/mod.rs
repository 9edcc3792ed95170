//! Repository module - decentralized data access layer.

mod event_repository;
mod registration_repository;
mod user_repository;

pub use event_repository::EventRepository;
pub use registration_repository::RegistrationRepository;
pub use user_repository::{SignUp, UserRepository};

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use tempfile::TempDir;

    use crate::database::{Database, StorageHandle, ensure_schema};

    /// A fresh database with the schema applied. Keep the `TempDir` alive.
    pub fn fresh_db() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("fest.db"), Duration::from_secs(3));
        let mut handle = db.acquire().unwrap();
        ensure_schema(&mut handle).unwrap();
        (dir, db)
    }

    pub fn seed_event(handle: &StorageHandle, name: &str, fee: i64) -> i64 {
        handle
            .execute("INSERT INTO events (name, fee) VALUES (?1, ?2)", (name, fee))
            .unwrap();
        handle.last_insert_rowid()
    }
}
