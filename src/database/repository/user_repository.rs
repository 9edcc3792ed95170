//! User account repository.
//!
//! Not cached: sign-up and login are rare next to catalog reads.

use rusqlite::{ErrorCode, OptionalExtension, params};
use tracing::{debug, warn};

use crate::database::{Result, StorageHandle, StoreError, User};

/// Outcome of a sign-up attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUp {
    Created,
    /// The username is already registered. Shown to the user, not raised.
    UsernameTaken,
}

/// Repository for user accounts.
#[derive(Debug, Clone, Default)]
pub struct UserRepository;

impl UserRepository {
    pub fn new() -> Self {
        Self
    }

    /// Create an account.
    ///
    /// A duplicate username is recovered here and reported as
    /// [`SignUp::UsernameTaken`].
    pub fn create(&self, handle: &StorageHandle, user: &User) -> Result<SignUp> {
        let inserted = handle.execute(
            "INSERT INTO users (username, password) VALUES (?1, ?2)",
            params![user.username, user.password],
        );

        match inserted {
            Ok(_) => {
                debug!("Created user {}", user.username);
                Ok(SignUp::Created)
            }
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                warn!("Sign-up rejected, username {} already exists", user.username);
                Ok(SignUp::UsernameTaken)
            }
            Err(e) => Err(StoreError::WriteFailure(e)),
        }
    }

    /// Look up an account by username and password.
    ///
    /// Passwords are compared as stored, in plain text.
    pub fn authenticate(&self, handle: &StorageHandle, username: &str, password: &str) -> Result<Option<User>> {
        handle
            .query_row(
                "SELECT username, password FROM users WHERE username = ?1 AND password = ?2",
                params![username, password],
                |row| {
                    Ok(User {
                        username: row.get(0)?,
                        password: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(StoreError::Query)
    }
}
