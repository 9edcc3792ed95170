//! Store error kinds.

use thiserror::Error;

/// Errors surfaced by the storage layer.
///
/// A duplicate sign-up is not an error; see [`SignUp`](super::SignUp).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be opened or tuned.
    #[error("storage unavailable: {0}")]
    Unavailable(#[source] rusqlite::Error),

    /// A write (insert or commit) did not land.
    #[error("write failed: {0}")]
    WriteFailure(#[source] rusqlite::Error),

    /// A read query failed.
    #[error("query failed: {0}")]
    Query(#[source] rusqlite::Error),

    /// Schema setup failed.
    #[error("schema setup failed: {0}")]
    Schema(#[source] rusqlite::Error),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
