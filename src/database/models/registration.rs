//! Registration rows as seen by the registering user.

use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::Fee;

/// An event a user is registered for, as listed on their own page.
///
/// Registrations carry no uniqueness constraint, so the same event may
/// appear more than once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegisteredEvent {
    pub name: Option<String>,
    pub fee: Option<Fee>,
}

impl RegisteredEvent {
    /// Map a `SELECT events.name, events.fee` row.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            fee: row.get(1)?,
        })
    }
}
