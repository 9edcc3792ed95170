//! Event catalog rows.

use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::Fee;

/// An event users can register for.
///
/// Created out of band; read-only to request handlers. The name and fee
/// columns are nullable, so either may be missing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Auto-incrementing key.
    pub id: i64,
    pub name: Option<String>,
    pub fee: Option<Fee>,
}

impl Event {
    /// Map a `SELECT id, name, fee` row.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            fee: row.get(2)?,
        })
    }
}
