//! Event fee values.

use std::fmt;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};
use serde::{Deserialize, Serialize};

/// A fee as stored in the `events.fee` column.
///
/// The column has integer affinity but no type constraint, so rows written
/// out of band may hold fractional amounts or text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fee {
    Int(i64),
    Real(f64),
    Text(String),
}

impl FromSql for Fee {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(i) => Ok(Fee::Int(i)),
            ValueRef::Real(f) => Ok(Fee::Real(f)),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                Ok(Fee::Text(String::from_utf8_lossy(bytes).into_owned()))
            }
            // Nullable columns are read as `Option<Fee>`.
            ValueRef::Null => Err(FromSqlError::InvalidType),
        }
    }
}

impl From<i64> for Fee {
    fn from(value: i64) -> Self {
        Fee::Int(value)
    }
}

impl fmt::Display for Fee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fee::Int(i) => fmt::Display::fmt(i, f),
            Fee::Real(r) => fmt::Display::fmt(r, f),
            Fee::Text(s) => f.pad(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::*;

    fn read(sql: &str) -> Option<Fee> {
        let conn = Connection::open_in_memory().unwrap();
        conn.query_row(sql, [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn test_reads_every_storage_class() {
        assert_eq!(read("SELECT 100"), Some(Fee::Int(100)));
        assert_eq!(read("SELECT 99.5"), Some(Fee::Real(99.5)));
        assert_eq!(read("SELECT 'free'"), Some(Fee::Text("free".into())));
        assert_eq!(read("SELECT NULL"), None);
    }

    #[test]
    fn test_display_keeps_stored_form() {
        assert_eq!(Fee::Int(50).to_string(), "50");
        assert_eq!(Fee::Real(99.5).to_string(), "99.5");
        assert_eq!(format!("{:>6}", Fee::Int(7)), "     7");
    }

    #[test]
    fn test_serializes_as_bare_value() {
        assert_eq!(serde_json::to_string(&Fee::Real(99.5)).unwrap(), "99.5");
        assert_eq!(serde_json::to_string(&Some(Fee::Int(3))).unwrap(), "3");
        assert_eq!(serde_json::to_string(&None::<Fee>).unwrap(), "null");
    }
}
