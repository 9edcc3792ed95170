//! User account model.

use serde::{Deserialize, Serialize};

/// A registered account. Never mutated or deleted once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique key.
    pub username: String,
    /// Stored and compared as plain text.
    pub password: String,
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
