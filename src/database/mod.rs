//! Database module exports.

mod error;
mod models;
mod repository;
mod schema;
mod sqlite;

pub use error::{Result, StoreError};
pub use models::*;
pub use repository::{EventRepository, RegistrationRepository, SignUp, UserRepository};
pub use schema::ensure_schema;
pub use sqlite::{Database, StorageHandle};
