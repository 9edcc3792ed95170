//! Request layer.
//!
//! One method per user-facing operation. Every call acquires its own
//! storage handle and drops it before returning, on success and on error.
//! `App` is cheap to clone and can be shared across worker threads.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Config;
use crate::database::{
    Database, Event, EventRepository, RegisteredEvent, RegistrationRepository, Result, SignUp,
    User, UserRepository, ensure_schema,
};

#[derive(Debug, Clone)]
pub struct App {
    db: Database,
    events: EventRepository,
    registrations: RegistrationRepository,
    users: UserRepository,
}

impl App {
    /// Wire repositories around an existing database provider.
    pub fn new(db: Database, config: &Config) -> Self {
        Self {
            db,
            events: EventRepository::new(&config.events_cache),
            registrations: RegistrationRepository::new(&config.my_events_cache),
            users: UserRepository::new(),
        }
    }

    /// Open the database, ensure the schema exists and build the app.
    ///
    /// # Errors
    /// Any failure here is fatal; the process should not start serving.
    pub fn startup(config: &Config) -> Result<Self> {
        let db = Database::from_config(config);

        let mut handle = db.acquire()?;
        ensure_schema(&mut handle)?;
        handle.close()?;

        info!("Database ready at {}", db.path().display());
        Ok(Self::new(db, config))
    }

    /// Create an account.
    pub fn sign_up(&self, username: &str, password: &str) -> Result<SignUp> {
        let handle = self.db.acquire()?;
        self.users.create(&handle, &User::new(username, password))
    }

    /// Check credentials.
    pub fn log_in(&self, username: &str, password: &str) -> Result<bool> {
        let handle = self.db.acquire()?;
        let user = self.users.authenticate(&handle, username, password)?;
        debug!("Login for {}: {}", username, user.is_some());
        Ok(user.is_some())
    }

    /// List the event catalog.
    pub fn events(&self) -> Result<Arc<[Event]>> {
        let handle = self.db.acquire()?;
        self.events.catalog(&handle)
    }

    /// Register `username` for `event_id`.
    pub fn register_event(&self, username: &str, event_id: i64) -> Result<()> {
        let mut handle = self.db.acquire()?;
        self.registrations.register(&mut handle, username, event_id)
    }

    /// List the events `username` is registered for.
    pub fn my_events(&self, username: &str) -> Result<Arc<[RegisteredEvent]>> {
        let handle = self.db.acquire()?;
        self.registrations.my_events(&handle, username)
    }

    /// Add an event to the catalog.
    pub fn add_event(&self, name: &str, fee: i64) -> Result<i64> {
        let handle = self.db.acquire()?;
        self.events.create(&handle, name, fee)
    }
}
