//! fest - Event registration over SQLite
//!
//! Users sign up, log in, browse events, register for events and list
//! their registrations.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - SQLite handles, schema, models and repositories
//! - `cache` - Read-through TTL caches (single slot and keyed)
//! - `app` - Request layer, one handle per request
//! - `cli` - Command-line front end

mod app;
mod cache;
mod cli;
mod config;
mod database;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;
use cli::Cli;
use config::Config;

fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fest=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("invalid configuration")?;
    info!("Configuration loaded successfully");
    info!(
        "Cache TTLs: events={:?}, my_events={:?}",
        config.events_cache.ttl, config.my_events_cache.ttl
    );

    // Schema setup is fatal on failure
    let app = App::startup(&config).context("database startup failed")?;

    cli.run(&app)
}
