//! Configuration module for fest.
//!
//! Loads configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::cache::CacheConfig;

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // SQLite
    pub database_path: PathBuf,
    /// Per-handle busy timeout. Not persisted by SQLite, so it is applied
    /// on every acquired handle.
    pub busy_timeout: Duration,

    // Caches
    pub events_cache: CacheConfig,
    pub my_events_cache: CacheConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("fest.db"),
            busy_timeout: Duration::from_millis(3_000),
            events_cache: CacheConfig::catalog(),
            my_events_cache: CacheConfig::per_user(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset keys fall back to their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_path = lookup("DATABASE_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        let busy_timeout = parse::<u64, _>(&lookup, "DB_BUSY_TIMEOUT_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.busy_timeout);

        let mut events_cache = defaults.events_cache;
        if let Some(secs) = parse_ttl(&lookup, "EVENTS_CACHE_TTL_SECONDS")? {
            events_cache = events_cache.ttl_secs(secs);
        }

        let mut my_events_cache = defaults.my_events_cache;
        if let Some(secs) = parse_ttl(&lookup, "MY_EVENTS_CACHE_TTL_SECONDS")? {
            my_events_cache = my_events_cache.ttl_secs(secs);
        }
        if let Some(capacity) = parse::<u64, _>(&lookup, "MY_EVENTS_CACHE_CAPACITY")? {
            my_events_cache = my_events_cache.max_capacity(capacity);
        }

        Ok(Self {
            database_path,
            busy_timeout,
            events_cache,
            my_events_cache,
        })
    }
}

fn parse<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn parse_ttl<F>(lookup: &F, key: &'static str) -> Result<Option<f64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse::<f64, _>(lookup, key)? {
        Some(secs) if secs.is_nan() => Err(ConfigError::Invalid {
            key,
            value: secs.to_string(),
        }),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.database_path, PathBuf::from("fest.db"));
        assert_eq!(config.busy_timeout, Duration::from_millis(3_000));
        assert_eq!(config.events_cache.ttl, Some(Duration::from_secs(2)));
        assert_eq!(config.my_events_cache.ttl, None);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_PATH", "/tmp/other.db"),
            ("DB_BUSY_TIMEOUT_MS", "250"),
            ("EVENTS_CACHE_TTL_SECONDS", "0.5"),
            ("MY_EVENTS_CACHE_TTL_SECONDS", " 10 "),
            ("MY_EVENTS_CACHE_CAPACITY", "42"),
        ])
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert_eq!(config.events_cache.ttl, Some(Duration::from_millis(500)));
        assert_eq!(config.my_events_cache.ttl, Some(Duration::from_secs(10)));
        assert_eq!(config.my_events_cache.max_capacity, 42);
    }

    #[test]
    fn test_non_positive_ttl_disables_cache() {
        let config = config_from(&[
            ("EVENTS_CACHE_TTL_SECONDS", "0"),
            ("MY_EVENTS_CACHE_TTL_SECONDS", "-3"),
        ])
        .unwrap();

        assert!(!config.events_cache.is_enabled());
        assert!(!config.my_events_cache.is_enabled());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = config_from(&[("EVENTS_CACHE_TTL_SECONDS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("EVENTS_CACHE_TTL_SECONDS"));

        assert!(config_from(&[("MY_EVENTS_CACHE_TTL_SECONDS", "NaN")]).is_err());
        assert!(config_from(&[("DB_BUSY_TIMEOUT_MS", "-1")]).is_err());
    }
}
