// src/config.rs
use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Server settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    /// Carts fall back to an in-process store when unset.
    pub redis_url: Option<String>,
    pub server_port: u16,
    pub db_max_connections: u32,
    pub db_idle_timeout: Duration,
    pub db_max_lifetime: Duration,
    pub request_timeout: Duration,
}

impl Config {
    /// # Environment Variables
    /// - `DATABASE_URL` (required)
    /// - `REDIS_URL`
    /// - `SERVER_PORT` (default: 8080)
    /// - `DB_MAX_CONNECTIONS` (default: 10)
    /// - `DB_IDLE_TIMEOUT_SECS` (default: 60)
    /// - `DB_MAX_LIFETIME_SECS` (default: 180)
    /// - `REQUEST_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            redis_url: lookup("REDIS_URL").filter(|v| !v.is_empty()),
            server_port: parse_or(&lookup, "SERVER_PORT", defaults.server_port)?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            db_idle_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DB_IDLE_TIMEOUT_SECS",
                defaults.db_idle_timeout.as_secs(),
            )?),
            db_max_lifetime: Duration::from_secs(parse_or(
                &lookup,
                "DB_MAX_LIFETIME_SECS",
                defaults.db_max_lifetime.as_secs(),
            )?),
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            redis_url: None,
            server_port: 8080,
            db_max_connections: 10,
            db_idle_timeout: Duration::from_secs(60),
            db_max_lifetime: Duration::from_secs(180),
            request_timeout: Duration::from_secs(30),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config =
            Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/db")]))
                .unwrap();
        assert_eq!(config.database_url, "postgres://localhost/db");
        assert_eq!(config.redis_url, None);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.db_idle_timeout, Duration::from_secs(60));
        assert_eq!(config.db_max_lifetime, Duration::from_secs(180));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db"),
            ("REDIS_URL", "redis://cache:6379"),
            ("SERVER_PORT", "3000"),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_config_missing_database_url() {
        assert_eq!(
            Config::from_lookup(lookup_from(&[])),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn test_config_invalid_number() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db"),
            ("SERVER_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "SERVER_PORT",
                value: "eighty".to_string()
            }
        );
    }
}
