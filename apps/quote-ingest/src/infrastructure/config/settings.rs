//! Service Configuration Settings
//!
//! Configuration loaded from environment variables. Defaults favor a
//! local development run.

use std::str::FromStr;

use thiserror::Error;

/// Default HTTP port.
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default database path.
const DEFAULT_DATABASE_PATH: &str = "quote-ingest.db";

/// Default stored-quote channel capacity.
const DEFAULT_QUOTES_CAPACITY: usize = 10_000;

/// Default instrument-lifecycle channel capacity.
const DEFAULT_LIFECYCLE_CAPACITY: usize = 1_000;

/// Configuration failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable holds an unusable value.
    #[error("invalid value {value:?} for {variable}: {message}")]
    InvalidValue {
        /// Variable name.
        variable: String,
        /// Offending value.
        value: String,
        /// Parse failure description.
        message: String,
    },
}

/// Broadcast channel settings.
#[derive(Debug, Clone, Copy)]
pub struct BroadcastSettings {
    /// Capacity of the stored-quote channel.
    pub quotes_capacity: usize,
    /// Capacity of the instrument-lifecycle channel.
    pub lifecycle_capacity: usize,
}

impl Default for BroadcastSettings {
    fn default() -> Self {
        Self {
            quotes_capacity: DEFAULT_QUOTES_CAPACITY,
            lifecycle_capacity: DEFAULT_LIFECYCLE_CAPACITY,
        }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Port for the HTTP API.
    pub http_port: u16,
    /// Path of the turso database file (`:memory:` for ephemeral).
    pub database_path: String,
    /// Broadcast channel capacities.
    pub broadcast: BroadcastSettings,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            database_path: DEFAULT_DATABASE_PATH.to_owned(),
            broadcast: BroadcastSettings::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `QUOTE_INGEST_HTTP_PORT` | `8080` |
    /// | `QUOTE_INGEST_DB_PATH` | `quote-ingest.db` |
    /// | `QUOTE_INGEST_QUOTES_CAPACITY` | `10000` |
    /// | `QUOTE_INGEST_LIFECYCLE_CAPACITY` | `1000` |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a variable is set but
    /// does not parse, or a channel capacity is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|variable| std::env::var(variable).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let http_port = parse_or(&lookup, "QUOTE_INGEST_HTTP_PORT", DEFAULT_HTTP_PORT)?;
        let database_path = lookup("QUOTE_INGEST_DB_PATH")
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_owned());
        let quotes_capacity = parse_or(
            &lookup,
            "QUOTE_INGEST_QUOTES_CAPACITY",
            DEFAULT_QUOTES_CAPACITY,
        )?;
        let lifecycle_capacity = parse_or(
            &lookup,
            "QUOTE_INGEST_LIFECYCLE_CAPACITY",
            DEFAULT_LIFECYCLE_CAPACITY,
        )?;

        for (variable, capacity) in [
            ("QUOTE_INGEST_QUOTES_CAPACITY", quotes_capacity),
            ("QUOTE_INGEST_LIFECYCLE_CAPACITY", lifecycle_capacity),
        ] {
            if capacity == 0 {
                return Err(ConfigError::InvalidValue {
                    variable: variable.to_owned(),
                    value: "0".to_owned(),
                    message: "channel capacity must be positive".to_owned(),
                });
            }
        }

        Ok(Self {
            http_port,
            database_path,
            broadcast: BroadcastSettings {
                quotes_capacity,
                lifecycle_capacity,
            },
        })
    }
}

fn parse_or<T, F>(lookup: &F, variable: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(variable) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse() {
            Ok(value) => Ok(value),
            Err(error) => Err(ConfigError::InvalidValue {
                variable: variable.to_owned(),
                value: raw,
                message: error.to_string(),
            }),
        },
    }
}
