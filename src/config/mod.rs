//! Typed configuration from environment variables.
//!
//! Loads once at startup, fails fast if required vars are missing or
//! malformed. The database URL is wrapped in secrecy::SecretString to
//! prevent log leaks.

pub mod secrets;

use std::time::Duration;

use crate::error::{Error, Result};
use secrecy::SecretString;

pub const DEFAULT_QUEUE_NAME: &str = "default";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_VISIBILITY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub struct Config {
    pub database_url: SecretString,
    /// Logical queue inside the database.
    pub queue_name: String,
    /// Backoff between polls of an empty queue.
    pub poll_interval: Duration,
    /// How long a claim lasts before the message becomes visible again.
    pub visibility_timeout: Duration,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").ok_or_else(|| {
            Error::Config("required environment variable DATABASE_URL is not set".to_string())
        })?;

        let poll_interval = match lookup("DBQUEUE_POLL_INTERVAL_MS") {
            Some(v) => Duration::from_millis(parse_number("DBQUEUE_POLL_INTERVAL_MS", &v)?),
            None => DEFAULT_POLL_INTERVAL,
        };
        if poll_interval.is_zero() {
            return Err(Error::Config(
                "DBQUEUE_POLL_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }

        let visibility_timeout = match lookup("DBQUEUE_VISIBILITY_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_number("DBQUEUE_VISIBILITY_TIMEOUT_SECS", &v)?),
            None => DEFAULT_VISIBILITY_TIMEOUT,
        };
        // A zero-length claim lapses before it can be finalized.
        if visibility_timeout.is_zero() {
            return Err(Error::Config(
                "DBQUEUE_VISIBILITY_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            database_url: SecretString::from(database_url),
            queue_name: lookup("DBQUEUE_QUEUE")
                .filter(|q| !q.is_empty())
                .unwrap_or_else(|| DEFAULT_QUEUE_NAME.to_string()),
            poll_interval,
            visibility_timeout,
            otel_endpoint: lookup("OTEL_ENDPOINT").filter(|e| !e.is_empty()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_number(name: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{name} must be a non-negative integer, got {value:?}")))
}
