//! Layered configuration for the harness.
//!
//! Settings are assembled from four layers, later layers overriding earlier
//! ones key by key:
//!
//! 1. built-in defaults (the public FakeRestAPI instance),
//! 2. `bookstore.toml` in the working directory,
//! 3. `bookstore.<env>.toml`, where `<env>` comes from `BOOKSTORE_ENV`,
//! 4. `BOOKSTORE_*` environment variables.
//!
//! All values are read once and immutable afterwards; every client takes the
//! resulting [`ApiSettings`] as an injected value.
//!
//! ```toml
//! [api]
//! base_url = "https://fakerestapi.azurewebsites.net"
//! timeout_seconds = 30
//! max_retry_attempts = 3
//! retry_delay_ms = 1000
//! max_response_time_ms = 5000
//!
//! [logging]
//! level = "debug"
//! ```

use serde::Deserialize;
use std::{fmt::Display, path::Path, str::FromStr, time::Duration};

use crate::{Error, Result};

/// Base name of the settings file looked up in the working directory.
pub const SETTINGS_FILE: &str = "bookstore.toml";

/// Environment variable naming the active environment (e.g. `staging`),
/// used to pick up `bookstore.<env>.toml`.
pub const ENV_NAME_VAR: &str = "BOOKSTORE_ENV";

/// Connection and resilience settings for the API under test.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL every request path is resolved against.
    pub base_url: String,
    /// Per-attempt request timeout, in seconds.
    pub timeout_seconds: u64,
    /// How many *additional* attempts follow a transient failure.
    pub max_retry_attempts: u32,
    /// Base backoff unit; attempt `n` waits `retry_delay_ms * n`.
    pub retry_delay_ms: u64,
    /// Threshold above which a response is logged as slow. Never a failure.
    pub max_response_time_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://fakerestapi.azurewebsites.net".to_string(),
            timeout_seconds: 30,
            max_retry_attempts: 3,
            retry_delay_ms: 1000,
            max_response_time_ms: 5000,
        }
    }
}

impl ApiSettings {
    /// The per-attempt timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// The base backoff unit as a [`Duration`].
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// The slow-response threshold as a [`Duration`].
    pub fn max_response_time(&self) -> Duration {
        Duration::from_millis(self.max_response_time_ms)
    }
}

/// Settings for the process-wide log subscriber.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset, e.g. `info` or
    /// `bookstore_conformance=debug`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// The full layered configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Loads settings from the working directory and the process environment.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."), |name| std::env::var(name).ok())
    }

    /// Loads settings from `dir`, resolving environment variables through
    /// `lookup`. Exposed separately so the layering can be exercised without
    /// touching process-global state.
    pub fn load_from(dir: &Path, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut merged = toml::Value::Table(toml::map::Map::new());

        let mut files = vec![dir.join(SETTINGS_FILE)];
        if let Some(env_name) = lookup(ENV_NAME_VAR) {
            files.push(dir.join(format!("bookstore.{}.toml", env_name)));
        }

        for file in files {
            if !file.exists() {
                continue;
            }
            let raw = std::fs::read_to_string(&file)
                .map_err(|e| Error::Config(format!("failed to read {}: {}", file.display(), e)))?;
            let value: toml::Value = raw
                .parse()
                .map_err(|e| Error::Config(format!("failed to parse {}: {}", file.display(), e)))?;
            merge(&mut merged, value);
        }

        let mut settings: Settings = merged
            .try_into()
            .map_err(|e| Error::Config(format!("invalid settings: {}", e)))?;
        settings.apply_env(&lookup)?;
        Ok(settings)
    }

    fn apply_env(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = lookup("BOOKSTORE_BASE_URL") {
            self.api.base_url = v;
        }
        if let Some(v) = lookup("BOOKSTORE_TIMEOUT_SECONDS") {
            self.api.timeout_seconds = parse_var("BOOKSTORE_TIMEOUT_SECONDS", &v)?;
        }
        if let Some(v) = lookup("BOOKSTORE_MAX_RETRY_ATTEMPTS") {
            self.api.max_retry_attempts = parse_var("BOOKSTORE_MAX_RETRY_ATTEMPTS", &v)?;
        }
        if let Some(v) = lookup("BOOKSTORE_RETRY_DELAY_MS") {
            self.api.retry_delay_ms = parse_var("BOOKSTORE_RETRY_DELAY_MS", &v)?;
        }
        if let Some(v) = lookup("BOOKSTORE_MAX_RESPONSE_TIME_MS") {
            self.api.max_response_time_ms = parse_var("BOOKSTORE_MAX_RESPONSE_TIME_MS", &v)?;
        }
        if let Some(v) = lookup("BOOKSTORE_LOG_LEVEL") {
            self.logging.level = v;
        }
        Ok(())
    }
}

/// Overlays `overlay` onto `base`, descending into tables so partial files
/// only override the keys they mention.
fn merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, overlay) => *slot = overlay,
    }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse()
        .map_err(|e| Error::Config(format!("invalid value for {}: {}", name, e)))
}
