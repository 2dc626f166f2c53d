//! Client configuration, resolved from the environment.
//!
//! An example `.env` is shown:
//! ```bash
//! ROUTEPLANNER_ENDPOINT=http://localhost:8080
//! ROUTEPLANNER_PATH=routeplanner
//! ROUTEPLANNER_TILE_URL=https://tiles.fmi.uni-stuttgart.de/{z}/{x}/{y}.png
//! ROUTEPLANNER_LOOKUP_TIMEOUT_MS=10000
//! ROUTEPLANNER_ROUTE_TIMEOUT_MS=30000
//! ```

use std::env;
use std::fmt::{Display, Formatter};
use std::time::Duration;

use dotenv::dotenv;
use log::debug;

pub const DEFAULT_PATH: &str = "routeplanner";
pub const DEFAULT_TILE_URL: &str = "https://tiles.fmi.uni-stuttgart.de/{z}/{x}/{y}.png";
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_ROUTE_TIMEOUT: Duration = Duration::from_secs(30);

const ENDPOINT: &str = "ROUTEPLANNER_ENDPOINT";
const PATH: &str = "ROUTEPLANNER_PATH";
const TILE_URL: &str = "ROUTEPLANNER_TILE_URL";
const LOOKUP_TIMEOUT: &str = "ROUTEPLANNER_LOOKUP_TIMEOUT_MS";
const ROUTE_TIMEOUT: &str = "ROUTEPLANNER_ROUTE_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    MissingEnvironment(String),
    InvalidValue { key: String, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingEnvironment(key) => write!(f, "missing environment variable {key}"),
            ConfigError::InvalidValue { key, value } => write!(f, "invalid value for {key}: {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base url of the backend, without the calculation path.
    pub endpoint: String,
    pub path: String,
    pub tile_url: String,
    /// Budget for nearest-neighbor finds and node lookups.
    pub lookup_timeout: Duration,
    /// Budget for route computation.
    pub route_timeout: Duration,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        ClientConfig {
            endpoint: endpoint.into(),
            path: DEFAULT_PATH.to_string(),
            tile_url: DEFAULT_TILE_URL.to_string(),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            route_timeout: DEFAULT_ROUTE_TIMEOUT,
        }
    }

    /// Loads `.env` when present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenv().is_err() {
            debug!("No .env file, using the process environment only");
        }

        Self::from_source(|key| env::var(key).ok())
    }

    /// Resolves the configuration from an arbitrary key-value source.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint =
            lookup(ENDPOINT).ok_or_else(|| ConfigError::MissingEnvironment(ENDPOINT.to_string()))?;

        let mut config = ClientConfig::new(endpoint);

        if let Some(path) = lookup(PATH) {
            config.path = path;
        }

        if let Some(url) = lookup(TILE_URL) {
            config.tile_url = url;
        }

        if let Some(value) = lookup(LOOKUP_TIMEOUT) {
            config.lookup_timeout = millis(LOOKUP_TIMEOUT, &value)?;
        }

        if let Some(value) = lookup(ROUTE_TIMEOUT) {
            config.route_timeout = millis(ROUTE_TIMEOUT, &value)?;
        }

        Ok(config)
    }
}

fn millis(key: &str, value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
