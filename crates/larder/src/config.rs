//! Deployment configuration.

use larder_error::{ConfigError, LarderResult};
use larder_guild::GuildDefaults;
use larder_keystore::{ConnectionSettings, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for one deployment.
///
/// Every section has defaults, so an empty TOML document yields a working
/// local setup: data store on 6379, cache store on 6380, unbounded
/// readiness retries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LarderConfig {
    /// Data store pool (guild state, statistics, plugin data)
    #[serde(default)]
    pub data: ConnectionSettings,
    /// Cache store pool
    #[serde(default = "ConnectionSettings::for_cache")]
    pub cache: ConnectionSettings,
    /// Readiness probe policy applied to both pools
    #[serde(default)]
    pub retry: RetryPolicy,
    /// Values written into fresh guild configurations
    #[serde(default)]
    pub guild: GuildDefaults,
}

impl Default for LarderConfig {
    fn default() -> Self {
        Self {
            data: ConnectionSettings::default(),
            cache: ConnectionSettings::for_cache(),
            retry: RetryPolicy::default(),
            guild: GuildDefaults::default(),
        }
    }
}

impl LarderConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> LarderResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            larder_error::LarderError::from(ConfigError::new(format!(
                "Failed to read config file: {}",
                e
            )))
        })?;

        toml::from_str(&content).map_err(|e| {
            larder_error::LarderError::from(ConfigError::new(format!(
                "Failed to parse config: {}",
                e
            )))
        })
    }

    /// Build configuration from the environment.
    ///
    /// Loads `.env` when present, then reads `REDIS_HOST`, `REDIS_PORT` and
    /// `REDIS_PASS` for the data store and the `REDIS_CACHE_` variants for
    /// the cache store. The retry policy and guild defaults keep their
    /// built-in values.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self {
            data: ConnectionSettings::data_from_env(),
            cache: ConnectionSettings::cache_from_env(),
            retry: RetryPolicy::default(),
            guild: GuildDefaults::default(),
        }
    }
}
