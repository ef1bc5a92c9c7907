//! Connection settings and readiness retry policy.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for one store connection pool.
///
/// A deployed system runs two of these: the data store (guild state,
/// statistics, plugin data) and the cache store on its own port. Defaults
/// match a local unauthenticated instance.
#[derive(
    Debug, Clone, Serialize, Deserialize, Getters, derive_setters::Setters, derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct ConnectionSettings {
    /// Store hostname
    #[serde(default = "default_host")]
    host: String,

    /// Store port
    #[serde(default = "default_port")]
    port: u16,

    /// Optional password (AUTH)
    #[serde(default)]
    password: Option<String>,

    /// Database index to SELECT
    #[serde(default)]
    db: i64,

    /// Maximum number of pooled connections
    #[serde(default = "default_pool_size")]
    pool_size: u32,

    /// Seconds to wait for a pooled connection before failing
    #[serde(default = "default_connect_timeout")]
    connect_timeout_secs: u64,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    6379
}

fn default_cache_port() -> u16 {
    6380
}

fn default_pool_size() -> u32 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            password: None,
            db: 0,
            pool_size: default_pool_size(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl ConnectionSettings {
    /// Default settings for the cache store (separate instance, port 6380).
    pub fn for_cache() -> Self {
        Self {
            port: default_cache_port(),
            ..Self::default()
        }
    }

    /// Read settings from the environment with the given variable prefix.
    ///
    /// Recognizes `<PREFIX>HOST`, `<PREFIX>PORT` and `<PREFIX>PASS`;
    /// unset or empty variables fall back to the defaults.
    pub fn from_env(prefix: &str) -> Self {
        let mut settings = Self::default();
        if let Ok(host) = std::env::var(format!("{prefix}HOST"))
            && !host.is_empty()
        {
            settings.host = host;
        }
        if let Ok(port) = std::env::var(format!("{prefix}PORT"))
            && let Ok(port) = port.parse()
        {
            settings.port = port;
        }
        if let Ok(password) = std::env::var(format!("{prefix}PASS"))
            && !password.is_empty()
        {
            settings.password = Some(password);
        }
        settings
    }

    /// Data store settings from `REDIS_HOST` / `REDIS_PORT` / `REDIS_PASS`.
    pub fn data_from_env() -> Self {
        Self::from_env("REDIS_")
    }

    /// Cache store settings from `REDIS_CACHE_HOST` / `REDIS_CACHE_PORT` /
    /// `REDIS_CACHE_PASS`, defaulting to port 6380 when unset.
    pub fn cache_from_env() -> Self {
        let mut settings = Self::from_env("REDIS_CACHE_");
        if std::env::var("REDIS_CACHE_PORT").is_err() {
            settings.port = default_cache_port();
        }
        settings
    }

    /// Pooled-connection acquisition timeout.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub(crate) fn connection_info(&self) -> redis::ConnectionInfo {
        redis::ConnectionInfo {
            addr: redis::ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: redis::RedisConnectionInfo {
                db: self.db,
                username: None,
                password: self.password.clone(),
                ..Default::default()
            },
        }
    }
}

/// Policy for the blocking readiness probe.
///
/// The probe pings the store until it answers, sleeping `interval_secs`
/// between failures. With `max_attempts` unset it retries indefinitely,
/// matching the behavior expected during bot startup; a bounded policy
/// fails with [`larder_error::StoreErrorKind::Unavailable`] after the
/// final attempt.
#[derive(Debug, Clone, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct RetryPolicy {
    /// Seconds between probes
    #[serde(default = "default_interval")]
    interval_secs: u64,

    /// Give up after this many probes; `None` retries forever
    #[serde(default)]
    max_attempts: Option<u32>,
}

fn default_interval() -> u64 {
    3
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    /// Sleep interval between probes.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
