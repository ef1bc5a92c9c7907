//! Shared store handles and process-wide initialization.
//!
//! A bot process wires its pools once and hands clones of the store
//! handles to every subsystem. [`Stores::connect`] does the wiring for one
//! owner; [`init`] publishes the result process-wide for code that cannot
//! thread a handle through, such as plugin entry points.

use crate::LarderConfig;
use larder_error::LarderResult;
use larder_guild::GuildStore;
use larder_keystore::{KeyStore, create_pool, wait_until_ready};
use larder_stats::StatsCounter;
use std::sync::OnceLock;
use tracing::info;

static STORES: OnceLock<Stores> = OnceLock::new();

/// Connected handles for every store the system runs on.
///
/// Cloning is cheap: each handle shares its pool.
#[derive(Clone, Debug)]
pub struct Stores {
    guilds: GuildStore,
    cache: KeyStore,
    stats: StatsCounter,
}

impl Stores {
    /// Connect both pools, wait for readiness, and seed the statistics hash.
    ///
    /// Blocks until both stores answer a ping, per the configured retry
    /// policy. Prefer [`init`] when the process should share one registry.
    pub fn connect(config: &LarderConfig) -> LarderResult<Self> {
        let data_pool = create_pool(&config.data)?;
        wait_until_ready(&data_pool, &config.retry)?;
        info!(
            host = %config.data.host(),
            port = *config.data.port(),
            "data store ready"
        );

        let cache_pool = create_pool(&config.cache)?;
        wait_until_ready(&cache_pool, &config.retry)?;
        info!(
            host = %config.cache.host(),
            port = *config.cache.port(),
            "cache store ready"
        );

        let guilds = GuildStore::new(data_pool.clone(), config.guild.clone());
        let stats = StatsCounter::new(data_pool)?;
        let cache = KeyStore::new(cache_pool);

        Ok(Self {
            guilds,
            cache,
            stats,
        })
    }

    /// Guild state on the data store.
    pub fn guilds(&self) -> &GuildStore {
        &self.guilds
    }

    /// Unnamespaced keystore on the cache store.
    pub fn cache(&self) -> &KeyStore {
        &self.cache
    }

    /// Usage statistics on the data store.
    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    /// Namespaced keystore view on the cache store for one plugin.
    pub fn plugin_cache(&self, namespace: impl Into<String>) -> KeyStore {
        self.cache.namespaced(namespace)
    }

    /// Namespaced keystore view on the data store for one plugin.
    pub fn plugin_data(&self, namespace: impl Into<String>) -> KeyStore {
        self.guilds.namespace(namespace)
    }
}

/// Initialize the process-wide store registry.
///
/// The first successful call connects and publishes the registry; later
/// calls return the published handles without touching their `config`.
/// Concurrent callers may each connect, but only one result is kept.
pub fn init(config: &LarderConfig) -> LarderResult<&'static Stores> {
    if let Some(stores) = STORES.get() {
        return Ok(stores);
    }
    let stores = Stores::connect(config)?;
    Ok(STORES.get_or_init(|| stores))
}

/// The process-wide registry, once [`init`] has succeeded.
pub fn stores() -> Option<&'static Stores> {
    STORES.get()
}
