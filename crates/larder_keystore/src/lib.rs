//! Pooled, namespaced access to the bot's key-value store.
//!
//! This crate owns the plumbing between the persistence layer and Redis:
//! connection settings, r2d2 pool construction, a blocking readiness probe,
//! and [`KeyStore`], a cheap-to-clone handle that prefixes keys with an
//! optional plugin namespace.
//!
//! # Features
//!
//! - **Lazy pools**: building a pool never contacts the store; only
//!   [`wait_until_ready`] blocks
//! - **Namespacing**: a `KeyStore` derived with [`KeyStore::namespaced`]
//!   writes every key as `<namespace>:<key>`, isolating plugin data
//! - **Typed decoding**: operations are generic over `FromRedisValue`, so
//!   absent keys surface as `Option::None` rather than a sentinel
//!
//! # Example
//!
//! ```no_run
//! use larder_keystore::{ConnectionSettings, KeyStore, RetryPolicy, create_pool, wait_until_ready};
//!
//! # fn example() -> larder_keystore::StoreResult<()> {
//! let settings = ConnectionSettings::default();
//! let pool = create_pool(&settings)?;
//! wait_until_ready(&pool, &RetryPolicy::default())?;
//!
//! let store = KeyStore::new(pool).namespaced("reminder");
//! store.set("next_id", 1u64)?; // stored under "reminder:next_id"
//! let id: Option<u64> = store.get("next_id")?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod connection;
mod keystore;
mod settings;

pub use connection::{RedisPool, create_pool, wait_until_ready};
pub use keystore::KeyStore;
pub use settings::{ConnectionSettings, ConnectionSettingsBuilder, RetryPolicy};

pub use larder_error::{StoreError, StoreErrorKind, StoreResult};
