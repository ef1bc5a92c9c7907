//! Larder - Guild Persistence for Chat Bots
//!
//! Larder keeps the state a chat bot accumulates while it runs: per-guild
//! configuration, custom commands, moderation lists, usage statistics, and
//! plugin scratch data. Everything lives in a key-value store behind a
//! connection pool, so handles can be cloned freely across threads.
//!
//! # Features
//!
//! - **Guild State**: Configuration hashes, custom commands, channel
//!   blacklists, mute rosters, and self-assignable roles per guild
//! - **Write Batching**: Usage counters accumulate in memory and flush in
//!   batches to keep hot paths off the wire
//! - **Plugin Keystore**: Namespaced key-value views so plugins cannot
//!   collide with guild state or each other
//! - **Two Stores**: A durable data store and a separate cache store, each
//!   with its own pool and readiness probe
//! - **Process Registry**: One-call initialization that wires both pools
//!   and hands out shared store handles
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use larder::{GuildProfile, LarderConfig, Stat};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     larder::init_tracing()?;
//!
//!     let config = LarderConfig::from_env();
//!     let stores = larder::init(&config)?;
//!
//!     let guild = GuildProfile::new(4242, "demo guild");
//!     stores.guilds().ensure(&guild)?;
//!     stores.guilds().set_prefix(guild.id, "?")?;
//!     stores.stats().record(Stat::Messages)?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Larder is organized as a workspace with focused crates:
//!
//! - `larder_error` - Error types
//! - `larder_keystore` - Connection pooling and the namespaced keystore
//! - `larder_guild` - Guild configuration, commands, and rosters
//! - `larder_stats` - Write-batched usage statistics
//!
//! This crate (`larder`) re-exports everything for convenience and adds the
//! deployment configuration and the process-wide store registry.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod registry;
mod telemetry;

pub use larder_error::*;
pub use larder_guild::*;
pub use larder_keystore::*;
pub use larder_stats::*;

pub use config::LarderConfig;
pub use registry::{Stores, init, stores};
pub use telemetry::init_tracing;
