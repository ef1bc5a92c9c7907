//! Write-batched usage statistics.
//!
//! The bot counts a dozen things about its own usage (messages seen,
//! images sent, times pinged) in the shared `stats` hash on the data
//! store. Counting on every event would cost a round trip per message,
//! so [`StatsCounter`] batches increments in process-local atomics and
//! flushes each counter with a single HINCRBY once it reaches the flush
//! threshold.
//!
//! The trade-off is deliberate: up to `threshold - 1` increments per
//! counter are lost if the process exits without flushing. Call
//! [`StatsCounter::flush_all`] on shutdown to narrow that window.
//!
//! # Example
//!
//! ```no_run
//! use larder_keystore::{ConnectionSettings, create_pool};
//! use larder_stats::{Stat, StatsCounter};
//!
//! # fn example() -> larder_keystore::StoreResult<()> {
//! let pool = create_pool(&ConnectionSettings::default())?;
//! let stats = StatsCounter::new(pool)?;
//!
//! stats.record(Stat::Messages)?;
//! assert_eq!(stats.pending(Stat::Messages), 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod counter;

pub use counter::{Stat, StatsCounter};

pub use larder_error::{StoreError, StoreErrorKind, StoreResult};
