//! Guild state persistence for the bot.
//!
//! Every guild the bot inhabits keeps its state in a small family of
//! keys on the data store:
//!
//! ```text
//! server:<guild_id>     hash   configuration fields
//! commands:<guild_id>   hash   trigger -> response
//! blacklist:<guild_id>  set    channel ids the bot ignores
//! mutes:<guild_id>      set    muted user ids
//! sr:<guild_id>         set    self-assignable role names
//! ```
//!
//! [`GuildStore`] owns the full lifecycle of that family: setup on join,
//! reconciliation against the live gateway view, sweeping of departed
//! guilds, and a single-command delete of the whole family. Configuration
//! fields with null defaults are simply absent until set, so consumers
//! read unset state as `None` rather than a sentinel.
//!
//! All mutating operations guard user-supplied strings against
//! [`MAX_INPUT_LEN`] before touching the store.
//!
//! # Example
//!
//! ```no_run
//! use larder_guild::{GuildDefaults, GuildProfile, GuildStore};
//! use larder_keystore::{ConnectionSettings, create_pool};
//!
//! # fn example() -> larder_guild::LarderResult<()> {
//! let pool = create_pool(&ConnectionSettings::default())?;
//! let guilds = GuildStore::new(pool, GuildDefaults::default());
//!
//! let profile = GuildProfile::new(4040, "rust lounge").with_owner(77);
//! guilds.setup(&profile)?;
//! assert!(guilds.exists(4040)?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod fields;
mod input;
mod keys;
mod model;
mod store;

pub use fields::{ChannelField, EventMessage, ModerationSetting};
pub use input::{MAX_INPUT_LEN, MAX_TRIGGER_LEN};
pub use model::{
    ChannelId, GuildConfig, GuildDefaults, GuildId, GuildProfile, GuildSnapshot, UserId,
};
pub use store::GuildStore;

pub use larder_error::{
    FieldError, FieldErrorKind, LarderError, LarderErrorKind, LarderResult, SecurityError,
    SecurityErrorKind,
};
