//! Guild state repository.
//!
//! This repository owns every store operation touching the per-guild key
//! family: lifecycle, configuration fields, custom commands, channel
//! blacklists, mute lists and self-assignable roles.

use crate::fields::{ChannelField, EventMessage, ModerationSetting};
use crate::input;
use crate::keys;
use crate::model::{
    self, ChannelId, GuildConfig, GuildDefaults, GuildId, GuildProfile, GuildSnapshot, UserId,
    field,
};
use larder_error::LarderResult;
use larder_keystore::{KeyStore, RedisPool};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument, warn};

/// Persistent state for every guild the bot inhabits.
///
/// All operations are synchronous and draw a pooled connection for the
/// duration of one command; callers inside an async runtime should
/// offload them (for example with `tokio::task::spawn_blocking`).
/// Mutating operations guard user-supplied strings against
/// [`input::MAX_INPUT_LEN`](crate::MAX_INPUT_LEN) before any store access.
///
/// # Example
/// ```no_run
/// use larder_guild::{GuildDefaults, GuildProfile, GuildStore};
/// use larder_keystore::{ConnectionSettings, create_pool};
///
/// # fn main() -> larder_guild::LarderResult<()> {
/// let pool = create_pool(&ConnectionSettings::default())?;
/// let guilds = GuildStore::new(pool, GuildDefaults::default());
/// guilds.setup(&GuildProfile::new(4040, "rust lounge"))?;
/// guilds.set_prefix(4040, "?")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct GuildStore {
    store: KeyStore,
    defaults: GuildDefaults,
}

impl GuildStore {
    /// Create a repository over the data pool.
    pub fn new(pool: RedisPool, defaults: GuildDefaults) -> Self {
        Self {
            store: KeyStore::new(pool),
            defaults,
        }
    }

    /// Defaults written at guild setup.
    pub fn defaults(&self) -> &GuildDefaults {
        &self.defaults
    }

    /// Derive a namespaced handle on the same pool for plugin data.
    pub fn namespace(&self, namespace: impl Into<String>) -> KeyStore {
        self.store.namespaced(namespace)
    }

    // ============================================================
    // Lifecycle
    // ============================================================

    /// Write the initial configuration hash for a guild.
    ///
    /// Fields with null defaults are omitted entirely; their absence is
    /// what consumers read as "unset".
    #[instrument(skip(self, profile), fields(guild_id = %profile.id))]
    pub fn setup(&self, profile: &GuildProfile) -> LarderResult<()> {
        let config = GuildConfig::initial(profile, &self.defaults);
        let fields = config.to_fields();
        self.store.hset_multiple(&keys::server(profile.id), &fields)?;
        info!(name = %profile.name, "guild configured");
        Ok(())
    }

    /// Set up a guild only when it has no stored configuration yet.
    ///
    /// Returns whether a setup was performed.
    #[instrument(skip(self, profile), fields(guild_id = %profile.id))]
    pub fn ensure(&self, profile: &GuildProfile) -> LarderResult<bool> {
        if self.exists(profile.id)? {
            return Ok(false);
        }
        self.setup(profile)?;
        Ok(true)
    }

    /// Whether a guild has stored configuration.
    ///
    /// Presence of the `server:<id>` hash is the sole definition of a
    /// guild existing in the store.
    pub fn exists(&self, guild_id: GuildId) -> LarderResult<bool> {
        Ok(self.store.exists(&keys::server(guild_id))?)
    }

    /// Restore a guild's configuration to defaults.
    ///
    /// Custom commands, blacklists, mutes and self-roles survive a reset;
    /// only the configuration hash is rebuilt.
    #[instrument(skip(self, profile), fields(guild_id = %profile.id))]
    pub fn reset(&self, profile: &GuildProfile) -> LarderResult<()> {
        self.store.del(&keys::server(profile.id))?;
        self.setup(profile)
    }

    /// Realign stored name and owner with the live profile.
    ///
    /// Guilds without stored configuration are skipped, as is the owner
    /// comparison when the live owner is unknown.
    #[instrument(skip(self, profile), fields(guild_id = %profile.id))]
    pub fn reconcile(&self, profile: &GuildProfile) -> LarderResult<()> {
        let key = keys::server(profile.id);
        if !self.store.exists(&key)? {
            debug!("no stored configuration, skipping");
            return Ok(());
        }
        let stored_name: Option<String> = self.store.hget(&key, field::NAME)?;
        if stored_name.as_deref() != Some(profile.name.as_str()) {
            warn!(from = ?stored_name, to = %profile.name, "guild name drifted");
            self.store.hset(&key, field::NAME, profile.name.as_str())?;
        }
        if let Some(owner_id) = profile.owner_id {
            let stored_owner: Option<String> = self.store.hget(&key, field::OWNER)?;
            let live = owner_id.to_string();
            if stored_owner.as_deref() != Some(live.as_str()) {
                warn!(from = ?stored_owner, to = %live, "guild owner drifted");
                self.store.hset(&key, field::OWNER, live.as_str())?;
            }
        } else {
            debug!("live owner unknown, skipping owner check");
        }
        Ok(())
    }

    /// Delete state for guilds no longer in the live set.
    ///
    /// Scans stored `server:` keys, removes every guild absent from
    /// `live`, and returns the removed ids.
    #[instrument(skip(self, live))]
    pub fn sweep(&self, live: &HashSet<GuildId>) -> LarderResult<Vec<GuildId>> {
        let mut removed = Vec::new();
        for key in self.store.scan_keys(keys::SERVER_PATTERN)? {
            let Some(guild_id) = keys::parse_server(&key) else {
                continue;
            };
            if !live.contains(&guild_id) {
                self.delete_guild(guild_id)?;
                removed.push(guild_id);
            }
        }
        if !removed.is_empty() {
            info!(count = removed.len(), "stale guilds swept");
        }
        Ok(removed)
    }

    /// Remove every stored key for a guild.
    ///
    /// One multi-key delete covers the configuration hash, custom
    /// commands, blacklist, mutes, self-roles and the legacy voting key,
    /// so no partially deleted guild is ever observable. Returns how
    /// many of those keys existed.
    #[instrument(skip(self))]
    pub fn delete_guild(&self, guild_id: GuildId) -> LarderResult<usize> {
        let family = keys::family(guild_id);
        let family: Vec<&str> = family.iter().map(String::as_str).collect();
        let removed = self.store.del_many(&family)?;
        info!(removed, "guild state deleted");
        Ok(removed)
    }

    /// Remove configuration fields outside the template.
    ///
    /// Maintenance pass over every stored guild for hashes written by
    /// older releases; returns the number of fields removed.
    #[instrument(skip(self))]
    pub fn prune_stale_fields(&self) -> LarderResult<usize> {
        let template: HashSet<&str> = GuildConfig::template().into_iter().collect();
        let mut removed = 0;
        for key in self.store.scan_keys(keys::SERVER_PATTERN)? {
            for stored in self.store.hkeys(&key)? {
                if !template.contains(stored.as_str()) {
                    self.store.hdel(&key, &stored)?;
                    debug!(key = %key, field = %stored, "stale field removed");
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    // ============================================================
    // Configuration fields
    // ============================================================

    /// Read one configuration field; ask for `Option<T>` to see absence.
    pub fn get_var<RV: redis::FromRedisValue>(
        &self,
        guild_id: GuildId,
        name: &str,
    ) -> LarderResult<RV> {
        Ok(self.store.hget(&keys::server(guild_id), name)?)
    }

    /// Write one configuration field; true when the field was new.
    #[instrument(skip(self, value), fields(guild_id = %guild_id))]
    pub fn update_var(&self, guild_id: GuildId, name: &str, value: &str) -> LarderResult<bool> {
        input::bounded("name", name)?;
        input::bounded("value", value)?;
        Ok(self.store.hset(&keys::server(guild_id), name, value)?)
    }

    /// Typed view of the full configuration, `None` when not set up.
    pub fn config(&self, guild_id: GuildId) -> LarderResult<Option<GuildConfig>> {
        let map: HashMap<String, String> = self.store.hgetall(&keys::server(guild_id))?;
        if map.is_empty() {
            return Ok(None);
        }
        Ok(Some(GuildConfig::from_hash(map)))
    }

    /// Toggle a moderation filter by user-facing name.
    ///
    /// # Errors
    ///
    /// Names outside the recognized synonym set are rejected with a
    /// field error before any store access.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub fn update_moderation_setting(
        &self,
        guild_id: GuildId,
        name: &str,
        on: bool,
    ) -> LarderResult<bool> {
        input::bounded("name", name)?;
        let setting: ModerationSetting = name.parse()?;
        self.set_moderation(guild_id, setting, on)
    }

    /// Toggle a moderation filter.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub fn set_moderation(
        &self,
        guild_id: GuildId,
        setting: ModerationSetting,
        on: bool,
    ) -> LarderResult<bool> {
        debug!(field = %setting, on, "moderation setting changed");
        Ok(self.store.hset(&keys::server(guild_id), setting.field(), on)?)
    }

    /// Whether a moderation filter is on; absent fields read as off.
    pub fn filter_enabled(
        &self,
        guild_id: GuildId,
        setting: ModerationSetting,
    ) -> LarderResult<bool> {
        let value: Option<String> = self.store.hget(&keys::server(guild_id), setting.field())?;
        Ok(model::flag(value))
    }

    /// Point a channel field at a channel, or clear it with `None`.
    ///
    /// Clearing deletes the hash field, keeping absence as the
    /// representation of "unset".
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub fn set_channel(
        &self,
        guild_id: GuildId,
        which: ChannelField,
        channel: Option<ChannelId>,
    ) -> LarderResult<bool> {
        let key = keys::server(guild_id);
        match channel {
            Some(id) => Ok(self.store.hset(&key, which.field(), id)?),
            None => Ok(self.store.hdel(&key, which.field())?),
        }
    }

    /// [`GuildStore::set_channel`] by stored field name.
    pub fn set_channel_by_name(
        &self,
        guild_id: GuildId,
        name: &str,
        channel: Option<ChannelId>,
    ) -> LarderResult<bool> {
        input::bounded("name", name)?;
        let which: ChannelField = name.parse()?;
        self.set_channel(guild_id, which, channel)
    }

    /// Channel a pointer field holds, when set.
    pub fn channel(&self, guild_id: GuildId, which: ChannelField) -> LarderResult<Option<ChannelId>> {
        Ok(self.store.hget(&keys::server(guild_id), which.field())?)
    }

    /// Where moderation events are reported, when set.
    pub fn log_channel(&self, guild_id: GuildId) -> LarderResult<Option<ChannelId>> {
        self.channel(guild_id, ChannelField::LogChannel)
    }

    /// Where the bot speaks when no channel is implied, when set.
    pub fn default_channel(&self, guild_id: GuildId) -> LarderResult<Option<ChannelId>> {
        self.channel(guild_id, ChannelField::DefaultChannel)
    }

    /// Set or clear an announcement template.
    #[instrument(skip(self, message), fields(guild_id = %guild_id))]
    pub fn set_event_message(
        &self,
        guild_id: GuildId,
        which: EventMessage,
        message: Option<&str>,
    ) -> LarderResult<bool> {
        let key = keys::server(guild_id);
        match message {
            Some(text) => {
                input::bounded("message", text)?;
                Ok(self.store.hset(&key, which.field(), text)?)
            }
            None => Ok(self.store.hdel(&key, which.field())?),
        }
    }

    /// [`GuildStore::set_event_message`] by stored field name.
    pub fn set_event_message_by_name(
        &self,
        guild_id: GuildId,
        name: &str,
        message: Option<&str>,
    ) -> LarderResult<bool> {
        input::bounded("name", name)?;
        let which: EventMessage = name.parse()?;
        self.set_event_message(guild_id, which, message)
    }

    /// Announcement template for an event, when set.
    pub fn event_message(
        &self,
        guild_id: GuildId,
        which: EventMessage,
    ) -> LarderResult<Option<String>> {
        Ok(self.store.hget(&keys::server(guild_id), which.field())?)
    }

    /// Command prefix, when configured.
    pub fn prefix(&self, guild_id: GuildId) -> LarderResult<Option<String>> {
        Ok(self.store.hget(&keys::server(guild_id), field::PREFIX)?)
    }

    /// Change the command prefix.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub fn set_prefix(&self, guild_id: GuildId, prefix: &str) -> LarderResult<()> {
        input::bounded("prefix", prefix)?;
        self.store.hset(&keys::server(guild_id), field::PREFIX, prefix)?;
        Ok(())
    }

    /// Whether the bot is asleep in this guild; absent reads as awake.
    pub fn is_sleeping(&self, guild_id: GuildId) -> LarderResult<bool> {
        let value: Option<String> = self.store.hget(&keys::server(guild_id), field::SLEEPING)?;
        Ok(model::flag(value))
    }

    /// Put the bot to sleep or wake it for a guild.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub fn set_sleeping(&self, guild_id: GuildId, sleeping: bool) -> LarderResult<()> {
        self.store.hset(&keys::server(guild_id), field::SLEEPING, sleeping)?;
        Ok(())
    }

    /// Language code, when configured.
    pub fn language(&self, guild_id: GuildId) -> LarderResult<Option<String>> {
        Ok(self.store.hget(&keys::server(guild_id), field::LANGUAGE)?)
    }

    /// Change the language code.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub fn set_language(&self, guild_id: GuildId, language: &str) -> LarderResult<()> {
        input::bounded("language", language)?;
        self.store.hset(&keys::server(guild_id), field::LANGUAGE, language)?;
        Ok(())
    }

    // ============================================================
    // Custom commands
    // ============================================================

    /// Store a custom command.
    ///
    /// Returns false without writing when the trigger is over
    /// [`MAX_TRIGGER_LEN`](crate::MAX_TRIGGER_LEN) characters.
    #[instrument(skip(self, response), fields(guild_id = %guild_id))]
    pub fn set_custom_command(
        &self,
        guild_id: GuildId,
        trigger: &str,
        response: &str,
    ) -> LarderResult<bool> {
        input::bounded("trigger", trigger)?;
        input::bounded("response", response)?;
        if trigger.chars().count() > input::MAX_TRIGGER_LEN {
            debug!("trigger over length cap, rejected");
            return Ok(false);
        }
        self.store.hset(&keys::commands(guild_id), trigger, response)?;
        Ok(true)
    }

    /// Remove a custom command; returns whether it existed.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub fn remove_custom_command(&self, guild_id: GuildId, trigger: &str) -> LarderResult<bool> {
        input::bounded("trigger", trigger)?;
        Ok(self.store.hdel(&keys::commands(guild_id), trigger)?)
    }

    /// Response for a trigger, when defined.
    pub fn custom_command(&self, guild_id: GuildId, trigger: &str) -> LarderResult<Option<String>> {
        Ok(self.store.hget(&keys::commands(guild_id), trigger)?)
    }

    /// All commands for a guild, empty when none are defined.
    pub fn custom_commands(&self, guild_id: GuildId) -> LarderResult<HashMap<String, String>> {
        Ok(self.store.hgetall(&keys::commands(guild_id))?)
    }

    /// Defined triggers.
    pub fn custom_command_names(&self, guild_id: GuildId) -> LarderResult<Vec<String>> {
        Ok(self.store.hkeys(&keys::commands(guild_id))?)
    }

    /// Number of defined commands.
    pub fn command_count(&self, guild_id: GuildId) -> LarderResult<usize> {
        Ok(self.store.hlen(&keys::commands(guild_id))?)
    }

    /// Whether a trigger is defined.
    pub fn has_custom_command(&self, guild_id: GuildId, trigger: &str) -> LarderResult<bool> {
        Ok(self.store.hexists(&keys::commands(guild_id), trigger)?)
    }

    // ============================================================
    // Channel blacklist
    // ============================================================

    /// Hide a channel from the bot; false when already hidden.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub fn add_blacklisted_channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> LarderResult<bool> {
        Ok(self.store.sadd(&keys::blacklist(guild_id), channel_id)?)
    }

    /// Show a channel to the bot again; false when it was not hidden.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub fn remove_blacklisted_channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> LarderResult<bool> {
        Ok(self.store.srem(&keys::blacklist(guild_id), channel_id)?)
    }

    /// Whether the bot ignores a channel.
    pub fn is_channel_blacklisted(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> LarderResult<bool> {
        Ok(self.store.sismember(&keys::blacklist(guild_id), channel_id)?)
    }

    /// All hidden channels, empty when none.
    pub fn blacklisted_channels(&self, guild_id: GuildId) -> LarderResult<Vec<ChannelId>> {
        Ok(self.store.smembers(&keys::blacklist(guild_id))?)
    }

    // ============================================================
    // Mutes
    // ============================================================

    /// Record a member as muted; false when already muted.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub fn mute_member(&self, guild_id: GuildId, user_id: UserId) -> LarderResult<bool> {
        Ok(self.store.sadd(&keys::mutes(guild_id), user_id)?)
    }

    /// Lift a member's mute; false when they were not muted.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub fn unmute_member(&self, guild_id: GuildId, user_id: UserId) -> LarderResult<bool> {
        Ok(self.store.srem(&keys::mutes(guild_id), user_id)?)
    }

    /// Whether a member is muted.
    pub fn is_muted(&self, guild_id: GuildId, user_id: UserId) -> LarderResult<bool> {
        Ok(self.store.sismember(&keys::mutes(guild_id), user_id)?)
    }

    /// All muted members, empty when none.
    pub fn muted_members(&self, guild_id: GuildId) -> LarderResult<Vec<UserId>> {
        Ok(self.store.smembers(&keys::mutes(guild_id))?)
    }

    // ============================================================
    // Self-assignable roles
    // ============================================================

    /// Make a role self-assignable; false when already listed.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub fn add_selfrole(&self, guild_id: GuildId, role: &str) -> LarderResult<bool> {
        input::bounded("role", role)?;
        Ok(self.store.sadd(&keys::selfroles(guild_id), role)?)
    }

    /// Withdraw a role from self-assignment; false when not listed.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub fn remove_selfrole(&self, guild_id: GuildId, role: &str) -> LarderResult<bool> {
        input::bounded("role", role)?;
        Ok(self.store.srem(&keys::selfroles(guild_id), role)?)
    }

    /// Whether a role is self-assignable.
    pub fn is_selfrole(&self, guild_id: GuildId, role: &str) -> LarderResult<bool> {
        Ok(self.store.sismember(&keys::selfroles(guild_id), role)?)
    }

    /// All self-assignable roles, empty when none.
    pub fn selfroles(&self, guild_id: GuildId) -> LarderResult<Vec<String>> {
        Ok(self.store.smembers(&keys::selfroles(guild_id))?)
    }

    // ============================================================
    // Composite reads
    // ============================================================

    /// Everything stored for a guild, `None` when not set up.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub fn snapshot(&self, guild_id: GuildId) -> LarderResult<Option<GuildSnapshot>> {
        let Some(config) = self.config(guild_id)? else {
            return Ok(None);
        };
        Ok(Some(GuildSnapshot {
            config,
            commands: self.custom_commands(guild_id)?,
            blacklist: self.blacklisted_channels(guild_id)?,
            mutes: self.muted_members(guild_id)?,
        }))
    }
}
