//! Guild identity and configuration models.

use crate::fields::{ChannelField, EventMessage, ModerationSetting};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Discord guild (server) id.
pub type GuildId = u64;
/// Discord user id.
pub type UserId = u64;
/// Discord channel id.
pub type ChannelId = u64;

/// Stored field names of the `server:<id>` hash.
pub(crate) mod field {
    pub const NAME: &str = "name";
    pub const OWNER: &str = "owner";
    pub const FILTER_WORDS: &str = "filterwords";
    pub const FILTER_SPAM: &str = "filterspam";
    pub const FILTER_INVITE: &str = "filterinvite";
    pub const SLEEPING: &str = "sleeping";
    pub const WELCOME: &str = "welcomemsg";
    pub const KICK: &str = "kickmsg";
    pub const BAN: &str = "banmsg";
    pub const LEAVE: &str = "leavemsg";
    pub const LOG_CHANNEL: &str = "logchannel";
    pub const PREFIX: &str = "prefix";
    pub const DEFAULT_CHANNEL: &str = "dchan";
    pub const LANGUAGE: &str = "lang";
}

/// Live identity of a guild as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildProfile {
    /// Guild id
    pub id: GuildId,
    /// Guild name
    pub name: String,
    /// Owner id when known
    pub owner_id: Option<UserId>,
}

impl GuildProfile {
    /// Create a profile with an unknown owner.
    pub fn new(id: GuildId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            owner_id: None,
        }
    }

    /// Attach the owner id.
    pub fn with_owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }
}

/// Initial values written at guild setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildDefaults {
    /// Command prefix for new guilds
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Language code for new guilds
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for GuildDefaults {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            language: default_language(),
        }
    }
}

/// Typed view of the `server:<id>` configuration hash.
///
/// Fields with null defaults are `Option` here and absent from the hash
/// when unset; absence is the representation, never a sentinel string.
/// Serialization uses the stored field names, so an exported snapshot
/// reads the same as the hash itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuildConfig {
    /// Guild name as last reconciled
    #[serde(default)]
    pub name: String,
    /// Owner id, `None` when never learned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserId>,
    /// Word filter toggle
    #[serde(rename = "filterwords", default)]
    pub filter_words: bool,
    /// Spam filter toggle
    #[serde(rename = "filterspam", default)]
    pub filter_spam: bool,
    /// Invite filter toggle
    #[serde(rename = "filterinvite", default)]
    pub filter_invites: bool,
    /// Whether the bot ignores the guild
    #[serde(default)]
    pub sleeping: bool,
    /// Template announced when a member joins
    #[serde(rename = "welcomemsg", default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    /// Template announced when a member is kicked
    #[serde(rename = "kickmsg", default, skip_serializing_if = "Option::is_none")]
    pub kick_message: Option<String>,
    /// Template announced when a member is banned
    #[serde(rename = "banmsg", default, skip_serializing_if = "Option::is_none")]
    pub ban_message: Option<String>,
    /// Template announced when a member leaves
    #[serde(rename = "leavemsg", default, skip_serializing_if = "Option::is_none")]
    pub leave_message: Option<String>,
    /// Where moderation events are reported
    #[serde(rename = "logchannel", default, skip_serializing_if = "Option::is_none")]
    pub log_channel: Option<ChannelId>,
    /// Command prefix
    #[serde(default)]
    pub prefix: String,
    /// Where the bot speaks when no channel is implied
    #[serde(rename = "dchan", default, skip_serializing_if = "Option::is_none")]
    pub default_channel: Option<ChannelId>,
    /// Language code
    #[serde(rename = "lang", default)]
    pub language: String,
    /// Fields outside the template, preserved as stored
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl GuildConfig {
    /// Initial configuration for a freshly joined guild.
    pub fn initial(profile: &GuildProfile, defaults: &GuildDefaults) -> Self {
        Self {
            name: profile.name.clone(),
            owner: profile.owner_id,
            prefix: defaults.prefix.clone(),
            language: defaults.language.clone(),
            ..Self::default()
        }
    }

    /// Canonical hash fields, including those unset by default.
    pub fn template() -> [&'static str; 14] {
        [
            field::NAME,
            field::OWNER,
            field::FILTER_WORDS,
            field::FILTER_SPAM,
            field::FILTER_INVITE,
            field::SLEEPING,
            field::WELCOME,
            field::KICK,
            field::BAN,
            field::LEAVE,
            field::LOG_CHANNEL,
            field::PREFIX,
            field::DEFAULT_CHANNEL,
            field::LANGUAGE,
        ]
    }

    /// Hash fields to write; null-default fields are omitted when unset.
    pub fn to_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            (field::NAME.to_string(), self.name.clone()),
            (field::FILTER_WORDS.to_string(), flag_field(self.filter_words)),
            (field::FILTER_SPAM.to_string(), flag_field(self.filter_spam)),
            (
                field::FILTER_INVITE.to_string(),
                flag_field(self.filter_invites),
            ),
            (field::SLEEPING.to_string(), flag_field(self.sleeping)),
            (field::PREFIX.to_string(), self.prefix.clone()),
            (field::LANGUAGE.to_string(), self.language.clone()),
        ];
        if let Some(owner) = self.owner {
            fields.push((field::OWNER.to_string(), owner.to_string()));
        }
        if let Some(message) = &self.welcome_message {
            fields.push((field::WELCOME.to_string(), message.clone()));
        }
        if let Some(message) = &self.kick_message {
            fields.push((field::KICK.to_string(), message.clone()));
        }
        if let Some(message) = &self.ban_message {
            fields.push((field::BAN.to_string(), message.clone()));
        }
        if let Some(message) = &self.leave_message {
            fields.push((field::LEAVE.to_string(), message.clone()));
        }
        if let Some(channel) = self.log_channel {
            fields.push((field::LOG_CHANNEL.to_string(), channel.to_string()));
        }
        if let Some(channel) = self.default_channel {
            fields.push((field::DEFAULT_CHANNEL.to_string(), channel.to_string()));
        }
        for (name, value) in &self.extra {
            fields.push((name.clone(), value.clone()));
        }
        fields
    }

    /// Rebuild the typed view from a stored hash.
    pub fn from_hash(mut map: HashMap<String, String>) -> Self {
        let mut config = Self::default();
        if let Some(name) = map.remove(field::NAME) {
            config.name = name;
        }
        config.owner = map.remove(field::OWNER).and_then(|v| v.parse().ok());
        config.filter_words = flag(map.remove(field::FILTER_WORDS));
        config.filter_spam = flag(map.remove(field::FILTER_SPAM));
        config.filter_invites = flag(map.remove(field::FILTER_INVITE));
        config.sleeping = flag(map.remove(field::SLEEPING));
        config.welcome_message = map.remove(field::WELCOME);
        config.kick_message = map.remove(field::KICK);
        config.ban_message = map.remove(field::BAN);
        config.leave_message = map.remove(field::LEAVE);
        config.log_channel = map.remove(field::LOG_CHANNEL).and_then(|v| v.parse().ok());
        if let Some(prefix) = map.remove(field::PREFIX) {
            config.prefix = prefix;
        }
        config.default_channel = map
            .remove(field::DEFAULT_CHANNEL)
            .and_then(|v| v.parse().ok());
        if let Some(language) = map.remove(field::LANGUAGE) {
            config.language = language;
        }
        config.extra = map.into_iter().collect();
        config
    }

    /// Whether a moderation filter is on.
    pub fn filter(&self, setting: ModerationSetting) -> bool {
        match setting {
            ModerationSetting::WordFilter => self.filter_words,
            ModerationSetting::SpamFilter => self.filter_spam,
            ModerationSetting::InviteFilter => self.filter_invites,
        }
    }

    /// Channel a pointer field holds, when set.
    pub fn channel(&self, which: ChannelField) -> Option<ChannelId> {
        match which {
            ChannelField::LogChannel => self.log_channel,
            ChannelField::DefaultChannel => self.default_channel,
        }
    }

    /// Announcement template for an event, when set.
    pub fn event_message(&self, which: EventMessage) -> Option<&str> {
        match which {
            EventMessage::Welcome => self.welcome_message.as_deref(),
            EventMessage::Ban => self.ban_message.as_deref(),
            EventMessage::Kick => self.kick_message.as_deref(),
            EventMessage::Leave => self.leave_message.as_deref(),
        }
    }
}

fn flag_field(on: bool) -> String {
    if on { "1".to_string() } else { "0".to_string() }
}

/// Stored flag values. Older releases wrote stringified booleans, so
/// both spellings read as on.
pub(crate) fn flag(value: Option<String>) -> bool {
    matches!(value.as_deref(), Some("1") | Some("true") | Some("True"))
}

/// Composite export of one guild's stored state.
///
/// Matches what the stats and admin surfaces expect: configuration plus
/// the collections, with self-roles intentionally excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildSnapshot {
    /// Configuration hash, typed
    pub config: GuildConfig,
    /// Custom commands (trigger to response)
    pub commands: HashMap<String, String>,
    /// Blacklisted channel ids
    pub blacklist: Vec<ChannelId>,
    /// Muted user ids
    pub mutes: Vec<UserId>,
}
