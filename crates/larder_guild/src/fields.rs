//! Closed field enums for the configuration hash.
//!
//! Command handlers hand these user-facing names; each enum parses the
//! recognized set and maps to exactly one stored hash field. Anything
//! outside the set fails to parse with a [`FieldError`] before any store
//! access happens.

use crate::model::field;
use larder_error::{FieldError, FieldErrorKind};

/// Moderation toggles stored on the guild hash.
///
/// Parsing accepts every synonym the commands expose; storage always
/// goes to the canonical field returned by [`ModerationSetting::field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModerationSetting {
    /// Filter messages against the guild word list
    WordFilter,
    /// Filter repeated-message spam
    SpamFilter,
    /// Filter invite links to other guilds
    InviteFilter,
}

impl ModerationSetting {
    /// All settings, in template order.
    pub const ALL: [ModerationSetting; 3] = [
        ModerationSetting::WordFilter,
        ModerationSetting::SpamFilter,
        ModerationSetting::InviteFilter,
    ];

    /// Canonical hash field for this setting.
    pub fn field(&self) -> &'static str {
        match self {
            ModerationSetting::WordFilter => field::FILTER_WORDS,
            ModerationSetting::SpamFilter => field::FILTER_SPAM,
            ModerationSetting::InviteFilter => field::FILTER_INVITE,
        }
    }
}

impl std::str::FromStr for ModerationSetting {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "word filter" | "filter words" | "filterwords" | "wordfilter" => {
                Ok(ModerationSetting::WordFilter)
            }
            "spam filter" | "filter spam" | "spamfilter" | "filterspam" => {
                Ok(ModerationSetting::SpamFilter)
            }
            "invite filter" | "filterinvite" | "filterinvites" | "invitefilter" => {
                Ok(ModerationSetting::InviteFilter)
            }
            _ => Err(FieldError::new(FieldErrorKind::ModerationSetting(
                s.to_string(),
            ))),
        }
    }
}

impl std::fmt::Display for ModerationSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field())
    }
}

/// Channel pointers stored on the guild hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelField {
    /// Where moderation events are reported
    LogChannel,
    /// Where the bot speaks when no channel is implied
    DefaultChannel,
}

impl ChannelField {
    /// All channel fields, in template order.
    pub const ALL: [ChannelField; 2] = [ChannelField::LogChannel, ChannelField::DefaultChannel];

    /// Stored hash field for this pointer.
    pub fn field(&self) -> &'static str {
        match self {
            ChannelField::LogChannel => field::LOG_CHANNEL,
            ChannelField::DefaultChannel => field::DEFAULT_CHANNEL,
        }
    }
}

impl std::str::FromStr for ChannelField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logchannel" => Ok(ChannelField::LogChannel),
            "dchan" => Ok(ChannelField::DefaultChannel),
            _ => Err(FieldError::new(FieldErrorKind::ChannelField(s.to_string()))),
        }
    }
}

impl std::fmt::Display for ChannelField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field())
    }
}

/// Announcement templates stored on the guild hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventMessage {
    /// Member joined
    Welcome,
    /// Member banned
    Ban,
    /// Member kicked
    Kick,
    /// Member left
    Leave,
}

impl EventMessage {
    /// All event messages, in template order.
    pub const ALL: [EventMessage; 4] = [
        EventMessage::Welcome,
        EventMessage::Kick,
        EventMessage::Ban,
        EventMessage::Leave,
    ];

    /// Stored hash field for this template.
    pub fn field(&self) -> &'static str {
        match self {
            EventMessage::Welcome => field::WELCOME,
            EventMessage::Ban => field::BAN,
            EventMessage::Kick => field::KICK,
            EventMessage::Leave => field::LEAVE,
        }
    }
}

impl std::str::FromStr for EventMessage {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "welcomemsg" => Ok(EventMessage::Welcome),
            "banmsg" => Ok(EventMessage::Ban),
            "kickmsg" => Ok(EventMessage::Kick),
            "leavemsg" => Ok(EventMessage::Leave),
            _ => Err(FieldError::new(FieldErrorKind::EventMessage(s.to_string()))),
        }
    }
}

impl std::fmt::Display for EventMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field())
    }
}
