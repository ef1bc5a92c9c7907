//! Key builders for the per-guild key family.

use crate::model::GuildId;

pub(crate) const SERVER_PATTERN: &str = "server:*";

pub(crate) fn server(id: GuildId) -> String {
    format!("server:{id}")
}

pub(crate) fn commands(id: GuildId) -> String {
    format!("commands:{id}")
}

pub(crate) fn blacklist(id: GuildId) -> String {
    format!("blacklist:{id}")
}

pub(crate) fn mutes(id: GuildId) -> String {
    format!("mutes:{id}")
}

pub(crate) fn selfroles(id: GuildId) -> String {
    format!("sr:{id}")
}

// Written by long-gone releases; still covered on delete.
pub(crate) fn voting(id: GuildId) -> String {
    format!("voting:{id}")
}

/// Every key a guild may own, for a single multi-key delete.
pub(crate) fn family(id: GuildId) -> [String; 6] {
    [
        server(id),
        commands(id),
        blacklist(id),
        mutes(id),
        selfroles(id),
        voting(id),
    ]
}

/// Guild id from a `server:<id>` key, `None` for anything malformed.
pub(crate) fn parse_server(key: &str) -> Option<GuildId> {
    key.strip_prefix("server:")?.parse().ok()
}
