//! Integration tests against a running store.
//!
//! All tests target database 15 so a developer instance keeps its real
//! data. Run with:
//!
//! ```bash
//! cargo test -p larder_guild -- --ignored
//! ```

use larder_guild::{
    ChannelField, EventMessage, GuildDefaults, GuildProfile, GuildStore, ModerationSetting,
};
use larder_keystore::{ConnectionSettings, KeyStore, RetryPolicy, create_pool, wait_until_ready};
use std::collections::HashSet;

const SETUP_GUILD: u64 = 910_000_001;
const ENSURE_GUILD: u64 = 910_000_002;
const RESET_GUILD: u64 = 910_000_003;
const DELETE_GUILD: u64 = 910_000_004;
const RECONCILE_GUILD: u64 = 910_000_005;
const RECONCILE_ABSENT: u64 = 910_000_006;
const SWEEP_KEPT: u64 = 910_000_007;
const SWEEP_STALE: u64 = 910_000_008;
const TRIGGER_GUILD: u64 = 910_000_009;
const BOUND_GUILD: u64 = 910_000_010;
const MODERATION_GUILD: u64 = 910_000_011;
const SYNONYM_GUILD: u64 = 910_000_012;
const CHANNEL_GUILD: u64 = 910_000_013;
const SLEEP_GUILD: u64 = 910_000_014;
const ROSTER_GUILD: u64 = 910_000_015;
const COMMAND_GUILD: u64 = 910_000_016;
const PRUNE_GUILD: u64 = 910_000_017;
const SNAPSHOT_GUILD: u64 = 910_000_018;

/// Every id this file may leave behind; the sweep test treats the rest
/// of them as live so parallel tests keep their state.
const ALL_GUILDS: [u64; 18] = [
    SETUP_GUILD,
    ENSURE_GUILD,
    RESET_GUILD,
    DELETE_GUILD,
    RECONCILE_GUILD,
    RECONCILE_ABSENT,
    SWEEP_KEPT,
    SWEEP_STALE,
    TRIGGER_GUILD,
    BOUND_GUILD,
    MODERATION_GUILD,
    SYNONYM_GUILD,
    CHANNEL_GUILD,
    SLEEP_GUILD,
    ROSTER_GUILD,
    COMMAND_GUILD,
    PRUNE_GUILD,
    SNAPSHOT_GUILD,
];

fn test_settings() -> ConnectionSettings {
    dotenvy::dotenv().ok();
    ConnectionSettings::data_from_env().with_db(15)
}

fn connect() -> GuildStore {
    let pool = create_pool(&test_settings()).expect("pool");
    let policy = RetryPolicy::default()
        .with_interval_secs(1)
        .with_max_attempts(Some(3));
    wait_until_ready(&pool, &policy).expect("store not reachable");
    GuildStore::new(pool, GuildDefaults::default())
}

fn raw_store() -> KeyStore {
    KeyStore::new(create_pool(&test_settings()).expect("pool"))
}

#[test]
#[ignore = "requires a running redis server"]
fn setup_writes_template_without_null_defaults() {
    let guilds = connect();
    guilds.delete_guild(SETUP_GUILD).expect("clean slate");

    let profile = GuildProfile::new(SETUP_GUILD, "it setup guild").with_owner(501);
    guilds.setup(&profile).expect("setup");

    assert!(guilds.exists(SETUP_GUILD).expect("exists"));
    let config = guilds
        .config(SETUP_GUILD)
        .expect("config")
        .expect("configured");
    assert_eq!(config.name, "it setup guild");
    assert_eq!(config.owner, Some(501));
    assert_eq!(config.prefix, "!");
    assert_eq!(config.language, "en");
    assert!(!config.sleeping);

    // unset null defaults are absent, not sentinel strings
    let welcome: Option<String> = guilds
        .get_var(SETUP_GUILD, "welcomemsg")
        .expect("read welcomemsg");
    assert_eq!(welcome, None);
    let written = raw_store()
        .hlen(&format!("server:{SETUP_GUILD}"))
        .expect("hlen");
    assert_eq!(written, 8);

    guilds.delete_guild(SETUP_GUILD).expect("cleanup");
}

#[test]
#[ignore = "requires a running redis server"]
fn ensure_preserves_existing_configuration() {
    let guilds = connect();
    guilds.delete_guild(ENSURE_GUILD).expect("clean slate");

    let profile = GuildProfile::new(ENSURE_GUILD, "it ensure guild");
    assert!(guilds.ensure(&profile).expect("first ensure"));
    guilds.set_prefix(ENSURE_GUILD, "?").expect("set prefix");

    assert!(!guilds.ensure(&profile).expect("second ensure"));
    let prefix = guilds.prefix(ENSURE_GUILD).expect("prefix");
    assert_eq!(prefix.as_deref(), Some("?"));

    guilds.delete_guild(ENSURE_GUILD).expect("cleanup");
}

#[test]
#[ignore = "requires a running redis server"]
fn reset_restores_defaults_but_keeps_collections() {
    let guilds = connect();
    guilds.delete_guild(RESET_GUILD).expect("clean slate");

    let profile = GuildProfile::new(RESET_GUILD, "it reset guild");
    guilds.setup(&profile).expect("setup");
    guilds.set_prefix(RESET_GUILD, "$$").expect("set prefix");
    guilds
        .set_custom_command(RESET_GUILD, "hello", "hi there")
        .expect("set command");
    guilds
        .add_blacklisted_channel(RESET_GUILD, 9200)
        .expect("blacklist");

    guilds.reset(&profile).expect("reset");

    let prefix = guilds.prefix(RESET_GUILD).expect("prefix");
    assert_eq!(prefix.as_deref(), Some("!"));
    assert!(
        guilds
            .has_custom_command(RESET_GUILD, "hello")
            .expect("command survives")
    );
    assert!(
        guilds
            .is_channel_blacklisted(RESET_GUILD, 9200)
            .expect("blacklist survives")
    );

    guilds.delete_guild(RESET_GUILD).expect("cleanup");
}

#[test]
#[ignore = "requires a running redis server"]
fn delete_guild_removes_the_whole_family() {
    let guilds = connect();
    guilds.delete_guild(DELETE_GUILD).expect("clean slate");

    let profile = GuildProfile::new(DELETE_GUILD, "it delete guild");
    guilds.setup(&profile).expect("setup");
    guilds
        .set_custom_command(DELETE_GUILD, "ping", "pong")
        .expect("command");
    guilds
        .add_blacklisted_channel(DELETE_GUILD, 777)
        .expect("blacklist");
    guilds.mute_member(DELETE_GUILD, 888).expect("mute");
    guilds.add_selfrole(DELETE_GUILD, "gamer").expect("selfrole");
    let voting = guilds.namespace("voting");
    voting
        .set(&DELETE_GUILD.to_string(), "legacy residue")
        .expect("voting key");

    let removed = guilds.delete_guild(DELETE_GUILD).expect("delete");
    assert_eq!(removed, 6);

    assert!(!guilds.exists(DELETE_GUILD).expect("exists"));
    assert_eq!(guilds.command_count(DELETE_GUILD).expect("commands"), 0);
    assert!(
        guilds
            .blacklisted_channels(DELETE_GUILD)
            .expect("blacklist")
            .is_empty()
    );
    assert!(guilds.muted_members(DELETE_GUILD).expect("mutes").is_empty());
    assert!(guilds.selfroles(DELETE_GUILD).expect("selfroles").is_empty());
    let residue: Option<String> = voting.get(&DELETE_GUILD.to_string()).expect("voting read");
    assert_eq!(residue, None);
}

#[test]
#[ignore = "requires a running redis server"]
fn reconcile_realigns_name_and_owner() {
    let guilds = connect();
    guilds.delete_guild(RECONCILE_GUILD).expect("clean slate");
    guilds.delete_guild(RECONCILE_ABSENT).expect("clean slate");

    let stored = GuildProfile::new(RECONCILE_GUILD, "old name").with_owner(1);
    guilds.setup(&stored).expect("setup");

    let live = GuildProfile::new(RECONCILE_GUILD, "new name").with_owner(2);
    guilds.reconcile(&live).expect("reconcile");
    let config = guilds
        .config(RECONCILE_GUILD)
        .expect("config")
        .expect("configured");
    assert_eq!(config.name, "new name");
    assert_eq!(config.owner, Some(2));

    // unknown live owner leaves the stored owner alone
    let anonymous = GuildProfile::new(RECONCILE_GUILD, "new name");
    guilds.reconcile(&anonymous).expect("reconcile");
    let config = guilds
        .config(RECONCILE_GUILD)
        .expect("config")
        .expect("configured");
    assert_eq!(config.owner, Some(2));

    // absent guilds are skipped, never created
    let ghost = GuildProfile::new(RECONCILE_ABSENT, "ghost guild");
    guilds.reconcile(&ghost).expect("reconcile absent");
    assert!(!guilds.exists(RECONCILE_ABSENT).expect("exists"));

    guilds.delete_guild(RECONCILE_GUILD).expect("cleanup");
}

#[test]
#[ignore = "requires a running redis server"]
fn sweep_removes_only_stale_guilds() {
    let guilds = connect();
    guilds.delete_guild(SWEEP_KEPT).expect("clean slate");
    guilds.delete_guild(SWEEP_STALE).expect("clean slate");

    guilds
        .setup(&GuildProfile::new(SWEEP_KEPT, "it kept guild"))
        .expect("setup kept");
    guilds
        .setup(&GuildProfile::new(SWEEP_STALE, "it stale guild"))
        .expect("setup stale");
    guilds
        .set_custom_command(SWEEP_STALE, "relic", "gone soon")
        .expect("stale command");

    // every other id in this file counts as live so parallel tests
    // keep their guilds
    let live: HashSet<u64> = ALL_GUILDS
        .iter()
        .copied()
        .filter(|id| *id != SWEEP_STALE)
        .collect();
    let removed = guilds.sweep(&live).expect("sweep");

    assert!(removed.contains(&SWEEP_STALE));
    assert!(!removed.contains(&SWEEP_KEPT));
    assert!(guilds.exists(SWEEP_KEPT).expect("kept exists"));
    assert!(!guilds.exists(SWEEP_STALE).expect("stale gone"));
    assert_eq!(guilds.command_count(SWEEP_STALE).expect("commands"), 0);

    guilds.delete_guild(SWEEP_KEPT).expect("cleanup");
}

#[test]
#[ignore = "requires a running redis server"]
fn trigger_cap_is_a_quiet_boundary() {
    let guilds = connect();
    guilds.delete_guild(TRIGGER_GUILD).expect("clean slate");
    guilds
        .setup(&GuildProfile::new(TRIGGER_GUILD, "it trigger guild"))
        .expect("setup");

    let at_cap = "x".repeat(80);
    assert!(
        guilds
            .set_custom_command(TRIGGER_GUILD, &at_cap, "fits")
            .expect("at cap")
    );
    assert!(
        guilds
            .has_custom_command(TRIGGER_GUILD, &at_cap)
            .expect("stored")
    );

    let over_cap = "x".repeat(81);
    assert!(
        !guilds
            .set_custom_command(TRIGGER_GUILD, &over_cap, "does not fit")
            .expect("over cap")
    );
    assert!(
        !guilds
            .has_custom_command(TRIGGER_GUILD, &over_cap)
            .expect("not stored")
    );

    guilds.delete_guild(TRIGGER_GUILD).expect("cleanup");
}

#[test]
#[ignore = "requires a running redis server"]
fn oversized_input_never_reaches_the_store() {
    let guilds = connect();
    guilds.delete_guild(BOUND_GUILD).expect("clean slate");
    guilds
        .setup(&GuildProfile::new(BOUND_GUILD, "it bound guild"))
        .expect("setup");

    let oversized = "v".repeat(1101);
    assert!(
        guilds
            .set_custom_command(BOUND_GUILD, "wall", &oversized)
            .is_err()
    );
    assert!(
        !guilds
            .has_custom_command(BOUND_GUILD, "wall")
            .expect("not stored")
    );

    assert!(guilds.update_var(BOUND_GUILD, "prefix", &oversized).is_err());
    let prefix = guilds.prefix(BOUND_GUILD).expect("prefix");
    assert_eq!(prefix.as_deref(), Some("!"));

    assert!(
        guilds
            .set_event_message(BOUND_GUILD, EventMessage::Welcome, Some(&oversized))
            .is_err()
    );
    let welcome = guilds
        .event_message(BOUND_GUILD, EventMessage::Welcome)
        .expect("welcome");
    assert_eq!(welcome, None);

    // the bound counts characters, not bytes
    let wide = "ü".repeat(1100);
    assert!(
        guilds
            .set_event_message(BOUND_GUILD, EventMessage::Welcome, Some(&wide))
            .expect("wide message fits")
    );

    guilds.delete_guild(BOUND_GUILD).expect("cleanup");
}

#[test]
#[ignore = "requires a running redis server"]
fn unknown_moderation_name_writes_nothing() {
    let guilds = connect();
    guilds.delete_guild(MODERATION_GUILD).expect("clean slate");
    guilds
        .setup(&GuildProfile::new(MODERATION_GUILD, "it moderation guild"))
        .expect("setup");

    assert!(
        guilds
            .update_moderation_setting(MODERATION_GUILD, "banhammer", true)
            .is_err()
    );
    let config = guilds
        .config(MODERATION_GUILD)
        .expect("config")
        .expect("configured");
    assert!(!config.filter_words);
    assert!(!config.filter_spam);
    assert!(!config.filter_invites);
    assert!(config.extra.is_empty());

    guilds.delete_guild(MODERATION_GUILD).expect("cleanup");
}

#[test]
#[ignore = "requires a running redis server"]
fn moderation_synonyms_write_canonical_fields() {
    let guilds = connect();
    guilds.delete_guild(SYNONYM_GUILD).expect("clean slate");
    guilds
        .setup(&GuildProfile::new(SYNONYM_GUILD, "it synonym guild"))
        .expect("setup");

    guilds
        .update_moderation_setting(SYNONYM_GUILD, "word filter", true)
        .expect("synonym accepted");
    guilds
        .update_moderation_setting(SYNONYM_GUILD, "filterinvites", true)
        .expect("synonym accepted");

    assert!(
        guilds
            .filter_enabled(SYNONYM_GUILD, ModerationSetting::WordFilter)
            .expect("word filter on")
    );
    assert!(
        guilds
            .filter_enabled(SYNONYM_GUILD, ModerationSetting::InviteFilter)
            .expect("invite filter on")
    );
    assert!(
        !guilds
            .filter_enabled(SYNONYM_GUILD, ModerationSetting::SpamFilter)
            .expect("spam filter untouched")
    );

    // reads and writes meet at the canonical field name
    let raw: Option<String> = guilds
        .get_var(SYNONYM_GUILD, "filterwords")
        .expect("canonical read");
    assert_eq!(raw.as_deref(), Some("1"));

    guilds.delete_guild(SYNONYM_GUILD).expect("cleanup");
}

#[test]
#[ignore = "requires a running redis server"]
fn channel_pointers_and_event_messages_round_trip() {
    let guilds = connect();
    guilds.delete_guild(CHANNEL_GUILD).expect("clean slate");
    guilds
        .setup(&GuildProfile::new(CHANNEL_GUILD, "it channel guild"))
        .expect("setup");

    guilds
        .set_channel(CHANNEL_GUILD, ChannelField::LogChannel, Some(4100))
        .expect("set log channel");
    assert_eq!(
        guilds.log_channel(CHANNEL_GUILD).expect("log channel"),
        Some(4100)
    );

    guilds
        .set_channel_by_name(CHANNEL_GUILD, "dchan", Some(4200))
        .expect("set default channel");
    assert_eq!(
        guilds.default_channel(CHANNEL_GUILD).expect("default channel"),
        Some(4200)
    );

    // clearing deletes the field instead of writing a sentinel
    guilds
        .set_channel(CHANNEL_GUILD, ChannelField::LogChannel, None)
        .expect("clear log channel");
    assert_eq!(guilds.log_channel(CHANNEL_GUILD).expect("cleared"), None);
    let raw: Option<String> = guilds
        .get_var(CHANNEL_GUILD, "logchannel")
        .expect("raw read");
    assert_eq!(raw, None);

    guilds
        .set_event_message_by_name(CHANNEL_GUILD, "welcomemsg", Some("welcome %user%"))
        .expect("set welcome");
    assert_eq!(
        guilds
            .event_message(CHANNEL_GUILD, EventMessage::Welcome)
            .expect("welcome")
            .as_deref(),
        Some("welcome %user%")
    );
    guilds
        .set_event_message(CHANNEL_GUILD, EventMessage::Welcome, None)
        .expect("clear welcome");
    assert_eq!(
        guilds
            .event_message(CHANNEL_GUILD, EventMessage::Welcome)
            .expect("cleared"),
        None
    );

    guilds.delete_guild(CHANNEL_GUILD).expect("cleanup");
}

#[test]
#[ignore = "requires a running redis server"]
fn sleeping_accepts_legacy_truth_values() {
    let guilds = connect();
    guilds.delete_guild(SLEEP_GUILD).expect("clean slate");
    guilds
        .setup(&GuildProfile::new(SLEEP_GUILD, "it sleep guild"))
        .expect("setup");

    assert!(!guilds.is_sleeping(SLEEP_GUILD).expect("awake by default"));
    guilds.set_sleeping(SLEEP_GUILD, true).expect("sleep");
    assert!(guilds.is_sleeping(SLEEP_GUILD).expect("asleep"));
    guilds.set_sleeping(SLEEP_GUILD, false).expect("wake");
    assert!(!guilds.is_sleeping(SLEEP_GUILD).expect("awake"));

    // hashes written by older releases spell booleans out
    guilds
        .update_var(SLEEP_GUILD, "sleeping", "True")
        .expect("legacy spelling");
    assert!(guilds.is_sleeping(SLEEP_GUILD).expect("legacy read"));

    guilds.delete_guild(SLEEP_GUILD).expect("cleanup");
}

#[test]
#[ignore = "requires a running redis server"]
fn rosters_round_trip() {
    let guilds = connect();
    guilds.delete_guild(ROSTER_GUILD).expect("clean slate");
    guilds
        .setup(&GuildProfile::new(ROSTER_GUILD, "it roster guild"))
        .expect("setup");

    assert!(
        guilds
            .add_blacklisted_channel(ROSTER_GUILD, 100)
            .expect("add")
    );
    assert!(
        !guilds
            .add_blacklisted_channel(ROSTER_GUILD, 100)
            .expect("duplicate add")
    );
    assert!(
        guilds
            .is_channel_blacklisted(ROSTER_GUILD, 100)
            .expect("is blacklisted")
    );
    assert_eq!(
        guilds
            .blacklisted_channels(ROSTER_GUILD)
            .expect("blacklist"),
        vec![100]
    );
    assert!(
        guilds
            .remove_blacklisted_channel(ROSTER_GUILD, 100)
            .expect("remove")
    );
    assert!(
        guilds
            .blacklisted_channels(ROSTER_GUILD)
            .expect("blacklist empty")
            .is_empty()
    );

    assert!(guilds.mute_member(ROSTER_GUILD, 42).expect("mute"));
    assert!(guilds.is_muted(ROSTER_GUILD, 42).expect("is muted"));
    assert!(guilds.unmute_member(ROSTER_GUILD, 42).expect("unmute"));
    assert!(!guilds.is_muted(ROSTER_GUILD, 42).expect("not muted"));
    assert!(!guilds.unmute_member(ROSTER_GUILD, 42).expect("double unmute"));

    assert!(guilds.add_selfrole(ROSTER_GUILD, "artist").expect("add role"));
    assert!(guilds.is_selfrole(ROSTER_GUILD, "artist").expect("is role"));
    assert_eq!(
        guilds.selfroles(ROSTER_GUILD).expect("roles"),
        vec!["artist".to_string()]
    );
    let oversized = "r".repeat(1101);
    assert!(guilds.add_selfrole(ROSTER_GUILD, &oversized).is_err());
    assert!(guilds.remove_selfrole(ROSTER_GUILD, "artist").expect("remove"));

    guilds.delete_guild(ROSTER_GUILD).expect("cleanup");
}

#[test]
#[ignore = "requires a running redis server"]
fn custom_commands_round_trip() {
    let guilds = connect();
    guilds.delete_guild(COMMAND_GUILD).expect("clean slate");
    guilds
        .setup(&GuildProfile::new(COMMAND_GUILD, "it command guild"))
        .expect("setup");

    assert!(
        guilds
            .set_custom_command(COMMAND_GUILD, "hug", "wraps you in a warm blanket")
            .expect("set hug")
    );
    assert!(
        guilds
            .set_custom_command(COMMAND_GUILD, "lore", "it all began in a basement")
            .expect("set lore")
    );

    assert_eq!(guilds.command_count(COMMAND_GUILD).expect("count"), 2);
    let commands = guilds.custom_commands(COMMAND_GUILD).expect("commands");
    assert_eq!(
        commands.get("hug").map(String::as_str),
        Some("wraps you in a warm blanket")
    );
    let mut names = guilds
        .custom_command_names(COMMAND_GUILD)
        .expect("names");
    names.sort();
    assert_eq!(names, vec!["hug".to_string(), "lore".to_string()]);
    assert_eq!(
        guilds
            .custom_command(COMMAND_GUILD, "lore")
            .expect("lore")
            .as_deref(),
        Some("it all began in a basement")
    );

    assert!(
        guilds
            .remove_custom_command(COMMAND_GUILD, "hug")
            .expect("remove")
    );
    assert!(
        !guilds
            .remove_custom_command(COMMAND_GUILD, "hug")
            .expect("double remove")
    );
    assert_eq!(guilds.command_count(COMMAND_GUILD).expect("count"), 1);

    guilds.delete_guild(COMMAND_GUILD).expect("cleanup");
}

#[test]
#[ignore = "requires a running redis server"]
fn prune_removes_fields_outside_the_template() {
    let guilds = connect();
    guilds.delete_guild(PRUNE_GUILD).expect("clean slate");
    guilds
        .setup(&GuildProfile::new(PRUNE_GUILD, "it prune guild"))
        .expect("setup");
    guilds
        .update_var(PRUNE_GUILD, "muterole", "Muted")
        .expect("legacy field");

    let removed = guilds.prune_stale_fields().expect("prune");
    assert!(removed >= 1);

    let legacy: Option<String> = guilds.get_var(PRUNE_GUILD, "muterole").expect("read");
    assert_eq!(legacy, None);
    let prefix = guilds.prefix(PRUNE_GUILD).expect("prefix survives");
    assert_eq!(prefix.as_deref(), Some("!"));

    guilds.delete_guild(PRUNE_GUILD).expect("cleanup");
}

#[test]
#[ignore = "requires a running redis server"]
fn snapshot_collects_configuration_and_collections() {
    let guilds = connect();
    guilds.delete_guild(SNAPSHOT_GUILD).expect("clean slate");

    assert!(
        guilds
            .snapshot(SNAPSHOT_GUILD)
            .expect("snapshot")
            .is_none()
    );

    guilds
        .setup(&GuildProfile::new(SNAPSHOT_GUILD, "it snapshot guild").with_owner(9))
        .expect("setup");
    guilds
        .set_custom_command(SNAPSHOT_GUILD, "ping", "pong")
        .expect("command");
    guilds
        .add_blacklisted_channel(SNAPSHOT_GUILD, 300)
        .expect("blacklist");
    guilds.mute_member(SNAPSHOT_GUILD, 400).expect("mute");

    let snapshot = guilds
        .snapshot(SNAPSHOT_GUILD)
        .expect("snapshot")
        .expect("present");
    assert_eq!(snapshot.config.name, "it snapshot guild");
    assert_eq!(snapshot.config.owner, Some(9));
    assert_eq!(
        snapshot.commands.get("ping").map(String::as_str),
        Some("pong")
    );
    assert_eq!(snapshot.blacklist, vec![300]);
    assert_eq!(snapshot.mutes, vec![400]);

    guilds.delete_guild(SNAPSHOT_GUILD).expect("cleanup");
}
