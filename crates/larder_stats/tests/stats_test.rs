//! Integration test against a running store.
//!
//! The counters share one `stats` hash, so all steps live in a single
//! test. Targets database 15; run with:
//!
//! ```bash
//! cargo test -p larder_stats -- --ignored
//! ```

use larder_keystore::{ConnectionSettings, KeyStore, RetryPolicy, create_pool, wait_until_ready};
use larder_stats::{Stat, StatsCounter};

#[test]
#[ignore = "requires a running redis server"]
fn counters_batch_and_flush_durably() {
    dotenvy::dotenv().ok();
    let settings = ConnectionSettings::data_from_env().with_db(15);
    let pool = create_pool(&settings).expect("pool");
    let policy = RetryPolicy::default()
        .with_interval_secs(1)
        .with_max_attempts(Some(3));
    wait_until_ready(&pool, &policy).expect("store not reachable");
    let raw = KeyStore::new(pool.clone());
    raw.del("stats").expect("clean slate");

    // seeding creates every field at zero
    let stats = StatsCounter::new(pool.clone()).expect("seeded counter");
    let seeded = stats.snapshot().expect("snapshot");
    assert_eq!(seeded.len(), 12);
    assert!(seeded.values().all(|v| *v == 0));

    // below the threshold nothing reaches the store
    for _ in 0..4 {
        stats.record(Stat::Messages).expect("record");
    }
    assert_eq!(stats.pending(Stat::Messages), 4);
    assert_eq!(stats.amount(Stat::Messages).expect("durable"), 0);

    // the record that reaches the threshold flushes the whole batch
    stats.record(Stat::Messages).expect("flushing record");
    assert_eq!(stats.pending(Stat::Messages), 0);
    assert_eq!(stats.amount(Stat::Messages).expect("durable"), 5);
    assert!(stats.last_flush_age().is_some());

    // flush_all drains partial batches, for shutdown paths
    assert!(stats.record_by_name("votesgot").expect("known name"));
    assert!(stats.record_by_name("votesgot").expect("known name"));
    assert!(!stats.record_by_name("no such stat").expect("unknown name"));
    assert_eq!(stats.amount(Stat::VotesReceived).expect("durable"), 0);
    stats.flush_all().expect("flush all");
    assert_eq!(stats.amount(Stat::VotesReceived).expect("durable"), 2);
    assert_eq!(stats.pending(Stat::VotesReceived), 0);

    // bulk adds batch the same way
    stats.add(Stat::ImageBytes, 250_000).expect("bulk add");
    assert_eq!(stats.amount(Stat::ImageBytes).expect("durable"), 250_000);

    // seeding over live data must not zero it
    let second = StatsCounter::new(pool).expect("second counter");
    assert_eq!(second.amount(Stat::Messages).expect("durable"), 5);

    raw.del("stats").expect("cleanup");
}
