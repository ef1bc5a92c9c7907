//! Complete example of running guild persistence under an async runtime.
//!
//! This example demonstrates:
//! - Loading configuration from the environment
//! - Initializing the process-wide store registry
//! - Offloading blocking store calls with `spawn_blocking`
//! - Recording write-batched statistics
//! - Plugin scratch space on the cache store
//!
//! Requires running stores (localhost:6379 for data, localhost:6380 for
//! cache by default; override with `REDIS_*` variables).
//!
//! Run with:
//! ```bash
//! cargo run --example guild_setup
//! ```

use larder::{GuildProfile, Stat, Stores};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    larder::init_tracing()?;

    println!("🗄️  Guild Setup Example");
    println!("=======================\n");

    // 1. Connect both pools and publish the registry
    println!("📋 Connecting stores...");
    let config = larder::LarderConfig::from_env();
    let stores: &'static Stores = larder::init(&config)?;
    println!(
        "   ✓ Data store on {}:{}",
        config.data.host(),
        config.data.port()
    );
    println!(
        "   ✓ Cache store on {}:{}",
        config.cache.host(),
        config.cache.port()
    );

    // 2. Provision a guild and adjust its configuration
    println!("\n🏰 Provisioning guild...");
    let profile = GuildProfile::new(4242, "demo guild").with_owner(1001);
    let guild_id = profile.id;
    let created =
        tokio::task::spawn_blocking(move || stores.guilds().ensure(&profile)).await??;
    println!(
        "   ✓ Guild {}: {}",
        guild_id,
        if created {
            "provisioned"
        } else {
            "already present"
        }
    );

    let snapshot = tokio::task::spawn_blocking(move || {
        let guilds = stores.guilds();
        guilds.set_prefix(guild_id, "?")?;
        guilds.add_selfrole(guild_id, "announcements")?;
        guilds.set_custom_command(guild_id, "hug", "wraps you in a warm blanket")?;
        guilds.snapshot(guild_id)
    })
    .await??;
    if let Some(snapshot) = snapshot {
        println!("   ✓ Prefix: {}", snapshot.config.prefix);
        println!("   ✓ Custom commands: {}", snapshot.commands.len());
    }

    // 3. Record usage and flush the batch
    println!("\n📊 Recording statistics...");
    tokio::task::spawn_blocking(move || {
        let stats = stores.stats();
        for _ in 0..3 {
            stats.record(Stat::Messages)?;
        }
        stats.record(Stat::PeopleHelped)?;
        stats.flush_all()
    })
    .await??;
    println!("   ✓ Batch flushed to the stats hash");

    // 4. Plugin scratch space on the cache store
    println!("\n🔌 Plugin cache...");
    let cached: Option<String> = tokio::task::spawn_blocking(move || {
        let cache = stores.plugin_cache("economy");
        cache.set("daily:1001", "claimed")?;
        cache.expire("daily:1001", 60)?;
        cache.get("daily:1001")
    })
    .await??;
    println!("   ✓ economy:daily:1001 = {:?}", cached);

    println!("\n✅ Done");
    Ok(())
}
