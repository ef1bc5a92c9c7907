//! Pool construction and readiness probing.

use crate::settings::{ConnectionSettings, RetryPolicy};
use larder_error::{StoreError, StoreErrorKind, StoreResult};
use tracing::{debug, info, warn};

/// Shared connection pool over the key-value store.
pub type RedisPool = r2d2::Pool<redis::Client>;

/// Build a pool from settings without contacting the store.
///
/// Connections are established lazily as operations draw them; call
/// [`wait_until_ready`] to block until the store actually answers.
///
/// # Errors
///
/// Fails when the settings do not form a valid connection target.
pub fn create_pool(settings: &ConnectionSettings) -> StoreResult<RedisPool> {
    let client = redis::Client::open(settings.connection_info())?;
    let pool = r2d2::Pool::builder()
        .max_size(*settings.pool_size())
        .connection_timeout(settings.connect_timeout())
        .build_unchecked(client);
    debug!(
        host = %settings.host(),
        port = %settings.port(),
        db = %settings.db(),
        "connection pool created"
    );
    Ok(pool)
}

/// Block until the store answers a PING, per the retry policy.
///
/// Sleeps `policy.interval()` between failed probes. With a bounded
/// policy the final failure returns
/// [`StoreErrorKind::Unavailable`] carrying the attempt count.
pub fn wait_until_ready(pool: &RedisPool, policy: &RetryPolicy) -> StoreResult<()> {
    let mut attempts: u32 = 0;
    loop {
        attempts += 1;
        match probe(pool) {
            Ok(()) => {
                info!(attempts, "key-value store ready");
                return Ok(());
            }
            Err(err) => {
                warn!(attempt = attempts, error = %err, "store probe failed");
                if let Some(max) = *policy.max_attempts()
                    && attempts >= max
                {
                    return Err(StoreError::new(StoreErrorKind::Unavailable { attempts }));
                }
                std::thread::sleep(policy.interval());
            }
        }
    }
}

fn probe(pool: &RedisPool) -> StoreResult<()> {
    let mut conn = pool.get()?;
    redis::cmd("PING").query::<String>(&mut *conn)?;
    Ok(())
}
