//! Console tracing setup for binaries and examples.

use larder_error::{ConfigError, LarderResult};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console tracing.
///
/// Respects `RUST_LOG` when set, otherwise logs at `info` globally and
/// `debug` for this crate. Fails if a global subscriber is already
/// installed, so embedders that bring their own subscriber should skip
/// this call.
pub fn init_tracing() -> LarderResult<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,larder=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| ConfigError::new(format!("Failed to install tracing subscriber: {}", e)))?;

    Ok(())
}
