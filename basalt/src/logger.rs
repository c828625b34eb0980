//! Logging setup for the server binary.
//!
//! Library crates log through the `log` facade; the binary installs a
//! `tracing-subscriber` formatter (with the log bridge enabled) so both
//! ecosystems land in one place. `RUST_LOG` filters as usual.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
pub fn init() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))?;
    Ok(())
}
