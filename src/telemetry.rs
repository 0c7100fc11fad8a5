//! Logging setup for embedding applications.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global `fmt` subscriber filtered by `RUST_LOG`.
///
/// This crate logs at `info` unless `RUST_LOG` says otherwise. Fails if a
/// global subscriber is already set.
pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("taskboard=info".parse()?))
        .try_init()?;
    Ok(())
}
