//! Tracing bootstrap for embedding hosts.
//!
//! The core is a library and never installs a subscriber on its own; hosts
//! that do not bring their own tracing setup can call [`init_logging`] once
//! at startup. Credentials never reach the log stream: the config type
//! redacts them from `Debug`, and no client logs request bodies.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a stderr subscriber honoring `RUST_LOG`, defaulting to `warn`.
///
/// Returns an error if a global subscriber is already set.
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with_default("warn")
}

/// Install a stderr subscriber with an explicit default filter.
pub fn init_logging_with_default(default_filter: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .try_init()?;

    Ok(())
}
