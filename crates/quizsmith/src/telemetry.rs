//! Tracing initialization.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize console tracing with an env-filter.
///
/// Respects `RUST_LOG`; defaults to info globally and debug for the
/// quizsmith crates. Safe to call more than once: subsequent calls return
/// an error instead of panicking, which callers may ignore.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_console_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,quizsmith=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}
