//! Logging setup.
//!
//! `RUST_LOG` wins when set; otherwise the configured default filter is used.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber. Safe to call more than once; later
/// calls leave the first subscriber in place.
pub fn init(default_filter: &str) {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let result = fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .try_init();

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
