//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies.

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. Call once, before any events.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
