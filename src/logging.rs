//! Tracing subscriber setup for the `arw` binary.
//!
//! Logs go to stderr so command summaries on stdout stay parseable.
//! `RUST_LOG` takes precedence over `logging.level` from the config.

use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber. Call once, before any events.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
