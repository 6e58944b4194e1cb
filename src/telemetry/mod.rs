//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise the CLI verbosity flags, then the
//! `[logging] level` from the config file.

use crate::cli::Verbosity;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter directive for the given verbosity and configured level
pub fn filter_directive(verbosity: Verbosity, configured_level: &str) -> String {
    match verbosity {
        Verbosity::Quiet => "warn".to_string(),
        Verbosity::Normal => configured_level.to_string(),
        Verbosity::Verbose => "debug".to_string(),
        Verbosity::VeryVerbose => "trace".to_string(),
    }
}

fn build_env_filter(verbosity: Verbosity, configured_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity, configured_level)))
}

/// Install the global subscriber; later calls are ignored
pub fn init_tracing(verbosity: Verbosity, configured_level: &str) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(build_env_filter(verbosity, configured_level))
        .with(fmt_layer)
        .try_init();
}
