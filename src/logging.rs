//! Tracing setup. Logs go to stderr so the report on stdout stays clean.

use std::error::Error;

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Filter built from the `-v` count alone; the environment is not consulted.
pub fn filter_for(verbosity: u8) -> EnvFilter {
    EnvFilter::new(level_for(verbosity))
}

/// Install the global subscriber.
pub fn init_logging(verbosity: u8) -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbosity))
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .compact()
        .try_init()
}
