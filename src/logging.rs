//! Diagnostic logging for the command line front end.
//!
//! Library code only emits `tracing` events; installing a subscriber is left to the binary.
//! Logs go to stderr so they never mix with the saved-file message on stdout.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Maps repeated `-v` flags to a filter directive.
pub fn directive_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Installs the global subscriber.
///
/// Without `-v`, `RUST_LOG` decides and defaults to `warn`. Any `-v` overrides `RUST_LOG`.
pub fn init(verbosity: u8) -> Result<()> {
    let filter = if verbosity > 0 {
        EnvFilter::new(directive_for(verbosity))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive_for(0)))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}
