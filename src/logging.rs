//! Opt-in tracing initialization for hosts without their own subscriber

use std::io;

use time::macros::format_description;
use time::UtcOffset;
use tracing_subscriber::{self, fmt, prelude::*};

/// Initialize a stderr logger with UTC timestamps.
///
/// # Arguments
/// * `no_color` - Disable ANSI colors in stderr output
/// * `log_level` - Override log level (otherwise uses RUST_LOG or defaults to "info")
///
/// Embedding hosts that install their own `tracing` subscriber should skip
/// this; calling it after a subscriber is already set is harmless.
pub fn init_logger(no_color: bool, log_level: Option<&str>) -> io::Result<()> {
    let timer = fmt::time::OffsetTime::new(
        UtcOffset::UTC,
        format_description!("[[[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z]"),
    );

    // Explicit level wins, then RUST_LOG, then "info"
    let stderr_filter = match log_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(timer)
        .with_ansi(!no_color)
        .with_filter(stderr_filter);

    let result = tracing_subscriber::registry().with(stderr_layer).try_init();

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            // Ignore errors due to the subscriber or logger already being set
            if e.to_string().contains("already been set")
                || e.to_string().contains("SetLoggerError")
            {
                Ok(())
            } else {
                Err(io::Error::new(io::ErrorKind::Other, e))
            }
        }
    }
}
