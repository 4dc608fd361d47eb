//! Tracing subscriber setup.
//!
//! Logs go to stderr, and additionally to a daily rolling file when a log
//! directory is configured. `RUST_LOG` overrides the configured level.

use std::io;

use time::format_description::well_known::Rfc3339;
use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LoggingConfig;

/// Base name of rolling log files.
pub const LOG_FILE_PREFIX: &str = "navsession.log";

/// Filter directive for a CLI verbosity count on top of the configured level.
///
/// 0 keeps the configured level, 1 (`-v`) is debug, 2+ (`-vv`) is trace.
pub fn filter_directive(configured: &str, verbosity: u8) -> String {
    match verbosity {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global tracing subscriber.
///
/// Returns the file writer guard when file logging is enabled; it must be
/// kept alive for buffered log lines to be flushed.
pub fn init_logging(
    config: &LoggingConfig,
    verbosity: u8,
) -> Result<Option<WorkerGuard>, io::Error> {
    let directive = filter_directive(&config.level, verbosity);
    let env_filter = if verbosity > 0 {
        EnvFilter::new(directive)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
    };

    // Local offset can be indeterminate on multi-threaded Unix processes.
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let timer = OffsetTime::new(offset, Rfc3339);

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_timer(timer.clone())
        .with_target(true)
        .compact();

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            std::fs::create_dir_all(directory)?;
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_timer(timer)
                .with_ansi(false)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    Ok(guard)
}
