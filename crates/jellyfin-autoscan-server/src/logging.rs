//! Log output to stdout and an append-only file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;
use tracing::Subscriber;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

use jellyfin_autoscan_core::LogLevel;

/// Errors raised while setting up logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("could not open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not install subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Map the configured verbosity onto a tracing filter.
pub fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
    }
}

/// Build a subscriber that writes every event to stdout and to `file`.
///
/// Each event is formatted in full before a single write, so concurrent
/// requests never interleave within a line.
pub fn subscriber<W>(level: LogLevel, file: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(level_filter(level))
        .with(fmt::layer().with_target(true))
        .with(
            fmt::layer()
                .with_writer(file)
                .with_target(true)
                .with_ansi(false),
        )
}

/// Install the global subscriber, appending to `log_file`.
pub fn init(level: LogLevel, log_file: &Path) -> Result<(), LoggingError> {
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;
    subscriber(level, Mutex::new(file)).try_init()?;
    Ok(())
}
