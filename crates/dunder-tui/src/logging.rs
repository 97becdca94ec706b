use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Where the rolling log files go. The terminal itself is owned by the UI, so
/// nothing is ever logged to stdout or stderr.
pub fn log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("dunder")
        .join("logs")
}

/// Initialize logging with the given filter (e.g. "info", "dunder_core=debug").
/// Logs are written to daily rotating files in [`log_dir`].
pub fn init_logging(log_level: &str) {
    let filter = match EnvFilter::try_new(log_level) {
        Ok(f) => f,
        Err(_) => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", log_level);
            EnvFilter::new("info")
        }
    };

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_line_number(true)
        .with_writer(log_writer(log_dir()));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}

/// Daily rolling file in `dir`, or a sink that drops everything when the
/// directory cannot be used. Logging never stops the console from starting.
fn log_writer(dir: impl AsRef<Path>) -> BoxMakeWriter {
    let dir = dir.as_ref();
    match RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("dunder.log")
        .build(dir)
    {
        Ok(appender) => BoxMakeWriter::new(appender),
        Err(e) => {
            eprintln!("Could not open log directory {}: {}", dir.display(), e);
            BoxMakeWriter::new(std::io::sink)
        }
    }
}
