//! Logging infrastructure for Simple DVD Creator.
//!
//! This module provides:
//! - Per-job loggers with file + UI callback output
//! - A tail buffer of external tool output for failure diagnosis
//! - Integration with the `tracing` ecosystem
//!
//! # Example
//!
//! ```no_run
//! use sdvd_core::logging::{JobLogger, LogConfig};
//!
//! let logger = JobLogger::new("clip", ".logs", LogConfig::default(), None).unwrap();
//! logger.phase("Transcode");
//! logger.command("ffmpeg -i clip.mp4 -target ntsc-dvd ...");
//! logger.success("Transcode completed");
//! ```

mod job_logger;
mod types;

use std::path::Path;

pub use job_logger::{JobLogger, JobLoggerBuilder};
pub use types::{GuiLogCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize global tracing subscriber for application-wide logging.
///
/// Respects `RUST_LOG`, falling back to `default_level`. Output goes to
/// stderr. Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_filter_str()));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Initialize tracing with stderr output plus a daily rolling file in `logs_dir`.
///
/// The returned guard must be held for the lifetime of the program so the
/// background writer flushes. Falls back to stderr-only logging if the
/// directory cannot be created.
pub fn init_tracing_with_file(default_level: LogLevel, logs_dir: &Path) -> Option<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(logs_dir) {
        init_tracing(default_level);
        tracing::warn!("Cannot create logs folder {}: {}", logs_dir.display(), e);
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(logs_dir, "simple-dvd.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_filter_str()));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init();

    Some(guard)
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
