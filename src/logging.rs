//! Log output: stdout plus a daily-rotated file.

use crate::error::{DdnsError, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Rotated files kept on disk.
pub const MAX_LOG_FILES: usize = 15;

/// Log file name prefix; files are named `main.YYYY-MM-DD`.
pub const LOG_FILE_PREFIX: &str = "main";

/// `logs/` next to the running executable.
pub fn default_log_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("logs")))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Install the global subscriber.
///
/// The level defaults to `info` and follows `RUST_LOG` when set. With a
/// `log_dir`, events are also written to a daily-rotated file there; the
/// returned guard must be held until exit so buffered lines get flushed.
pub fn init(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = file_appender(dir)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .try_init()
        .map_err(|e| DdnsError::Config(format!("Failed to install logger: {}", e)))?;

    Ok(guard)
}

fn file_appender(dir: &Path) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
        .map_err(|e| {
            DdnsError::Config(format!(
                "Cannot write logs to {}: {}",
                dir.display(),
                e
            ))
        })
}
