//! Application logging functionality
//!
//! Logs go to stderr through `tracing-subscriber`. With `--log-file` a
//! second, plain-text layer is written to the dated file under the config
//! directory.

use crate::core::config_file::ConfigFile;
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    ConfigFile::config_dir().join("logs")
}

/// Name of today's log file
pub fn current_log_file_name() -> String {
    let timestamp = chrono::Local::now().format("%Y-%m-%d");
    format!("numderline-{timestamp}.log")
}

/// Get the path to the current log file
pub fn current_log_file() -> PathBuf {
    logs_dir().join(current_log_file_name())
}

/// Filter from `RUST_LOG`, else from the number of `-v` flags
fn filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        EnvFilter::new(format!("numderline={level},warn"))
    })
}

/// Install the global subscriber.
///
/// The returned guard flushes the log file when dropped, so keep it alive
/// for the whole run.
pub fn init(verbosity: u8, log_file: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter(verbosity));

    if !log_file {
        tracing_subscriber::registry().with(stderr_layer).try_init()?;
        return Ok(None);
    }

    let dir = logs_dir();
    fs::create_dir_all(&dir)?;
    let appender = tracing_appender::rolling::never(&dir, current_log_file_name());
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(filter(verbosity));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;
    tracing::debug!(path = %dir.display(), "logging to file");
    Ok(Some(guard))
}
