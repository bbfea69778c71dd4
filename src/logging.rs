//! Logging setup for the prepgate binary.
//!
//! Logs go to stderr, keeping stdout for the printed report, and optionally
//! to a daily rotating file in the app data directory. The library only emits
//! `tracing` events; installing a subscriber is the binary's job.
//!
//! ```no_run
//! use prepgate::logging::{self, LogOptions};
//!
//! logging::init(&LogOptions::default()).expect("Failed to initialize logging");
//! tracing::info!("Pipeline started");
//! ```

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// How the subscriber is assembled.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Filter used when `RUST_LOG` is unset, e.g. `"info"` or `"prepgate=debug"`.
    pub default_filter: Option<String>,
    /// Also write logs to rotating files.
    pub to_file: bool,
    /// Directory for log files; defaults to [`get_log_dir`].
    pub log_dir: Option<PathBuf>,
}

/// Gets the log directory path based on platform conventions
///
/// Returns:
/// - Windows: `%APPDATA%/prepgate/logs`
/// - macOS: `~/Library/Application Support/prepgate/logs`
/// - Linux: `~/.local/share/prepgate/logs`
///
/// # Errors
///
/// Returns an error if the data directory is unknown or cannot be created.
pub fn get_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    let log_dir = base_dir.join("prepgate").join("logs");
    ensure_dir(&log_dir)?;
    Ok(log_dir)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    }
    Ok(())
}

/// Initializes the global subscriber.
///
/// # Errors
///
/// Returns error if the filter is invalid or the file appender cannot be created
pub fn init(options: &LogOptions) -> Result<()> {
    let default_filter = options.default_filter.as_deref().unwrap_or("info");
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .context("Failed to create env filter")?;

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    let log_dir = if options.to_file {
        Some(match &options.log_dir {
            Some(dir) => {
                ensure_dir(dir)?;
                dir.clone()
            }
            None => get_log_dir()?,
        })
    } else {
        None
    };

    let file_layer = if let Some(log_dir) = &log_dir {
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .max_log_files(10)
            .filename_prefix("prepgate")
            .filename_suffix("log")
            .build(log_dir)
            .context("Failed to create file appender")?;

        Some(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_file(true)
                .with_ansi(false)
                .with_writer(appender)
                .boxed(),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(log_dir) = &log_dir {
        tracing::info!("Writing logs to {}", current_log_file(log_dir).display());
    }
    Ok(())
}

/// Path of the file the daily appender is writing to today.
///
/// The appender rolls over at midnight UTC, so the date is taken in UTC.
pub fn current_log_file(log_dir: &Path) -> PathBuf {
    let today = chrono::Utc::now().format("%Y-%m-%d");
    log_dir.join(format!("prepgate.{today}.log"))
}
