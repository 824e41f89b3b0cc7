//! Logging initialization.
//!
//! The terminal belongs to the interactive menu, so tracing output goes to
//! `nupkg.log` in the data directory. The filter is read from `NUPKG_LOG`
//! and defaults to `info`.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "nupkg.log";
const LOG_ENV: &str = "NUPKG_LOG";

/// Initialize the global subscriber with a non-blocking file writer.
///
/// The returned [`WorkerGuard`] must be held until the program exits so
/// buffered events are flushed.
pub fn init_tracing(data_dir: &Path) -> color_eyre::Result<WorkerGuard> {
    let log_path = log_path(data_dir);
    fs::create_dir_all(data_dir)
        .wrap_err_with(|| format!("failed to create data directory: {}", data_dir.display()))?;

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .wrap_err_with(|| format!("failed to open log file: {}", log_path.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(log_file);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}
