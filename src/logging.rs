//! Logging setup.
//!
//! Events go to two places: stdout, filtered by the configured level (or
//! `RUST_LOG`), and a per-run file `server_<timestamp>.log` under the log
//! directory, which always records debug detail such as request inputs
//! and results.

use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Name of the log file for a server started at `started`
pub fn log_file_name(started: DateTime<Local>) -> String {
    format!("server_{}.log", started.format("%Y-%m-%d_%H-%M-%S"))
}

/// Create the log directory if needed and open a fresh log file in it.
pub fn open_log_file(dir: &Path, started: DateTime<Local>) -> std::io::Result<(File, PathBuf)> {
    fs::create_dir_all(dir)?;
    let path = dir.join(log_file_name(started));
    let file = File::options().create(true).append(true).open(&path)?;
    Ok((file, path))
}

/// Install the global subscriber. Returns the log file path, if any.
pub fn init(level: &str, log_dir: Option<&Path>) -> std::io::Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = fmt::layer().with_target(false).with_filter(filter);

    let (file_layer, path) = match log_dir {
        Some(dir) => {
            let (file, path) = open_log_file(dir, Local::now())?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(LevelFilter::DEBUG);
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(path)
}
