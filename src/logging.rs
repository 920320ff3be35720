//! Log file setup
//!
//! The terminal belongs to the UI, so tracing output goes to a file.
//! Verbosity comes from `CITVIEW_LOG` (same syntax as `RUST_LOG`).

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::config::project_dirs;

const LOG_ENV: &str = "CITVIEW_LOG";

/// Install the global subscriber, returning the log file in use
///
/// Without an explicit path and without a platform data directory, logging
/// stays disabled.
pub fn init(log_file: Option<&Path>) -> Result<Option<PathBuf>> {
    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None => match project_dirs() {
            Some(dirs) => dirs.data_local_dir().join("citview.log"),
            None => return Ok(None),
        },
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(Some(path))
}
