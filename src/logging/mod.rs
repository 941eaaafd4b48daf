//! Diagnostic logging.
//!
//! The terminal is owned by the UI, so tracing output goes to a log file
//! (default: `~/.local/share/talkpad/talkpad.log`). `RUST_LOG` takes
//! precedence over the configured level.

use crate::config::model::LoggingConfig;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub fn init(config: &LoggingConfig) -> Result<()> {
    if let Some(parent) = config.file.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .with_context(|| format!("Failed to open log file {}", config.file.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("talkpad={}", config.level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;
    Ok(())
}
