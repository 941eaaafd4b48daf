//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a sensible default so the application works out of the box.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub tray: TrayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// UI appearance and behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show a clock in the title bar.
    #[serde(default = "default_true")]
    pub clock: bool,
    /// Ring the terminal bell when a background window receives a message.
    #[serde(default)]
    pub bell_on_message: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            clock: true,
            bell_on_message: false,
        }
    }
}

/// Unread indicator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrayConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_tray_interval")]
    pub interval_ms: u64,
    /// Overrides the per-user icon directory.
    #[serde(default)]
    pub icons_dir: Option<PathBuf>,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: default_tray_interval(),
            icons_dir: None,
        }
    }
}

/// Diagnostic log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: default_log_file(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_tray_interval() -> u64 {
    5000
}
fn default_level() -> String {
    "info".to_string()
}
fn default_log_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("talkpad")
        .join("talkpad.log")
}
