pub mod model;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub use model::AppConfig;

/// `TALKPAD_CONFIG` overrides the default `<config_dir>/talkpad/config.toml`.
fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("TALKPAD_CONFIG") {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("talkpad")
        .join("config.toml")
}

pub fn load_config() -> Result<AppConfig> {
    load_config_from(&config_path())
}

/// A missing file yields the defaults; an unreadable or malformed one is an error.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}
