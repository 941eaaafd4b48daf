//! Unread-message indicator.
//!
//! The notifier is polled on a fixed interval by the run loop. Each tick reads
//! the aggregate unread count and switches the host indicator between an idle
//! and an unread icon. Icons are resolved and loaded once when the notifier
//! starts; failures are logged and leave the notifier in a degraded mode where
//! the indicator still learns the unread state but has no icon to show.

use crossterm::{execute, terminal::SetTitle};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const IDLE_ICON: &str = "tray.png";
pub const UNREAD_ICON: &str = "tray_msg.png";

/// Installation icon directory, fixed at build time.
pub const INSTALL_ICONS_DIR: Option<&str> = option_env!("TALKPAD_ICONS_DIR");

#[derive(Debug, Error)]
pub enum TrayError {
    #[error("unable to open icon directory {path}: {source}")]
    IconDir { path: PathBuf, source: io::Error },
    #[error("unable to load icon {path}: {source}")]
    IconLoad { path: PathBuf, source: io::Error },
    #[error("status indicator unavailable: {0}")]
    Indicator(#[from] io::Error),
}

pub trait UnreadSource {
    fn total_unread(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayState {
    NoUnread,
    HasUnread,
}

/// A loaded icon image.
#[derive(Debug, Clone)]
pub struct Icon {
    pub path: PathBuf,
    pub data: Vec<u8>,
}

impl Icon {
    pub fn load(path: &Path) -> Result<Self, TrayError> {
        let data = fs::read(path).map_err(|source| TrayError::IconLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }
}

/// Host surface that displays the current icon. `icon` is `None` when the
/// matching icon could not be loaded.
pub trait StatusIndicator {
    fn set_icon(&mut self, icon: Option<&Icon>, state: TrayState) -> Result<(), TrayError>;

    fn release(&mut self) {}
}

/// Paths of the two icons, if any were found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrayIcons {
    pub idle: Option<PathBuf>,
    pub unread: Option<PathBuf>,
}

pub fn user_icons_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("talkpad")
        .join("icons")
}

/// Resolves icon paths: the install directory first, then any icon of the same
/// name in the user directory replaces it.
pub fn resolve_icons(install_dir: Option<&Path>, user_dir: &Path) -> TrayIcons {
    let mut icons = TrayIcons {
        idle: install_dir.map(|d| d.join(IDLE_ICON)),
        unread: install_dir.map(|d| d.join(UNREAD_ICON)),
    };

    if !user_dir.is_dir() {
        return icons;
    }

    match scan_user_dir(user_dir) {
        Ok(found) => {
            if found.idle.is_some() {
                icons.idle = found.idle;
            }
            if found.unread.is_some() {
                icons.unread = found.unread;
            }
        }
        Err(e) => tracing::warn!("{}", e),
    }
    icons
}

fn scan_user_dir(dir: &Path) -> Result<TrayIcons, TrayError> {
    let entries = fs::read_dir(dir).map_err(|source| TrayError::IconDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut found = TrayIcons::default();
    for entry in entries.flatten() {
        let name = entry.file_name();
        if name == IDLE_ICON {
            found.idle = Some(entry.path());
        } else if name == UNREAD_ICON {
            found.unread = Some(entry.path());
        }
    }
    Ok(found)
}

fn load_icon(path: Option<&Path>, which: &str) -> Option<Icon> {
    let Some(path) = path else {
        tracing::warn!("no {} tray icon found", which);
        return None;
    };
    match Icon::load(path) {
        Ok(icon) => Some(icon),
        Err(e) => {
            tracing::warn!("{}", e);
            None
        }
    }
}

pub struct TrayNotifier<I: StatusIndicator> {
    indicator: Option<I>,
    idle: Option<Icon>,
    unread: Option<Icon>,
    state: TrayState,
    shutting_down: bool,
}

impl<I: StatusIndicator> TrayNotifier<I> {
    pub fn start(indicator: I, icons: &TrayIcons) -> Self {
        let mut tray = Self {
            indicator: Some(indicator),
            idle: load_icon(icons.idle.as_deref(), "idle"),
            unread: load_icon(icons.unread.as_deref(), "unread"),
            state: TrayState::NoUnread,
            shutting_down: false,
        };
        tray.apply();
        tracing::info!(
            idle = ?tray.idle.as_ref().map(|i| &i.path),
            unread = ?tray.unread.as_ref().map(|i| &i.path),
            "tray started"
        );
        tray
    }

    #[cfg(test)]
    pub fn state(&self) -> TrayState {
        self.state
    }

    #[cfg(test)]
    pub fn is_shut_down(&self) -> bool {
        self.shutting_down
    }

    /// One poll. Returns false once shutdown has begun, in which case nothing
    /// is read or changed.
    pub fn tick(&mut self, source: &impl UnreadSource) -> bool {
        if self.shutting_down {
            return false;
        }

        let state = if source.total_unread() > 0 {
            TrayState::HasUnread
        } else {
            TrayState::NoUnread
        };
        if state != self.state {
            self.state = state;
            self.apply();
        }
        true
    }

    fn apply(&mut self) {
        let icon = match self.state {
            TrayState::NoUnread => self.idle.as_ref(),
            TrayState::HasUnread => self.unread.as_ref(),
        };
        let Some(indicator) = self.indicator.as_mut() else {
            return;
        };
        if let Err(e) = indicator.set_icon(icon, self.state) {
            tracing::warn!("{}", e);
        }
    }

    pub fn shutdown(&mut self) {
        if self.shutting_down {
            return;
        }
        self.shutting_down = true;
        if let Some(mut indicator) = self.indicator.take() {
            indicator.release();
        }
        self.idle = None;
        self.unread = None;
        tracing::info!("tray stopped");
    }
}

impl<I: StatusIndicator> Drop for TrayNotifier<I> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Terminal stand-in for a tray: reflects the unread state in the window title.
pub struct TitleIndicator {
    app_name: String,
}

impl TitleIndicator {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl StatusIndicator for TitleIndicator {
    fn set_icon(&mut self, icon: Option<&Icon>, state: TrayState) -> Result<(), TrayError> {
        let title = match state {
            TrayState::NoUnread => self.app_name.clone(),
            TrayState::HasUnread => format!("{} (new messages)", self.app_name),
        };
        match icon {
            Some(icon) => tracing::debug!(
                icon = %icon.path.display(),
                bytes = icon.data.len(),
                %title,
                "indicator update"
            ),
            None => tracing::debug!(%title, "indicator update without icon"),
        }
        execute!(io::stdout(), SetTitle(title))?;
        Ok(())
    }

    fn release(&mut self) {
        let _ = execute!(io::stdout(), SetTitle(""));
    }
}
