use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_DIR: &str = "loupe";
const CONFIG_FILE: &str = "config.toml";
const SESSION_FILE: &str = "session.json";
const MAX_RECENT_WORKSPACES: usize = 10;

/// Color theme selection. `Dark` is the out-of-the-box default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// Application settings persisted as TOML in the user's config directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_true")]
    pub show_minimap: bool,
    #[serde(default = "default_true")]
    pub show_indent_guides: bool,
    #[serde(default = "default_true")]
    pub highlight_active_scope: bool,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub ignored_directories: Vec<String>,
    #[serde(default)]
    recent_workspaces: VecDeque<String>,
}

fn default_true() -> bool {
    true
}

fn default_font_size() -> f32 {
    14.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            show_minimap: true,
            show_indent_guides: true,
            highlight_active_scope: true,
            font_size: default_font_size(),
            ignored_directories: Vec::new(),
            recent_workspaces: VecDeque::new(),
        }
    }
}

impl AppConfig {
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, AppConfigError> {
        let path = config_path(dir);
        let contents = fs::read_to_string(&path)?;
        let mut config: Self = toml::from_str(&contents)?;
        config.normalize();
        Ok(config)
    }

    pub fn load_or_default(dir: impl AsRef<Path>) -> Result<Self, AppConfigError> {
        match Self::load(dir) {
            Ok(config) => Ok(config),
            Err(AppConfigError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }

    pub fn save(&self, dir: impl AsRef<Path>) -> Result<(), AppConfigError> {
        let path = config_path(&dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        Ok(())
    }

    pub fn recent_workspaces(&self) -> impl Iterator<Item = &str> {
        self.recent_workspaces.iter().map(|entry| entry.as_str())
    }

    /// Promotes `workspace` to the front of the recent list. Returns whether
    /// the list changed.
    pub fn record_recent_workspace(&mut self, workspace: impl AsRef<Path>) -> bool {
        let workspace = workspace.as_ref();
        if workspace.as_os_str().is_empty() {
            return false;
        }
        let display = normalize_path(workspace);
        if display.trim().is_empty() {
            return false;
        }

        if let Some(pos) = self
            .recent_workspaces
            .iter()
            .position(|entry| entry == &display)
        {
            if pos == 0 {
                return false;
            }
            self.recent_workspaces.remove(pos);
        }

        self.recent_workspaces.push_front(display);
        while self.recent_workspaces.len() > MAX_RECENT_WORKSPACES {
            self.recent_workspaces.pop_back();
        }
        true
    }

    fn normalize(&mut self) {
        self.ignored_directories
            .iter_mut()
            .for_each(|entry| *entry = entry.trim().to_string());
        self.ignored_directories
            .retain(|entry| !entry.is_empty());
        if !self.font_size.is_finite() || self.font_size < 6.0 {
            self.font_size = default_font_size();
        }

        let mut deduped = VecDeque::new();
        for entry in self.recent_workspaces.drain(..) {
            if !entry.trim().is_empty() && !deduped.contains(&entry) {
                deduped.push_back(entry);
            }
        }
        self.recent_workspaces = deduped;
    }
}

/// The set of open documents persisted between runs, stored as JSON next to
/// the config file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub workspace_root: Option<String>,
    #[serde(default)]
    pub open_files: Vec<String>,
    #[serde(default)]
    pub active_index: usize,
}

impl SessionSnapshot {
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, SessionSnapshotError> {
        let path = session_path(dir);
        let contents = fs::read_to_string(&path)?;
        let mut snapshot: Self = serde_json::from_str(&contents)?;
        snapshot.normalize();
        Ok(snapshot)
    }

    pub fn load_or_default(dir: impl AsRef<Path>) -> Result<Self, SessionSnapshotError> {
        match Self::load(dir) {
            Ok(snapshot) => Ok(snapshot),
            Err(SessionSnapshotError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }

    pub fn save(&self, dir: impl AsRef<Path>) -> Result<(), SessionSnapshotError> {
        let path = session_path(&dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        Ok(())
    }

    fn normalize(&mut self) {
        self.open_files.retain(|entry| !entry.trim().is_empty());
        if self.active_index >= self.open_files.len() {
            self.active_index = self.open_files.len().saturating_sub(1);
        }
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Error)]
pub enum SessionSnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse session snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Per-user configuration directory, `~/.config/loupe` on Linux.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR))
}

fn config_path(dir: impl AsRef<Path>) -> PathBuf {
    dir.as_ref().join(CONFIG_FILE)
}

fn session_path(dir: impl AsRef<Path>) -> PathBuf {
    dir.as_ref().join(SESSION_FILE)
}

fn normalize_path(path: &Path) -> String {
    let display = path.to_string_lossy().to_string();
    if cfg!(windows) {
        display.replace('\\', "/")
    } else {
        display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::default();
        assert_eq!(config.theme, Theme::Dark);
        assert!(config.show_minimap);
        assert!(config.show_indent_guides);
        assert_eq!(config.recent_workspaces().count(), 0);
    }

    #[test]
    fn theme_toggles_both_ways() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[test]
    fn record_recent_workspace_promotes_and_limits() {
        let mut config = AppConfig::default();
        for idx in 0..12 {
            config.record_recent_workspace(format!("/projects/ws{}", idx));
        }

        assert!(config.recent_workspaces().count() <= MAX_RECENT_WORKSPACES);
        assert_eq!(config.recent_workspaces().next().unwrap(), "/projects/ws11");

        assert!(config.record_recent_workspace("/projects/ws5"));
        assert_eq!(config.recent_workspaces().next().unwrap(), "/projects/ws5");
        assert!(!config.record_recent_workspace("/projects/ws5"));
    }

    #[test]
    fn config_round_trip() {
        let dir = tempdir().unwrap();

        let mut config = AppConfig::default();
        config.theme = Theme::Light;
        config.show_minimap = false;
        config.ignored_directories = vec!["build".into()];
        config.record_recent_workspace("/home/me/project");
        config.save(dir.path()).unwrap();

        let loaded = AppConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.theme, Theme::Light);
        assert!(!loaded.show_minimap);
        assert_eq!(loaded.ignored_directories, vec!["build".to_string()]);
        assert_eq!(
            loaded.recent_workspaces().next().unwrap(),
            "/home/me/project"
        );
    }

    #[test]
    fn missing_config_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn session_round_trip_clamps_active_index() {
        let dir = tempdir().unwrap();

        let snapshot = SessionSnapshot {
            workspace_root: Some("/home/me/project".into()),
            open_files: vec!["src/main.rs".into(), "src/lib.rs".into()],
            active_index: 7,
        };
        snapshot.save(dir.path()).unwrap();

        let loaded = SessionSnapshot::load(dir.path()).unwrap();
        assert_eq!(loaded.open_files.len(), 2);
        assert_eq!(loaded.active_index, 1);
        assert_eq!(loaded.workspace_root, Some("/home/me/project".into()));
    }
}
