//! Explorer settings and their persistence
//!
//! Settings are stored as one JSON object whose keys mirror the option names
//! (`mocFolderPath`, `maxNodeSize`, ...). Missing keys take their defaults and
//! unknown keys are ignored, so older and newer files both load.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_FOLDER: &str = "Atlas/Maps";
pub const NODE_SIZE_RANGE: (u32, u32) = (20, 100);
pub const MINIMUM_CONNECTIONS_RANGE: (u32, u32) = (0, 10);

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// User-facing explorer options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Folder holding the MOCs; missing folders trigger the name heuristic
    pub moc_folder_path: String,
    /// Draw link width by strength
    pub show_connection_strength: bool,
    /// Largest node radius, 20..=100
    pub max_node_size: u32,
    /// `purple` or `blue`; anything else draws purple
    pub color_scheme: String,
    /// Refresh when MOCs change
    pub auto_refresh: bool,
    /// Nodes with fewer connections are hidden, 0..=10
    pub minimum_connections: u32,
    /// Quiet window before a change-triggered refresh
    pub refresh_debounce_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            moc_folder_path: DEFAULT_FOLDER.to_string(),
            show_connection_strength: true,
            max_node_size: 50,
            color_scheme: "purple".to_string(),
            auto_refresh: true,
            minimum_connections: 1,
            refresh_debounce_ms: 1000,
        }
    }
}

fn clamp_setting(key: &str, value: u32, (lo, hi): (u32, u32)) -> u32 {
    let clamped = value.clamp(lo, hi);
    if clamped != value {
        warn!(key, value, clamped, "setting out of range, clamping");
    }
    clamped
}

impl Settings {
    /// Option names accepted by [`Settings::set`]
    pub const KEYS: [&'static str; 7] = [
        "mocFolderPath",
        "showConnectionStrength",
        "maxNodeSize",
        "colorScheme",
        "autoRefresh",
        "minimumConnections",
        "refreshDebounceMs",
    ];

    /// Clamp numeric options into their ranges
    pub fn normalized(mut self) -> Self {
        self.max_node_size = clamp_setting("maxNodeSize", self.max_node_size, NODE_SIZE_RANGE);
        self.minimum_connections = clamp_setting(
            "minimumConnections",
            self.minimum_connections,
            MINIMUM_CONNECTIONS_RANGE,
        );
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.refresh_debounce_ms)
    }

    /// Parse from a JSON blob, merging over defaults
    pub fn from_json(json: &str) -> SettingsResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.normalized())
    }

    /// Set one option from its textual value
    pub fn set(&mut self, key: &str, value: &str) -> SettingsResult<()> {
        let invalid = |reason: &str| SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };
        let value = value.trim();
        match key {
            "mocFolderPath" => self.moc_folder_path = value.trim_end_matches('/').to_string(),
            "showConnectionStrength" => {
                self.show_connection_strength =
                    value.parse().map_err(|_| invalid("expected true or false"))?
            }
            "maxNodeSize" => {
                self.max_node_size = value.parse().map_err(|_| invalid("expected an integer"))?
            }
            "colorScheme" => self.color_scheme = value.to_lowercase(),
            "autoRefresh" => {
                self.auto_refresh = value.parse().map_err(|_| invalid("expected true or false"))?
            }
            "minimumConnections" => {
                self.minimum_connections =
                    value.parse().map_err(|_| invalid("expected an integer"))?
            }
            "refreshDebounceMs" => {
                self.refresh_debounce_ms =
                    value.parse().map_err(|_| invalid("expected milliseconds"))?
            }
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        *self = std::mem::take(self).normalized();
        Ok(())
    }

    pub fn to_json(&self) -> SettingsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Default settings file: `<config dir>/moc-explorer/settings.json`
pub fn default_settings_path() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".config"));
    config_dir.join("moc-explorer").join("settings.json")
}

/// Settings persisted as a JSON file
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`default_settings_path`]
    pub fn at_default_location() -> Self {
        Self::new(default_settings_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings; a missing file yields the defaults
    pub fn load(&self) -> SettingsResult<Settings> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => {
                let settings = Settings::from_json(&json)?;
                debug!(path = %self.path.display(), "loaded settings");
                Ok(settings)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file, using defaults");
                Ok(Settings::default())
            }
            Err(source) => Err(SettingsError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub fn save(&self, settings: &Settings) -> SettingsResult<()> {
        let io_err = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&self.path, settings.to_json()?).map_err(io_err)?;
        debug!(path = %self.path.display(), "saved settings");
        Ok(())
    }
}
