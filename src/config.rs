// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::{DEFAULT_SENSITIVITY, SENSITIVITY_MAX, SENSITIVITY_MIN};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Application ID used for the config and cache directories
pub const APP_ID: &str = "cloak-control";

/// Current on-disk config version
pub const CONFIG_VERSION: u64 = 1;

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// On-disk format version
    pub version: u64,
    /// Base URL of the effects server
    pub server_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Initial color sampling sensitivity
    pub default_sensitivity: u8,
    /// Directory of the last uploaded background image
    pub last_upload_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            server_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 10,
            default_sensitivity: DEFAULT_SENSITIVITY,
            last_upload_dir: None,
        }
    }
}

impl Config {
    /// `<config_dir>/cloak-control/config.json`
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_ID).join(CONFIG_FILE))
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            warn!("No config directory available, using defaults");
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file yet");
                return Ok(Self::default());
            }
            Err(e) => return Err(AppError::Config(e.to_string())),
        };
        let mut config: Config =
            serde_json::from_str(&text).map_err(|e| AppError::Config(e.to_string()))?;
        if config.version != CONFIG_VERSION {
            info!(
                found = config.version,
                current = CONFIG_VERSION,
                "Migrating config version"
            );
            config.version = CONFIG_VERSION;
        }
        Ok(config.sanitized())
    }

    /// Write to the default location
    pub fn save(&self) -> AppResult<()> {
        let path = Self::path().ok_or_else(|| AppError::Config("no config directory".into()))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text =
            serde_json::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, text)?;
        debug!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Record the last upload directory in the stored config
    ///
    /// Only that field changes; overrides applied to the in-memory config
    /// for this run are not persisted.
    pub fn remember_upload_dir(dir: PathBuf) -> AppResult<()> {
        let path = Self::path().ok_or_else(|| AppError::Config("no config directory".into()))?;
        Self::remember_upload_dir_at(&path, dir)
    }

    pub fn remember_upload_dir_at(path: &Path, dir: PathBuf) -> AppResult<()> {
        let mut stored = Self::load_from(path)?;
        stored.last_upload_dir = Some(dir);
        stored.save_to(path)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Clamp values that came from disk into their valid ranges
    fn sanitized(mut self) -> Self {
        self.default_sensitivity = self
            .default_sensitivity
            .clamp(SENSITIVITY_MIN, SENSITIVITY_MAX);
        if self.server_url.trim().is_empty() {
            self.server_url = Self::default().server_url;
        }
        self
    }
}
