//! The `Config` struct plus its YAML persistence and path helpers.
//!
//! Covers:
//! - `load` / `save` (YAML file I/O with atomic write)
//! - XDG-style path helpers (`config_dir`, `config_path`, `session_path`)
//! - Semantic validation of the tuning values

use crate::error::ConfigError;
use crate::types::LogLevel;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings consumed by the browser state core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Closing an essential tab resets it to its initial URL instead of removing it
    #[serde(default = "crate::defaults::essential_close_resets")]
    pub essential_close_resets: bool,

    /// "Back" on a tab without history closes the tab
    #[serde(default = "crate::defaults::close_tab_on_back_no_history")]
    pub close_tab_on_back_no_history: bool,

    /// Debounce interval for session saves, in milliseconds
    #[serde(default = "crate::defaults::session_save_debounce_ms")]
    pub session_save_debounce_ms: u64,

    /// Maximum number of recently closed tabs kept for restore
    #[serde(default = "crate::defaults::recently_closed_max_entries")]
    pub recently_closed_max_entries: usize,

    /// Restore the previous session on startup
    #[serde(default = "crate::defaults::restore_session_on_startup")]
    pub restore_session_on_startup: bool,

    /// Override for the session snapshot location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,

    /// URL opened by newly created blank tabs
    #[serde(default = "crate::defaults::new_tab_url")]
    pub new_tab_url: String,

    /// Verbosity of the debug log file
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            essential_close_resets: crate::defaults::essential_close_resets(),
            close_tab_on_back_no_history: crate::defaults::close_tab_on_back_no_history(),
            session_save_debounce_ms: crate::defaults::session_save_debounce_ms(),
            recently_closed_max_entries: crate::defaults::recently_closed_max_entries(),
            restore_session_on_startup: crate::defaults::restore_session_on_startup(),
            session_file: None,
            new_tab_url: crate::defaults::new_tab_url(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            return Self::load_from(&config_path);
        }

        log::info!(
            "Config file not found, creating default at {:?}",
            config_path
        );
        let config = Self::default();
        if let Err(e) = config.save() {
            log::error!("Failed to save default config: {}", e);
            return Err(e);
        }
        Ok(config)
    }

    /// Load configuration from a specific file.
    ///
    /// A missing or empty file yields the defaults; invalid YAML or values
    /// that fail validation are errors.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(ConfigError::io(path))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config =
            serde_yaml_ng::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::io(parent))?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(ConfigError::Serialize)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(ConfigError::io(&temp_path))?;
        fs::rename(&temp_path, path).map_err(ConfigError::io(path))?;

        Ok(())
    }

    /// Check values that deserialize fine but make no sense at runtime.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.session_save_debounce_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "session_save_debounce_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.new_tab_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "new_tab_url",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Debounce interval as a `Duration`
    pub fn session_save_debounce(&self) -> Duration {
        Duration::from_millis(self.session_save_debounce_ms.max(1))
    }

    /// Recently-closed capacity, clamped to `1..=RECENTLY_CLOSED_LIMIT`
    pub fn recently_closed_capacity(&self) -> usize {
        self.recently_closed_max_entries
            .clamp(1, crate::RECENTLY_CLOSED_LIMIT)
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("tabshell")
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("tabshell")
            } else {
                PathBuf::from(".")
            }
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Location of the session snapshot, honouring `session_file`
    pub fn session_path(&self) -> PathBuf {
        match &self.session_file {
            Some(path) => path.clone(),
            None => Self::config_dir().join("session.json"),
        }
    }
}
