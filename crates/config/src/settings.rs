// Analyser settings
// Loaded from ~/.config/gradebook/settings.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Ceiling for every locator scan. Real exports stay far below this.
pub const DEFAULT_SCAN_LIMIT: u32 = 1024;
/// Largest accepted `scan_limit`.
pub const MAX_SCAN_LIMIT: u32 = 65_536;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ignore-list location; `None` uses the file next to this one
    pub ignore_list: Option<PathBuf>,

    /// Maximum cells a locator inspects before giving up
    pub scan_limit: u32,

    /// Read per-subject marks (off: pupils carry only average + attendance)
    pub fetch_subjects: bool,

    /// Log filter when neither -v nor RUST_LOG is given
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ignore_list: None,
            scan_limit: DEFAULT_SCAN_LIMIT,
            fetch_subjects: true,
            log_level: "warn".to_string(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        crate::config_dir().join("settings.toml")
    }

    /// Load from the default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`, falling back to defaults when the file is absent
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let settings: Settings = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan_limit == 0 {
            return Err(ConfigError::Validation("scan_limit must be at least 1".into()));
        }
        if self.scan_limit > MAX_SCAN_LIMIT {
            return Err(ConfigError::Validation(format!(
                "scan_limit must be at most {MAX_SCAN_LIMIT}, got {}",
                self.scan_limit
            )));
        }
        Ok(())
    }

    /// Effective ignore-list path
    pub fn ignore_list_path(&self) -> PathBuf {
        self.ignore_list
            .clone()
            .unwrap_or_else(crate::IgnoreList::default_path)
    }
}
