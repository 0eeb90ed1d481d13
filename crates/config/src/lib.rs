// Configuration loading
// Everything lives under <platform config dir>/gradebook/

pub mod ignore_list;
pub mod settings;

use std::fmt;
use std::path::PathBuf;

pub use ignore_list::{IgnoreFilter, IgnoreList, MatchKind};
pub use settings::Settings;

/// Directory holding the settings file and the default ignore-list.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gradebook")
}

#[derive(Debug)]
pub enum ConfigError {
    /// File exists but could not be read.
    Io { path: PathBuf, message: String },
    /// TOML parse / deserialization error.
    Parse { path: PathBuf, message: String },
    /// A value parsed but is out of range.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Parse { path, message } => write!(f, "invalid config {}: {message}", path.display()),
            Self::Validation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
