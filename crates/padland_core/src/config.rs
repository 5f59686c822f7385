//! Pad list configuration.
//!
//! # Responsibility
//! - Load pad store, logging and projection settings from TOML.
//! - Provide defaults for every field so an empty file is valid.
//!
//! # Invariants
//! - `PADLAND_DB_PATH` (when set and non-blank) wins over `db_path`.

use crate::projection::{MembershipMode, UNCLASSIFIED_LABEL};
use crate::screen::ScreenSettings;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable overriding the pad store location.
pub const DB_PATH_ENV: &str = "PADLAND_DB_PATH";
const DEFAULT_DB_FILE_NAME: &str = "padland.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid pad list config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadListConfig {
    /// Pad store file. Defaults to a file in the system temp directory.
    pub db_path: Option<PathBuf>,
    /// One of `trace|debug|info|warn|error`; build-mode default when unset.
    pub log_level: Option<String>,
    /// Absolute directory for rolling log files. Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub unclassified_label: String,
    pub membership: MembershipMode,
}

impl Default for PadListConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: None,
            log_dir: None,
            unclassified_label: UNCLASSIFIED_LABEL.to_string(),
            membership: MembershipMode::default(),
        }
    }
}

impl PadListConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(ConfigError::Parse)
    }

    /// Reads a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Effective pad store path after the environment override.
    pub fn resolve_db_path(&self) -> PathBuf {
        if let Ok(raw) = std::env::var(DB_PATH_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }
        self.db_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
    }

    pub fn screen_settings(&self) -> ScreenSettings {
        ScreenSettings {
            membership: self.membership,
            unclassified_label: self.unclassified_label.clone(),
        }
    }
}
