//! TOML-based configuration for the document compiler.
//!
//! Example configuration:
//! ```toml
//! dialect = "sqlite"
//! strict_fields = true   # unknown selected fields are an error
//! log_sql = true         # emit compiled SQL at debug level (off by default)
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::sql::dialect::Dialect;

/// Environment variable naming a config file, checked first by [`Settings::load`].
pub const CONFIG_ENV_VAR: &str = "JSONAPI_SQL_CONFIG";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Dialect for callers that compile without a database session.
    pub dialect: Dialect,

    /// Reject selected field names that are neither columns nor relationships.
    /// When false they are skipped with a warning.
    pub strict_fields: bool,

    /// Log each compiled statement at debug level.
    pub log_sql: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            strict_fields: true,
            log_sql: false,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a TOML file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `JSONAPI_SQL_CONFIG`
    /// 2. `./jsonapi-sql.toml`
    ///
    /// Falls back to defaults when neither exists.
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_path(&path);
        }

        let local_config = PathBuf::from("jsonapi-sql.toml");
        if local_config.exists() {
            return Self::from_path(&local_config);
        }

        Ok(Settings::default())
    }
}
