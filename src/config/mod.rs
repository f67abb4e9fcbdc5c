//! Configuration module.
//!
//! Handles compiler settings loaded from TOML.

mod settings;

pub use settings::{Settings, SettingsError, CONFIG_ENV_VAR};
