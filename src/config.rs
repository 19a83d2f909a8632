//! Configuration
//!
//! Configuration for the delay scheduler, layered the usual way: built-in
//! defaults, then an optional TOML file, then environment variables on top.
//!
//! # Environment Variables
//!
//! - `DELAY_DEFAULT_UNIT`: unit assumed when none is given (`ms`, `s`, `m`, `h`)
//! - `DELAY_MAX_PENDING`: cap on tasks waiting out their delay (0 = unlimited)
//!
//! # File Format
//!
//! ```toml
//! default_unit = "seconds"
//! max_pending = 256
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::helper::TimeUnit;

/// Configuration for a [`crate::DelayHelper`]
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    /// Unit assumed when a delay amount has no explicit unit
    pub default_unit: TimeUnit,
    /// Maximum tasks allowed to wait out their delay at once (0 = unlimited)
    pub max_pending: usize,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            default_unit: TimeUnit::Seconds,
            max_pending: 0,
        }
    }
}

impl DelayConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default time unit
    #[must_use]
    pub fn with_default_unit(mut self, unit: TimeUnit) -> Self {
        self.default_unit = unit;
        self
    }

    /// Set the pending-task cap (0 = unlimited)
    #[must_use]
    pub fn with_max_pending(mut self, max: usize) -> Self {
        self.max_pending = max;
        self
    }

    /// Create configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().env_overrides()
    }

    /// Apply environment variable overrides on top of `self`
    #[must_use]
    pub fn env_overrides(mut self) -> Self {
        if let Ok(unit) = std::env::var("DELAY_DEFAULT_UNIT") {
            self.default_unit = TimeUnit::parse(&unit);
        }
        if let Some(max) = std::env::var("DELAY_MAX_PENDING")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.max_pending = max;
        }
        self
    }
}

/// Errors from configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Default location of the config file
///
/// `$XDG_CONFIG_HOME/delay-helper/config.toml` (or the platform equivalent).
/// `None` when the platform has no config directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("delay-helper").join("config.toml"))
}

/// Load configuration from an explicit TOML file
///
/// # Errors
///
/// [`ConfigError::Io`] when the file cannot be read, [`ConfigError::Parse`]
/// when it is not valid TOML for this schema.
pub fn load_config_from_path(path: &Path) -> Result<DelayConfig, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&text)?)
}

/// Load configuration from the default file location, then the environment
///
/// A missing or unreadable file is not an error; it just means defaults.
#[must_use]
pub fn load_config() -> DelayConfig {
    let base = default_config_path()
        .filter(|path| path.exists())
        .and_then(|path| match load_config_from_path(&path) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "Ignoring unreadable config file"
                );
                None
            }
        })
        .unwrap_or_default();

    base.env_overrides()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = DelayConfig::default();
        assert_eq!(config.default_unit, TimeUnit::Seconds);
        assert_eq!(config.max_pending, 0);
    }

    #[test]
    fn test_builder_setters() {
        let config = DelayConfig::new()
            .with_default_unit(TimeUnit::Minutes)
            .with_max_pending(8);
        assert_eq!(config.default_unit, TimeUnit::Minutes);
        assert_eq!(config.max_pending, 8);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "default_unit = \"millis\"\nmax_pending = 64").unwrap();

        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.default_unit, TimeUnit::Millis);
        assert_eq!(config.max_pending, 64);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_pending = 16").unwrap();

        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.default_unit, TimeUnit::Seconds);
        assert_eq!(config.max_pending, 16);
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_pending = \"lots\"").unwrap();

        let result = load_config_from_path(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config_from_path(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("DELAY_DEFAULT_UNIT", "minutes");
        std::env::set_var("DELAY_MAX_PENDING", "12");

        let config = DelayConfig::from_env();
        assert_eq!(config.default_unit, TimeUnit::Minutes);
        assert_eq!(config.max_pending, 12);

        std::env::remove_var("DELAY_DEFAULT_UNIT");
        std::env::remove_var("DELAY_MAX_PENDING");
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = DelayConfig::new()
            .with_default_unit(TimeUnit::Hours)
            .with_max_pending(3);

        let text = toml::to_string(&config).unwrap();
        let parsed: DelayConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.default_unit, TimeUnit::Hours);
        assert_eq!(parsed.max_pending, 3);
    }
}
