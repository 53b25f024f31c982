//! Configuration file support for funnelback-search.
//!
//! This module provides TOML configuration file parsing and the template
//! written by `funnelback-search init`. Any key can be overridden by the
//! matching `FUNNELBACK_*` environment variable.
//!
//! # Configuration File Format
//!
//! ```toml
//! url = "https://search.example.govt.nz"
//! username = "api-user"
//! password = "api-password"
//! collection = "example-web"
//! timeout_secs = 30
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{Settings, DEFAULT_TIMEOUT_SECS};

/// Configuration file structure
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Connection settings (top-level keys)
    #[serde(flatten)]
    pub settings: Settings,

    /// Logging section
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }

        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }

    /// Placeholder configuration for `init`
    pub fn template() -> Self {
        Self {
            settings: Settings {
                url: Some("https://search.example.com".to_string()),
                username: Some("api-user".to_string()),
                password: Some("change-me".to_string()),
                collection: Some("example-web".to_string()),
                timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
                user_agent: None,
            },
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_config_file_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let toml_content = r#"
url = "https://search.example.com"
username = "user"
password = "secret"
collection = "example-web"
timeout_secs = 10

[logging]
level = "debug"
"#;
        std::fs::write(&path, toml_content).unwrap();

        let config = ConfigFile::load(&path).unwrap();

        assert_eq!(
            config.settings.url.as_deref(),
            Some("https://search.example.com")
        );
        assert_eq!(config.settings.collection.as_deref(), Some("example-web"));
        assert_eq!(config.settings.timeout_secs, Some(10));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_template_round_trips_and_validates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        ConfigFile::template().save(&path).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded.logging.level, "info");
        assert_eq!(loaded.settings.user_agent, None);
        assert!(loaded.settings.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fails_validation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "url = \"https://search.example.com\"\n").unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert!(loaded.settings.validate().is_err());
    }

    #[test]
    fn test_config_file_nonexistent() {
        let path = PathBuf::from("/nonexistent/config.toml");
        let result = ConfigFile::load(&path);
        assert!(matches!(result, Err(ConfigFileError::Io(_))));
    }

    #[test]
    fn test_config_file_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");

        std::fs::write(&path, "invalid = toml = content").unwrap();

        let result = ConfigFile::load(&path);
        assert!(matches!(result, Err(ConfigFileError::Parse(_))));
    }
}
