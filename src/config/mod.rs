//! Configuration management.
//!
//! Settings come from an optional TOML file and `FUNNELBACK_*` environment
//! variables (environment wins). They are checked once by
//! [`Settings::validate`]; a gateway is only ever built from the resulting
//! [`FunnelbackConfig`].

mod file_config;

pub use file_config::{ConfigFile, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "FUNNELBACK";

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Raw, unvalidated settings as read from file and environment
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the Funnelback instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Collection to query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Settings {
    /// Check that every required setting is present and usable.
    ///
    /// Empty strings count as missing. Fields are checked in the order url,
    /// username, password, collection and the first gap is reported.
    pub fn validate(self) -> Result<FunnelbackConfig, ConfigError> {
        let url = required(self.url, "url")?;
        let username = required(self.username, "username")?;
        let password = required(self.password, "password")?;
        let collection = required(self.collection, "collection")?;

        let base_url = Url::parse(&url).map_err(|e| ConfigError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        Ok(FunnelbackConfig {
            base_url,
            username,
            password,
            collection,
            timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            user_agent: self.user_agent.filter(|ua| !ua.is_empty()),
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(field)),
    }
}

/// Validated connection settings for the search API
#[derive(Clone, PartialEq, Eq)]
pub struct FunnelbackConfig {
    pub base_url: Url,
    pub username: String,
    pub password: String,
    pub collection: String,
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl FunnelbackConfig {
    /// Build a config directly, validating like [`Settings::validate`]
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        collection: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Settings {
            url: Some(url.into()),
            username: Some(username.into()),
            password: Some(password.into()),
            collection: Some(collection.into()),
            ..Default::default()
        }
        .validate()
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read and validate settings from the environment only
    pub fn from_env() -> Result<Self, ConfigError> {
        load_settings(None)?.validate()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("collection", &self.collection)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl fmt::Debug for FunnelbackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunnelbackConfig")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("collection", &self.collection)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required setting is absent or empty
    #[error("Required setting '{0}' is not supplied (set FUNNELBACK_{upper} or add it to the config file)", upper = .0.to_uppercase())]
    Missing(&'static str),

    /// The base URL could not be parsed
    #[error("Invalid search API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The file or environment could not be read
    #[error("Failed to load settings: {0}")]
    Load(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Load(err.to_string())
    }
}

/// Load settings from `path` (if any) overlaid with `FUNNELBACK_*` variables
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    build_settings(path, config::Environment::with_prefix(ENV_PREFIX))
}

fn build_settings(
    path: Option<&Path>,
    environment: config::Environment,
) -> Result<Settings, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder.add_source(environment).build()?;
    Ok(settings.try_deserialize()?)
}

/// Default location of the config file (`<config dir>/funnelback-search/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("funnelback-search").join("config.toml"))
}

/// Find an existing config file in the default location
pub fn find_config_file() -> Option<PathBuf> {
    default_config_path().filter(|path| path.is_file())
}
