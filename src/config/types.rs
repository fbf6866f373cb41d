use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{AppError, AppResult};

/// Default Ionic Push notifications endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.ionic.io/push/notifications";

/// Environment variable overriding `services.ionicpush.key`
pub const API_KEY_ENV: &str = "IONIC_PUSH_KEY";

/// Main configuration structure
///
/// The file layout mirrors the host key path `services.ionicpush.key`, so a
/// config file reads:
///
/// ```toml
/// [services.ionicpush]
/// key = "..."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub services: ServicesConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub ionicpush: IonicPushConfig,
}

/// Settings for the Ionic Push channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IonicPushConfig {
    /// API bearer token. Sending fails with `InvalidConfiguration` without it.
    pub key: Option<String>,
    pub endpoint: String,
    pub timeout_secs: Option<u64>,
    /// Security profile used by the CLI when `--profile` is not given
    pub default_profile: Option<String>,
}

impl Default for IonicPushConfig {
    fn default() -> Self {
        Self {
            key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: Some(30),
            default_profile: None,
        }
    }
}

impl IonicPushConfig {
    /// Config with only the API key set
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Default::default()
        }
    }

    /// The API key, if present and not blank
    pub fn api_key(&self) -> Option<&str> {
        self.key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Parse the endpoint, accepting only http(s) URLs
    pub fn endpoint_url(&self) -> AppResult<Url> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| AppError::invalid_value("services.ionicpush.endpoint", &self.endpoint, e))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(AppError::validation(
                "services.ionicpush.endpoint",
                format!("unsupported scheme '{scheme}'"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for daily rolling log files; console only when unset
    pub log_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_path: None,
        }
    }
}

impl Config {
    /// Apply `IONIC_PUSH_KEY` from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides read through `lookup`; blank values are ignored
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.services.ionicpush.key = Some(key);
        }
        self
    }
}
