//! Configuration loading and persistence
//!
//! Project configuration lives in `<project>/.ionic-push/config.toml`, global
//! configuration in `~/.ionic-push/config.toml`. Setting `IONIC_PUSH_HOME`
//! moves the global location, which keeps tests away from the real home
//! directory.

mod types;

use directories::BaseDirs;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{AppError, AppResult};

pub use types::{
    Config, IonicPushConfig, LoggingConfig, ServicesConfig, API_KEY_ENV, DEFAULT_ENDPOINT,
};

const CONFIG_DIR: &str = ".ionic-push";
const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the global configuration base directory
pub const HOME_ENV: &str = "IONIC_PUSH_HOME";

/// Keys accepted by [`ConfigManager::get`] and [`ConfigManager::set`]
pub const KEYS: &[&str] = &[
    "services.ionicpush.key",
    "services.ionicpush.endpoint",
    "services.ionicpush.timeout_secs",
    "services.ionicpush.default_profile",
    "logging.level",
    "logging.log_path",
];

/// Loads, edits and saves the configuration file
///
/// # Configuration Hierarchy
///
/// 1. **Project-level**: `.ionic-push/config.toml` in the project root
/// 2. **Global**: `~/.ionic-push/config.toml`
///
/// A project path whose config file does not exist falls back to the global
/// file when that one exists.
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
    config: Config,
}

impl ConfigManager {
    /// Load the configuration for `project_path`, or the global one.
    ///
    /// Nothing is written; a missing file reads as the defaults.
    pub fn new(project_path: Option<PathBuf>) -> AppResult<Self> {
        Self::load(Self::resolve_config_path(project_path)?)
    }

    /// Always use the project-level file, creating it when missing
    pub fn new_project_config(project_path: PathBuf) -> AppResult<Self> {
        Self::open(Self::get_config_path(Some(project_path))?)
    }

    /// Load a specific config file, falling back to defaults if missing
    pub fn load(config_path: PathBuf) -> AppResult<Self> {
        let config = if config_path.exists() {
            Self::read(&config_path)?
        } else {
            Config::default()
        };
        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load a specific config file, writing the defaults if missing
    pub fn open(config_path: PathBuf) -> AppResult<Self> {
        let manager = Self::load(config_path)?;
        if !manager.config_path.exists() {
            manager.save()?;
            tracing::debug!(path = %manager.config_path.display(), "Created default configuration");
        }
        Ok(manager)
    }

    fn resolve_config_path(project_path: Option<PathBuf>) -> AppResult<PathBuf> {
        let Some(path) = project_path else {
            return Self::get_config_path(None);
        };

        let project_config_path = Self::get_config_path(Some(path))?;
        if project_config_path.exists() {
            return Ok(project_config_path);
        }

        let global_config_path = Self::get_config_path(None)?;
        if global_config_path.exists() {
            return Ok(global_config_path);
        }

        Ok(project_config_path)
    }

    /// Resolve the config file path for a project, or the global one
    pub fn get_config_path(project_path: Option<PathBuf>) -> AppResult<PathBuf> {
        let base_path = match project_path {
            Some(path) => {
                if !path.is_dir() {
                    return Err(AppError::config(format!(
                        "Project path does not exist: {}",
                        path.display()
                    )));
                }
                path.join(CONFIG_DIR)
            }
            None => Self::global_base_dir()?.join(CONFIG_DIR),
        };

        Ok(base_path.join(CONFIG_FILE))
    }

    fn global_base_dir() -> AppResult<PathBuf> {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(home));
        }
        let base_dirs =
            BaseDirs::new().ok_or_else(|| AppError::config("Failed to get base directories"))?;
        Ok(base_dirs.home_dir().to_path_buf())
    }

    fn read(path: &Path) -> AppResult<Config> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::io_with_source(path, "read config file", e))?;
        toml::from_str(&content)
            .map_err(|e| AppError::config_with_source("Failed to parse config file", e))
    }

    /// Write the configuration back to the file it was loaded from
    pub fn save(&self) -> AppResult<()> {
        if let Some(dir) = self.config_path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| AppError::io_with_source(dir, "create config directory", e))?;
        }
        let content = toml::to_string_pretty(&self.config)?;
        fs::write(&self.config_path, content)
            .map_err(|e| AppError::io_with_source(&self.config_path, "write config file", e))?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Read a value by dotted key; unset optional values read as `None`
    pub fn get(&self, key: &str) -> AppResult<Option<String>> {
        let ionic = &self.config.services.ionicpush;
        let value = match key {
            "services.ionicpush.key" => ionic.key.clone(),
            "services.ionicpush.endpoint" => Some(ionic.endpoint.clone()),
            "services.ionicpush.timeout_secs" => ionic.timeout_secs.map(|t| t.to_string()),
            "services.ionicpush.default_profile" => ionic.default_profile.clone(),
            "logging.level" => Some(self.config.logging.level.clone()),
            "logging.log_path" => self.config.logging.log_path.clone(),
            _ => return Err(AppError::UnknownConfigKey { key: key.to_string() }),
        };
        Ok(value)
    }

    /// Set a value by dotted key. An empty value clears optional settings.
    ///
    /// Changes are kept in memory until [`save`](Self::save).
    pub fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());
        let ionic = &mut self.config.services.ionicpush;

        match key {
            "services.ionicpush.key" => ionic.key = optional(value),
            "services.ionicpush.endpoint" => {
                let previous = std::mem::replace(&mut ionic.endpoint, value.to_string());
                if let Err(e) = ionic.endpoint_url() {
                    ionic.endpoint = previous;
                    return Err(e);
                }
            }
            "services.ionicpush.timeout_secs" => {
                ionic.timeout_secs = if value.is_empty() {
                    None
                } else {
                    Some(value.parse().map_err(|e| AppError::invalid_value(key, value, e))?)
                };
            }
            "services.ionicpush.default_profile" => ionic.default_profile = optional(value),
            "logging.level" => {
                value
                    .parse::<tracing::Level>()
                    .map_err(|e| AppError::invalid_value(key, value, e))?;
                self.config.logging.level = value.to_string();
            }
            "logging.log_path" => self.config.logging.log_path = optional(value),
            _ => return Err(AppError::UnknownConfigKey { key: key.to_string() }),
        }
        Ok(())
    }
}
