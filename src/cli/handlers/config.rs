//! Configuration management handler

use anyhow::Result;
use std::path::PathBuf;

use ionic_push::config::{ConfigManager, KEYS};

use crate::cli::{CliContext, ConfigAction};

const API_KEY: &str = "services.ionicpush.key";

/// Handler for `init` and `config` commands
pub struct ConfigHandler<'a> {
    context: &'a CliContext,
}

impl<'a> ConfigHandler<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    pub fn handle_init(&self, global: bool, force: bool) -> Result<()> {
        let path = if global {
            None
        } else {
            Some(
                self.context
                    .project_path
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(".")),
            )
        };

        let config_path = ConfigManager::get_config_path(path)?;
        let config_exists = config_path.exists();

        if config_exists && !force {
            println!("Configuration already initialized at: {}", config_path.display());
            println!("Use --force to overwrite");
            return Ok(());
        }

        if config_exists {
            std::fs::remove_file(&config_path)?;
        }
        let config_manager = ConfigManager::open(config_path)?;
        println!(
            "Configuration initialized successfully at: {}",
            config_manager.config_path().display()
        );
        println!();
        println!("Set your API key with:");
        println!("  ionic-push config set {API_KEY} <key>");

        Ok(())
    }

    pub fn handle_config(&self, action: ConfigAction) -> Result<()> {
        let mut config_manager =
            ConfigManager::load(self.context.config_manager.config_path().to_path_buf())?;

        match action {
            ConfigAction::Show => {
                let mut config = config_manager.config().clone();
                if let Some(key) = config.services.ionicpush.key.as_mut() {
                    *key = mask(key);
                }
                print!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigAction::Set { key, value } => {
                config_manager.set(&key, &value)?;
                config_manager.save()?;
                if key == API_KEY {
                    println!("Configuration updated: {key}");
                } else {
                    println!("Configuration updated: {key} = {value}");
                }
            }
            ConfigAction::Get { key } => match config_manager.get(&key) {
                Ok(Some(value)) if key == API_KEY => println!("{}", mask(&value)),
                Ok(value) => println!("{}", value.unwrap_or_else(|| "None".to_string())),
                Err(err) => {
                    return Err(anyhow::anyhow!(
                        "{err}. Known keys: {}",
                        KEYS.join(", ")
                    ))
                }
            },
        }

        Ok(())
    }
}

/// Keep the last four characters of a secret
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{visible}", "*".repeat(chars.len() - 4))
}
