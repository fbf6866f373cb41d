//! CLI context: resolved project path, configuration and logging

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use ionic_push::config::ConfigManager;

/// CLI execution context shared by the handlers
pub struct CliContext {
    pub project_path: Option<PathBuf>,
    pub verbose: bool,
    pub config_manager: ConfigManager,
    log_guard: Option<WorkerGuard>,
}

impl CliContext {
    pub fn new(project_path: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let resolved_project_path = Self::resolve_project_path(project_path);
        let config_manager = ConfigManager::new(resolved_project_path.clone())
            .context("Failed to load configuration")?;

        Ok(Self {
            project_path: resolved_project_path,
            verbose,
            config_manager,
            log_guard: None,
        })
    }

    /// Use the current directory when it already holds a project config
    fn resolve_project_path(project_path: Option<PathBuf>) -> Option<PathBuf> {
        if project_path.is_some() {
            return project_path;
        }

        let current_dir = std::env::current_dir().ok()?;
        current_dir
            .join(".ionic-push")
            .join("config.toml")
            .exists()
            .then_some(current_dir)
    }

    /// Console logging on stderr, plus a daily rolling file when
    /// `logging.log_path` is set
    pub fn init_logging(&mut self) -> Result<()> {
        let logging = &self.config_manager.config().logging;
        let level = if self.verbose { "debug" } else { logging.level.as_str() };

        let env_filter = EnvFilter::from_default_env()
            .add_directive(level.parse().unwrap_or_else(|_| tracing::Level::INFO.into()));

        let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

        let file_layer = match &logging.log_path {
            Some(dir) => {
                let dir = Path::new(dir);
                std::fs::create_dir_all(dir).context("Failed to create log directory")?;

                let (writer, guard) =
                    tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "ionic-push.log"));
                self.log_guard = Some(guard);

                Some(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
            }
            None => None,
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .context("Failed to initialize logging")?;

        tracing::debug!(
            project = ?self.project_path,
            config = %self.config_manager.config_path().display(),
            "Logging initialized"
        );

        Ok(())
    }
}
