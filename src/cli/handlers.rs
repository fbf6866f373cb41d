//! Command handlers for all CLI operations

mod config;
mod send;

use anyhow::Result;

use super::{CliContext, Commands};

pub use config::ConfigHandler;
pub use send::SendHandler;

/// Routes parsed commands to their handlers
pub struct CommandHandler {
    context: CliContext,
}

impl CommandHandler {
    pub fn new(context: CliContext) -> Self {
        Self { context }
    }

    pub fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Init { global, force } => {
                ConfigHandler::new(&self.context).handle_init(global, force)
            }
            Commands::Config { action } => ConfigHandler::new(&self.context).handle_config(action),
            Commands::Send(args) => SendHandler::new(&self.context).handle_send(args),
        }
    }
}
