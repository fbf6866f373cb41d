//! CLI module: argument parsing, context setup and command routing

pub mod commands;
pub mod context;
pub mod handlers;

use anyhow::Result;
use clap::Parser;

pub use commands::{Cli, Commands, ConfigAction, SendArgs};
pub use context::CliContext;
pub use handlers::CommandHandler;

pub struct CliApp;

impl CliApp {
    /// Parse command line arguments and execute the requested command
    pub fn run() -> Result<()> {
        let cli = Cli::parse();

        let mut context = CliContext::new(cli.project.clone(), cli.verbose)?;
        context.init_logging()?;

        CommandHandler::new(context).handle_command(cli.command)
    }
}
