//! Command definitions and structures for the CLI

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "ionic-push")]
#[command(about = "Send push notifications through the Ionic Push API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project path for project-level configuration
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize configuration
    Init {
        /// Initialize global configuration (default is project-level)
        #[arg(short, long)]
        global: bool,

        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Configure settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Send a push notification
    Send(SendArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct SendArgs {
    /// Device token, or email address with --emails
    pub address: String,

    /// Notification text
    pub message: String,

    /// Address recipients by email instead of device token
    #[arg(long)]
    pub emails: bool,

    /// Security profile (defaults to services.ionicpush.default_profile)
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Notification title
    #[arg(short, long)]
    pub title: Option<String>,

    /// iOS badge count
    #[arg(long)]
    pub badge: Option<u32>,

    /// iOS sound file name
    #[arg(long)]
    pub sound: Option<String>,

    /// Custom data as a JSON object
    #[arg(long)]
    pub data: Option<String>,

    /// Print the request body instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

/// Configuration management actions
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set configuration value
    Set {
        /// Configuration key (e.g., services.ionicpush.key)
        key: String,
        /// Value to set; empty clears optional settings
        value: String,
    },

    /// Get configuration value
    Get {
        /// Configuration key
        key: String,
    },
}
