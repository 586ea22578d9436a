//! CLI Module
//!
//! Command-line interface for debate-coach using Clap v4.

mod commands;
mod render;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// debate-coach - Practise English by debating an AI
#[derive(Parser, Debug)]
#[command(name = "debate-coach")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Debate the AI in the terminal
    Debate {
        /// Topic id or title from the catalog, or any free-form title
        #[arg(short, long)]
        topic: String,

        /// Your display name
        #[arg(long, env = "DEBATE_COACH_NAME", default_value = "")]
        name: String,

        /// Your email; sessions are stored under it
        #[arg(long, env = "DEBATE_COACH_EMAIL")]
        email: String,
    },

    /// List the debate topics
    Topics,

    /// List your past sessions, newest first
    Sessions {
        #[arg(long, env = "DEBATE_COACH_EMAIL")]
        email: String,
    },

    /// Show one session in detail
    Show {
        /// Session id
        id: String,
    },

    /// Compare a session with the one before it
    Compare {
        /// Session id
        id: String,
    },

    /// Show your dashboard summary
    Dashboard {
        #[arg(long, env = "DEBATE_COACH_EMAIL")]
        email: String,
    },

    /// Show your profile summary
    Profile {
        #[arg(long, env = "DEBATE_COACH_EMAIL")]
        email: String,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration
    Config {
        /// Show full configuration including secrets
        #[arg(short, long)]
        show_secrets: bool,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        operation: DbCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum DbCommands {
    /// Initialize database
    Init,
    /// Show database statistics
    Stats,
}

/// Main CLI entry point
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = commands::load_config(cli.config.as_deref())?;
    let _log_guard = crate::logging::init(&config.logging, cli.debug)?;
    config.log_load_report();

    if cli.debug {
        tracing::info!("Debug mode enabled");
    }

    match cli.command {
        None => commands::cmd_serve(config, None).await,
        Some(Commands::Serve { port }) => commands::cmd_serve(config, port).await,
        Some(Commands::Debate { topic, name, email }) => {
            session::cmd_debate(&config, &topic, name, email).await
        }
        Some(Commands::Topics) => commands::cmd_topics(),
        Some(Commands::Sessions { email }) => commands::cmd_sessions(&config, &email).await,
        Some(Commands::Show { id }) => commands::cmd_show(&config, &id).await,
        Some(Commands::Compare { id }) => commands::cmd_compare(&config, &id).await,
        Some(Commands::Dashboard { email }) => commands::cmd_dashboard(&config, &email).await,
        Some(Commands::Profile { email }) => commands::cmd_profile(&config, &email).await,
        Some(Commands::Init { force }) => commands::cmd_init(&config, force),
        Some(Commands::Config { show_secrets }) => commands::cmd_config(&config, show_secrets),
        Some(Commands::Db { operation }) => commands::cmd_db(&config, operation).await,
    }
}
