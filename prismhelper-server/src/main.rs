// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! PrismHelper - authenticated relay that triggers PhotoPrism library jobs.
//!
//! # Examples
//!
//! ```bash
//! # Run the HTTP relay and any scheduled jobs
//! prismhelper
//!
//! # Same, with settings from a specific env file and port
//! prismhelper --env-file /etc/prismhelper.env --port 8080 serve
//!
//! # Import new photos right now
//! prismhelper import
//!
//! # Show selected library statistics
//! prismhelper stats --field photos --field videos
//!
//! # Print the effective configuration
//! prismhelper config
//! ```

mod commands;
mod external_log;
mod http;
mod logging;
mod scheduler;

use anyhow::Result;
use clap::{Parser, Subcommand};
use prismhelper_config::{load_dotenv, AppConfig};
use prismhelper_core::Operation;
use std::path::PathBuf;
use tracing::warn;

use commands::{config, run, serve};

// ============================================================================
// CLI Definition
// ============================================================================

/// PrismHelper - PhotoPrism import and index relay.
#[derive(Parser)]
#[command(name = "prismhelper")]
#[command(about = "Authenticated relay that triggers PhotoPrism imports and indexing")]
#[command(long_about = r#"
PrismHelper exposes /import, /index and /stats over HTTP, guarded by a bearer
key, and forwards them to a PhotoPrism server. Imports and indexing can also
run on a cron schedule.

Settings come from the environment, optionally seeded from a .env file.

Examples:
  prismhelper                        # Serve (default)
  prismhelper import                 # Import now
  prismhelper stats --field photos   # Filtered statistics
  prismhelper config                 # Effective configuration
"#)]
#[command(version)]
#[command(author = "PrismHelper Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'serve' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Env file to load instead of ./.env.
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Listen port (overrides HOSTPORT).
    #[arg(long, short, global = true)]
    pub port: Option<u16>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP relay and scheduled jobs (default).
    #[command(visible_alias = "s")]
    Serve,

    /// Import new files now.
    Import,

    /// Re-index the library now.
    Index,

    /// Query library statistics.
    Stats(run::StatsArgs),

    /// Show the effective configuration.
    Config,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// The remote operation did not succeed.
    OperationFailed = 2,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match dispatch(&cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::Error
        }
    };

    std::process::exit(code as i32);
}

async fn dispatch(cli: &Cli) -> Result<ExitCode> {
    load_dotenv(cli.env_file.as_deref())?;

    let loaded = AppConfig::from_env()?;
    let mut app_config = loaded.config;
    if let Some(port) = cli.port {
        app_config.server.port = port;
    }

    // Printing the configuration must not create log files.
    if matches!(cli.command, Some(Commands::Config)) {
        return config::run(&app_config, &loaded.warnings);
    }

    logging::init(&app_config, cli.verbose)?;
    for warning in &loaded.warnings {
        warn!("{warning}");
    }

    match &cli.command {
        Some(Commands::Serve) | None => serve::run(app_config).await,
        Some(Commands::Import) => run::operation(&app_config, Operation::Import).await,
        Some(Commands::Index) => run::operation(&app_config, Operation::Index).await,
        Some(Commands::Stats(args)) => run::stats(&app_config, args).await,
        Some(Commands::Config) => config::run(&app_config, &loaded.warnings),
    }
}
