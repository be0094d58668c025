//! Cycle CLI - cyc command

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli_lib::{logging, system_config};
use std::path::PathBuf;

mod cmd;

/// Cycle - breadcrumb trail and roundtrip name checks
#[derive(Parser)]
#[command(name = "cyc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/cycle/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a roundtrip name is still free
    Check {
        /// Candidate name
        name: String,
        /// Uniqueness endpoint (overrides namecheck.endpoint)
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Replay a scripted view session
    Replay {
        /// Script file (TOML)
        script: PathBuf,
        /// Check names against the script's in-memory set even if an endpoint is configured
        #[arg(long)]
        offline: bool,
        /// Print one JSON snapshot per step
        #[arg(long)]
        json: bool,
    },
    /// View or edit configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List all configuration values
    List,
    /// Print a single value
    Get {
        /// Key, e.g. namecheck.debounce_ms
        key: String,
    },
    /// Set a single value
    Set {
        /// Key, e.g. namecheck.debounce_ms
        key: String,
        /// New value
        value: String,
    },
    /// Print the config file path
    Path {
        /// Create the file with defaults if missing
        #[arg(long)]
        create: bool,
    },
    /// Print an annotated example configuration
    Example,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Check { name, endpoint } => {
            let config = system_config::load(config_path)?;
            let _guard = logging::init(&config.log, cli.verbose)?;
            cmd::check::run(&config, &name, endpoint.as_deref()).await
        }
        Commands::Replay { script, offline, json } => {
            let config = system_config::load(config_path)?;
            let _guard = logging::init(&config.log, cli.verbose)?;
            cmd::replay::run(&config, &script, offline, json).await
        }
        Commands::Config(action) => {
            let _guard = logging::init(&Default::default(), cli.verbose)?;
            match action {
                ConfigCommands::List => cmd::config::run_list(config_path).await,
                ConfigCommands::Get { key } => cmd::config::run_get(config_path, &key).await,
                ConfigCommands::Set { key, value } => {
                    cmd::config::run_set(config_path, &key, &value).await
                }
                ConfigCommands::Path { create } => cmd::config::run_path(config_path, create).await,
                ConfigCommands::Example => cmd::config::run_example().await,
            }
        }
    }
}
