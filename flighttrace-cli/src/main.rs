//! FlightTrace CLI - Command-line interface
//!
//! Flight statistics, cache management and terminal replay on top of the
//! FlightTrace library.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::cache::CacheAction;
use commands::config::ConfigCommands;
use commands::replay::ReplayArgs;
use commands::stats::StatsArgs;
use commands::tier::TierArgs;
use error::CliError;
use runner::{CliRunner, GlobalOptions};

#[derive(Parser, Debug)]
#[command(name = "flighttrace")]
#[command(version, about = "Flight telemetry statistics and replay", long_about = None)]
struct Cli {
    /// Directory holding metadata.json and the per-year datasets
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Base URL serving metadata.json and the per-year datasets (used when no
    /// data directory is given)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize flights for a tier, year and aircraft
    Stats(StatsArgs),

    /// Replay one flight in the terminal
    Replay(ReplayArgs),

    /// Show which detail tier a map zoom resolves to
    Tier(TierArgs),

    /// Warm or inspect the dataset cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Inspect the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let options = GlobalOptions {
        data_dir: cli.data_dir,
        base_url: cli.base_url,
        debug: cli.debug,
    };

    if let Err(e) = dispatch(cli.command, &options).await {
        e.exit();
    }
}

async fn dispatch(command: Commands, options: &GlobalOptions) -> Result<(), CliError> {
    match command {
        Commands::Tier(args) => commands::tier::run(args),
        Commands::Config { command } => commands::config::run(command),
        Commands::Stats(args) => {
            let runner = CliRunner::new(options)?;
            commands::stats::run(&runner, args).await
        }
        Commands::Replay(args) => {
            let runner = CliRunner::new(options)?;
            commands::replay::run(&runner, args).await
        }
        Commands::Cache { action } => {
            let runner = CliRunner::new(options)?;
            commands::cache::run(&runner, action).await
        }
    }
}
