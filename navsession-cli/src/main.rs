//! navsession CLI
//!
//! Runs a background navigation session against a scripted scenario, with
//! display updates and announcements printed to the console.

mod commands;
mod console;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::common::EtaArg;
use commands::config::ConfigCommands;
use commands::simulate::SimulateArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "navsession", version, about = "Background turn-by-turn navigation session")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a scenario file through a navigation session
    Simulate {
        /// Scenario JSON file
        scenario: PathBuf,

        /// Configuration file (defaults to the platform config directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Make the host refuse foreground execution
        #[arg(long)]
        deny_foreground: bool,

        /// Simulate a host that cannot refuse foreground execution
        #[arg(long)]
        legacy_host: bool,

        /// ETA style for the arrival line (overrides config)
        #[arg(long, value_enum)]
        eta: Option<EtaArg>,

        /// Increase log verbosity (-v debug, -vv trace)
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,
    },

    /// View or initialize configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Simulate {
            scenario,
            config,
            deny_foreground,
            legacy_host,
            eta,
            verbose,
        } => commands::simulate::run(SimulateArgs {
            scenario,
            config,
            deny_foreground,
            legacy_host,
            eta,
            verbose,
        }),
        Commands::Config(command) => commands::config::run(command),
    }
}
