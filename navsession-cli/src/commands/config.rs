//! Configuration CLI commands.
//!
//! `config show` prints the effective configuration, `config init` writes the
//! defaults to disk.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use navsession::config::ConfigFile;

use super::common::{load_config, resolve_config_path};
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as INI
    Show {
        /// Configuration file (defaults to the platform config directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Write a default configuration file
    Init {
        /// Destination file (defaults to the platform config directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show { path } => run_show(&resolve_config_path(path)?),
        ConfigCommands::Init { path, force } => run_init(&resolve_config_path(path)?, force),
    }
}

fn run_show(path: &Path) -> Result<(), CliError> {
    let config = load_config(path)?;

    if path.exists() {
        println!("; {}", path.display());
    } else {
        println!("; {} (not found, showing defaults)", path.display());
    }
    print!("{}", render(&config)?);
    Ok(())
}

fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        )));
    }

    ConfigFile::default().save(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn render(config: &ConfigFile) -> Result<String, CliError> {
    let mut buf = Vec::new();
    config
        .to_ini()
        .write_to(&mut buf)
        .map_err(|e| CliError::Config(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| CliError::Config(e.to_string()))
}
