//! Helpers shared across CLI commands.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use navsession::config::ConfigFile;
use navsession::presentation::EtaStyle;

use crate::error::CliError;

/// ETA rendering selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum EtaArg {
    /// Absolute arrival time (17:45)
    Clock,
    /// Remaining duration (in 5 min)
    Relative,
}

impl From<EtaArg> for EtaStyle {
    fn from(arg: EtaArg) -> Self {
        match arg {
            EtaArg::Clock => EtaStyle::Clock,
            EtaArg::Relative => EtaStyle::Relative,
        }
    }
}

/// Config path from the CLI, else the platform default.
pub fn resolve_config_path(cli_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    cli_path
        .or_else(ConfigFile::default_path)
        .ok_or_else(|| {
            CliError::Config(
                "No configuration directory on this platform. Use --config to pass a path."
                    .to_string(),
            )
        })
}

/// Load the config at `path`, falling back to defaults when it is missing.
pub fn load_config(path: &Path) -> Result<ConfigFile, CliError> {
    Ok(ConfigFile::load_or_default(path)?)
}
