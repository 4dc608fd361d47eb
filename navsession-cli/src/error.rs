//! CLI error type and exit codes.

use std::fmt;

use navsession::config::ConfigError;
use navsession::replay::ScenarioError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be read, parsed or written.
    Config(String),
    /// Scenario file could not be loaded.
    Scenario(ScenarioError),
    /// Logging could not be initialized.
    Logging(std::io::Error),
    /// Async runtime or signal handler setup failed.
    Runtime(String),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 2,
            CliError::Scenario(_) => 3,
            CliError::Logging(_) | CliError::Runtime(_) => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Scenario(e) => write!(f, "Scenario error: {}", e),
            CliError::Logging(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Runtime(msg) => write!(f, "Runtime error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Scenario(e) => Some(e),
            CliError::Logging(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ScenarioError> for CliError {
    fn from(e: ScenarioError) -> Self {
        CliError::Scenario(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_category() {
        assert_eq!(CliError::Config("bad".into()).exit_code(), 2);
        assert_eq!(CliError::Scenario(ScenarioError::Empty).exit_code(), 3);
        assert_eq!(CliError::Runtime("boom".into()).exit_code(), 1);
    }

    #[test]
    fn test_config_error_conversion() {
        let err: CliError = ConfigError::InvalidValue {
            section: "display",
            key: "eta_style",
            value: "sundial".into(),
            reason: "unknown ETA style 'sundial'".into(),
        }
        .into();
        assert!(err.to_string().contains("eta_style"));
        assert_eq!(err.exit_code(), 2);
    }
}
