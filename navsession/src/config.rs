//! Configuration for the navigation session.
//!
//! Settings are read from an INI file (default
//! `~/.config/navsession/config.ini`). Missing keys fall back to defaults;
//! unknown keys are ignored; values that fail to parse are errors.
//!
//! ```ini
//! [session]
//! channel_id = navigation
//! channel_name = Navigation
//! notification_id = 12345678
//!
//! [display]
//! arrive_template = Arrive at {}
//! eta_style = clock
//!
//! [logging]
//! level = info
//! directory =
//! ```

use std::path::{Path, PathBuf};

use ini::{Ini, Properties};
use thiserror::Error;

use crate::presentation::{EtaStyle, DEFAULT_ARRIVE_TEMPLATE};

/// Default notification channel id.
pub const DEFAULT_CHANNEL_ID: &str = "navigation";

/// Default notification channel display name.
pub const DEFAULT_CHANNEL_NAME: &str = "Navigation";

/// Default id of the persistent navigation notification.
pub const DEFAULT_NOTIFICATION_ID: u32 = 12_345_678;

/// Default log filter directive.
pub const DEFAULT_LOG_LEVEL: &str = "info";

const SECTION_SESSION: &str = "session";
const SECTION_DISPLAY: &str = "display";
const SECTION_LOGGING: &str = "logging";

/// Errors raised while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] ini::ParseError),

    #[error("Invalid value '{value}' for [{section}] {key}: {reason}")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings that shape a single navigation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Notification channel id registered with the host.
    pub channel_id: String,
    /// Notification channel name shown in host settings.
    pub channel_name: String,
    /// Id of the persistent navigation notification.
    pub notification_id: u32,
    /// Arrival line template; `{}` is replaced by the destination name.
    pub arrive_template: String,
    /// ETA rendering policy.
    pub eta_style: EtaStyle,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            channel_id: DEFAULT_CHANNEL_ID.to_string(),
            channel_name: DEFAULT_CHANNEL_NAME.to_string(),
            notification_id: DEFAULT_NOTIFICATION_ID,
            arrive_template: DEFAULT_ARRIVE_TEMPLATE.to_string(),
            eta_style: EtaStyle::default(),
        }
    }
}

impl SessionConfig {
    pub fn with_channel(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.channel_id = id.into();
        self.channel_name = name.into();
        self
    }

    pub fn with_notification_id(mut self, id: u32) -> Self {
        self.notification_id = id;
        self
    }

    pub fn with_arrive_template(mut self, template: impl Into<String>) -> Self {
        self.arrive_template = template.into();
        self
    }

    pub fn with_eta_style(mut self, style: EtaStyle) -> Self {
        self.eta_style = style;
        self
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for rolling log files; `None` logs to stderr only.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            directory: None,
        }
    }
}

/// Complete contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

impl ConfigFile {
    /// Default config file location, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("navsession").join("config.ini"))
    }

    /// Load configuration from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini(&ini)
    }

    /// Load configuration from `path`, or defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text)?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some(SECTION_SESSION)) {
            if let Some(id) = non_empty(section, "channel_id") {
                config.session.channel_id = id.to_string();
            }
            if let Some(name) = non_empty(section, "channel_name") {
                config.session.channel_name = name.to_string();
            }
            if let Some(value) = non_empty(section, "notification_id") {
                config.session.notification_id =
                    value.parse().map_err(|e: std::num::ParseIntError| {
                        ConfigError::InvalidValue {
                            section: SECTION_SESSION,
                            key: "notification_id",
                            value: value.to_string(),
                            reason: e.to_string(),
                        }
                    })?;
            }
        }

        if let Some(section) = ini.section(Some(SECTION_DISPLAY)) {
            if let Some(template) = non_empty(section, "arrive_template") {
                config.session.arrive_template = template.to_string();
            }
            if let Some(value) = non_empty(section, "eta_style") {
                config.session.eta_style =
                    value
                        .parse()
                        .map_err(|reason| ConfigError::InvalidValue {
                            section: SECTION_DISPLAY,
                            key: "eta_style",
                            value: value.to_string(),
                            reason,
                        })?;
            }
        }

        if let Some(section) = ini.section(Some(SECTION_LOGGING)) {
            if let Some(level) = non_empty(section, "level") {
                config.logging.level = level.to_string();
            }
            config.logging.directory = non_empty(section, "directory").map(PathBuf::from);
        }

        Ok(config)
    }

    /// Render this configuration as INI.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        ini.with_section(Some(SECTION_SESSION))
            .set("channel_id", self.session.channel_id.as_str())
            .set("channel_name", self.session.channel_name.as_str())
            .set("notification_id", self.session.notification_id.to_string());
        ini.with_section(Some(SECTION_DISPLAY))
            .set("arrive_template", self.session.arrive_template.as_str())
            .set("eta_style", self.session.eta_style.as_str());
        ini.with_section(Some(SECTION_LOGGING))
            .set("level", self.logging.level.as_str())
            .set(
                "directory",
                self.logging
                    .directory
                    .as_ref()
                    .map(|d| d.to_string_lossy().to_string())
                    .unwrap_or_default(),
            );
        ini
    }

    /// Write this configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        self.to_ini().write_to_file(path).map_err(write_err)
    }
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}
