//! Application configuration.
//!
//! Values come from, in order of precedence:
//! 1. `DESKMATE_DATA_DIR` / `DESKMATE_LOG_LEVEL` environment variables
//! 2. an optional `config.toml`
//! 3. built-in defaults (`dirs::data_dir()/deskmate`)
//!
//! # Invariants
//! - A missing config file is not an error.
//! - `poll_interval_secs` is at least 1.

use crate::logging::default_log_level;
use crate::manager::calendar::DEFAULT_POLL_INTERVAL;
use crate::notify::{NotificationCenter, DEFAULT_APP_NAME, DEFAULT_TIMEOUT};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DATA_DIR_ENV: &str = "DESKMATE_DATA_DIR";
pub const LOG_LEVEL_ENV: &str = "DESKMATE_LOG_LEVEL";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Notification presentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub app_name: String,
    pub timeout_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root for database files and, unless `log_dir` is set, logs.
    pub data_dir: PathBuf,
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
    /// Database file names, relative to `data_dir` unless absolute.
    pub notes_db: PathBuf,
    pub tasks_db: PathBuf,
    pub calendar_db: PathBuf,
    pub poll_interval_secs: u64,
    pub notifications: NotificationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_dir: None,
            log_level: default_log_level().to_string(),
            notes_db: PathBuf::from("notes.db"),
            tasks_db: PathBuf::from("tasks.db"),
            calendar_db: PathBuf::from("calendar.db"),
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            notifications: NotificationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads `path` when it exists, then applies environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = if path.exists() {
            Self::from_toml_str(&std::fs::read_to_string(path)?)?
        } else {
            Self::default()
        };
        let config = config.with_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parses TOML; absent keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `DESKMATE_*` overrides looked up through `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|value| !value.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|value| !value.trim().is_empty()) {
            self.log_level = level;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("logs"))
    }

    pub fn notes_path(&self) -> PathBuf {
        self.data_dir.join(&self.notes_db)
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir.join(&self.tasks_db)
    }

    pub fn calendar_path(&self) -> PathBuf {
        self.data_dir.join(&self.calendar_db)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Desktop notifications with console fallback, using configured labels.
    pub fn notification_center(&self) -> NotificationCenter {
        NotificationCenter::desktop()
            .with_app_name(self.notifications.app_name.clone())
            .with_timeout(Duration::from_secs(self.notifications.timeout_secs))
    }
}

/// `dirs::data_dir()/deskmate`, or a temp-dir fallback on exotic platforms.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("deskmate"))
        .unwrap_or_else(|| std::env::temp_dir().join("deskmate"))
}

/// Default config file location: `dirs::config_dir()/deskmate/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("deskmate"))
        .unwrap_or_else(|| std::env::temp_dir().join("deskmate"))
        .join(CONFIG_FILE_NAME)
}
