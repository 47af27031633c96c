//! Core runtime configuration loaded from TOML.
//!
//! # Structure
//!
//! ```toml
//! [latency]
//! login_ms = 800
//! register_ms = 1000
//! task_ms = 500
//!
//! [storage]
//! backend = "sqlite"     # or "memory"
//! path = "/abs/path/taskfolio.sqlite3"
//!
//! [logging]
//! level = "info"
//! dir = "/abs/path/logs"  # empty disables file logging
//! ```
//!
//! Every section is optional; a missing section or key takes its default.

use crate::storage::{KvBackend, MemoryKvStore, SqliteKvStore, StorageResult};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ConfigError {
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    InvalidValue(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Serialize(err) => write!(f, "config serialization failed: {err}"),
            Self::InvalidValue(message) => write!(f, "invalid config value: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::InvalidValue(_) => None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub latency: LatencyConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Simulated request delays in milliseconds. `0` disables a delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyConfig {
    #[serde(default = "default_login_ms")]
    pub login_ms: u64,
    #[serde(default = "default_register_ms")]
    pub register_ms: u64,
    #[serde(default = "default_task_ms")]
    pub task_ms: u64,
}

fn default_login_ms() -> u64 {
    800
}

fn default_register_ms() -> u64 {
    1000
}

fn default_task_ms() -> u64 {
    500
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            login_ms: default_login_ms(),
            register_ms: default_register_ms(),
            task_ms: default_task_ms(),
        }
    }
}

impl LatencyConfig {
    /// All delays disabled.
    pub fn instant() -> Self {
        Self {
            login_ms: 0,
            register_ms: 0,
            task_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// SQLite database file; required for the sqlite backend.
    #[serde(default)]
    pub path: String,
}

impl StorageConfig {
    /// Opens the configured backend.
    pub fn open(&self) -> StorageResult<KvBackend> {
        match self.backend {
            StorageBackend::Memory => Ok(KvBackend::Memory(MemoryKvStore::new())),
            StorageBackend::Sqlite => Ok(KvBackend::Sqlite(SqliteKvStore::open(&self.path)?)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level_string")]
    pub level: String,
    /// Absolute log directory. Empty means no file logging.
    #[serde(default)]
    pub dir: String,
}

fn default_log_level_string() -> String {
    crate::logging::default_log_level().to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level_string(),
            dir: String::new(),
        }
    }
}

impl CoreConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    /// - `Parse` for malformed TOML or mistyped keys.
    /// - `InvalidValue` when the sqlite backend has no path.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.backend == StorageBackend::Sqlite && self.storage.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "storage.path is required when storage.backend = \"sqlite\"".to_string(),
            ));
        }
        Ok(())
    }
}
