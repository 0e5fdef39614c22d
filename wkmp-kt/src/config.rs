//! Configuration resolution for wkmp-kt
//!
//! **Priority:** command line (or `WKMP_KT_WORKERS`) → TOML bootstrap file →
//! built-in defaults. Only the worker count is exposed on the command line;
//! the heartbeat interval and queue capacity come from TOML.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use wkmp_common::config::LoggingConfig;
use wkmp_common::{Error, Result};

/// Module name used to locate `wkmp-kt.toml`
pub const MODULE_NAME: &str = "wkmp-kt";

/// Environment variable naming an explicit bootstrap file
pub const CONFIG_ENV_VAR: &str = "WKMP_KT_CONFIG";

pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// Worker pool size
    #[serde(default)]
    pub workers: Option<usize>,

    /// Seconds between heartbeat messages
    #[serde(default)]
    pub heartbeat_interval_secs: Option<u64>,

    /// Requests that may wait for a free worker before input reading pauses
    #[serde(default)]
    pub queue_capacity: Option<usize>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Bootstrap file named by `WKMP_KT_CONFIG` or found in the standard
    /// locations
    pub fn locate() -> Option<PathBuf> {
        wkmp_common::config::find_config_file(MODULE_NAME, CONFIG_ENV_VAR)
    }

    /// Parse the bootstrap file at `path`
    pub fn read(path: &Path) -> Result<Self> {
        wkmp_common::config::read_toml_config(path)
    }
}

/// Effective settings for one server run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub workers: usize,
    pub heartbeat_interval: Duration,
    pub queue_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            heartbeat_interval: Duration::from_secs(DEFAULT_HEARTBEAT_INTERVAL_SECS),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Merge the command-line worker count over the TOML file
    pub fn resolve(cli_workers: Option<usize>, toml: &TomlConfig) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            workers: cli_workers.or(toml.workers).unwrap_or(defaults.workers),
            heartbeat_interval: toml
                .heartbeat_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.heartbeat_interval),
            queue_capacity: toml.queue_capacity.unwrap_or(defaults.queue_capacity),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::Config("workers must be at least 1".to_string()));
        }
        if self.queue_capacity == 0 {
            return Err(Error::Config("queue_capacity must be at least 1".to_string()));
        }
        if self.heartbeat_interval.is_zero() {
            return Err(Error::Config(
                "heartbeat_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
