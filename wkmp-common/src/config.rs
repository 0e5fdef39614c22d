//! Bootstrap configuration discovery and loading
//!
//! Each WKMP module may carry an optional `<module>.toml` bootstrap file.
//! Lookup order:
//! 1. Path named by the module's override environment variable
//! 2. Per-user config directory (`~/.config/wkmp/<module>.toml` on Linux)
//! 3. System-wide `/etc/wkmp/<module>.toml` (Linux only)
//!
//! A missing bootstrap file is not an error. A broken one is reported to the
//! caller, which should warn and fall back to defaults rather than exit.
//!
//! Nothing here logs: modules read their bootstrap file before the tracing
//! subscriber exists and report the outcome once it is installed.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Locate the bootstrap TOML file for `module_name`
///
/// Returns `None` when no candidate exists on disk. An override path from
/// `env_var_name` is returned even if it does not exist, so the caller can
/// report it.
pub fn find_config_file(module_name: &str, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: Explicit override
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let file_name = format!("{}.toml", module_name);

    // Priority 2: Per-user config directory
    if let Some(user_config) = dirs::config_dir().map(|d| d.join("wkmp").join(&file_name)) {
        if user_config.exists() {
            return Some(user_config);
        }
    }

    // Priority 3: System-wide config (Linux only)
    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/wkmp").join(&file_name);
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Read and parse a TOML file, failing on any error
pub fn read_toml_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
