//! Configuration file resolution and shared config sections
//!
//! Settings file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. Per-user config directory (`<config_dir>/fourfold/<file_name>`)
//! 4. None - callers fall back to built-in defaults
//!
//! A missing file never stops startup; a malformed file is a configuration error.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the settings file
pub const CONFIG_ENV_VAR: &str = "FOURFOLD_CONFIG";

/// Default settings file name inside the per-user config directory
pub const DEFAULT_CONFIG_FILE: &str = "fourfold.toml";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Emit ANSI colors
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
        }
    }
}

/// Resolve the settings file path
///
/// Returns `None` when no source names a file and the per-user default does
/// not exist.
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Per-user config directory
    default_config_path().filter(|path| path.exists())
}

/// Per-user default settings path (`~/.config/fourfold/fourfold.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fourfold").join(DEFAULT_CONFIG_FILE))
}

/// Parse a TOML settings document
pub fn parse_toml<T: DeserializeOwned>(content: &str) -> Result<T> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Load a TOML settings file, falling back to defaults when it does not exist
pub fn load_toml_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        info!("No settings file configured, using built-in defaults");
        return Ok(T::default());
    };

    if !path.exists() {
        warn!(
            "Settings file {} not found, using built-in defaults",
            path.display()
        );
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    info!("Loaded settings from {}", path.display());
    parse_toml(&content)
}
