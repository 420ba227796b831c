//! Configuration loading and config-file resolution
//!
//! Bootstrap configuration is read from a TOML file located with this
//! priority order:
//! 1. Command-line argument (highest priority)
//! 2. `GEOSALES_CONFIG` environment variable
//! 3. `<config_dir>/geosales/<module>.toml`
//!
//! A missing file is not an error: the module logs a warning and starts with
//! compiled defaults.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "GEOSALES_CONFIG";

/// Logging section shared by every module's TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Locates a module's TOML bootstrap file
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    module_name: String,
}

impl ConfigResolver {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
        }
    }

    /// Resolve the config path, or `None` when no candidate is known
    ///
    /// An explicit CLI path or environment path is returned even if it does
    /// not exist, so that the loader can warn about it.
    pub fn resolve(&self, cli_arg: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = cli_arg {
            return Some(path.to_path_buf());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        self.default_path()
    }

    /// Platform default: `~/.config/geosales/<module>.toml` on Linux
    pub fn default_path(&self) -> Option<PathBuf> {
        dirs::config_dir().map(|d| {
            d.join("geosales")
                .join(format!("{}.toml", self.module_name))
        })
    }
}

/// Parse a TOML document into `T`
pub fn parse_toml<T: DeserializeOwned>(content: &str) -> Result<T> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Load `T` from a TOML file with graceful degradation
///
/// - `None` path or missing file: warning, `T::default()`
/// - Unreadable or malformed file: error (a present-but-broken config is
///   a misconfiguration the operator must see)
pub fn load_toml_config<T>(path: Option<&Path>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        warn!("No config file location available, using compiled defaults");
        return Ok(T::default());
    };

    if !path.exists() {
        warn!(
            "Config file not found: {} (using compiled defaults)",
            path.display()
        );
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    let config = parse_toml(&content)?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}
