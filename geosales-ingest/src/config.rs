//! Configuration resolution for geosales-ingest
//!
//! Bootstrap settings come from the module's TOML file (see
//! `geosales_common::config`), overridden by CLI flags and environment
//! variables. The geocoding API key resolves with ENV → TOML priority.

use geosales_common::config::LoggingConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::services::batch_writer::DEFAULT_BATCH_SIZE;
use crate::services::geocode_pool::DEFAULT_CONCURRENCY;

/// Module name used for config-file lookup
pub const MODULE_NAME: &str = "geosales-ingest";

/// Default listen address
pub const DEFAULT_BIND: &str = "127.0.0.1:5730";

/// Environment variables checked for the geocoding API key, in order
pub const API_KEY_ENV_VARS: &[&str] = &[
    "GEOSALES_GEOCODE_API_KEY",
    "GOOGLE_MAP_API",
    "GOOGLE_GEOCODING_API",
];

/// Contents of `geosales-ingest.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestToml {
    /// Listen address (e.g. "127.0.0.1:5730")
    #[serde(default)]
    pub bind: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub geocode: GeocodeSettings,

    #[serde(default)]
    pub pipeline: PipelineSettings,
}

/// `[geocode]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeSettings {
    pub api_key: Option<String>,
    /// Appended to every address ("Kochi, Kerala, India")
    pub country: String,
    pub base_url: String,
    /// Per-lookup timeout
    pub timeout_ms: u64,
    /// Outbound request quota
    pub requests_per_second: u32,
}

impl Default for GeocodeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            country: "India".to_string(),
            base_url: "https://maps.googleapis.com/maps/api/geocode/json".to_string(),
            timeout_ms: 10_000,
            requests_per_second: 40,
        }
    }
}

/// `[pipeline]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Concurrent geocode workers
    pub concurrency: usize,
    /// Records per store write chunk
    pub batch_size: usize,
    /// Upload size limit
    pub max_upload_bytes: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            batch_size: DEFAULT_BATCH_SIZE,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Resolve the geocoding API key
///
/// **Priority:** ENV (first non-blank of [`API_KEY_ENV_VARS`]) → TOML.
/// `None` means geocoding is disabled and every record keeps sentinel
/// coordinates.
pub fn resolve_geocode_api_key(settings: &GeocodeSettings) -> Option<String> {
    let env_key = API_KEY_ENV_VARS.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .filter(|key| is_valid_key(key))
            .map(|key| (*name, key))
    });
    let toml_key = settings.api_key.clone().filter(|key| is_valid_key(key));

    if env_key.is_some() && toml_key.is_some() {
        warn!("Geocoding API key found in both environment and TOML. Using environment.");
    }

    if let Some((name, key)) = env_key {
        info!("Geocoding API key loaded from environment variable {}", name);
        return Some(key);
    }

    if let Some(key) = toml_key {
        info!("Geocoding API key loaded from TOML config");
        return Some(key);
    }

    warn!(
        "Geocoding API key not configured; records will be stored without coordinates. \
         Set GEOSALES_GEOCODE_API_KEY or [geocode] api_key in {}.toml",
        MODULE_NAME
    );
    None
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
