//! Geocode provider interface and the Google Geocoding client
//!
//! The worker pool only sees [`GeocodeProvider`]; tests substitute
//! deterministic fakes. Outbound calls are rate limited with a governor
//! quota so a large upload cannot exceed the provider's per-second limit.

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;

use crate::config::GeocodeSettings;
use crate::models::Coordinates;

/// Geocode lookup errors
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoding not configured (no API key)")]
    NotConfigured,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("No match for '{0}'")]
    NoMatch(String),

    #[error("Provider returned status {0}")]
    ProviderStatus(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Lookup timed out after {0:?}")]
    Timeout(Duration),
}

/// Resolves a locality within a region to coordinates
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// False when the provider cannot make calls at all (e.g. no credential)
    fn is_configured(&self) -> bool;

    async fn lookup(&self, locality: &str, region: &str) -> Result<Coordinates, GeocodeError>;
}

/// Provider used when no API key is available: every lookup fails
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledGeocoder;

#[async_trait]
impl GeocodeProvider for DisabledGeocoder {
    fn is_configured(&self) -> bool {
        false
    }

    async fn lookup(&self, _locality: &str, _region: &str) -> Result<Coordinates, GeocodeError> {
        Err(GeocodeError::NotConfigured)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

/// Google Geocoding API client
pub struct GoogleGeocoder {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    country: String,
    timeout: Duration,
    rate_limiter: RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl GoogleGeocoder {
    pub fn new(api_key: String, settings: &GeocodeSettings) -> Result<Self, GeocodeError> {
        let timeout = Duration::from_millis(settings.timeout_ms);
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodeError::NetworkError(e.to_string()))?;

        let per_second = NonZeroU32::new(settings.requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            http_client,
            api_key,
            base_url: settings.base_url.clone(),
            country: settings.country.clone(),
            timeout,
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
        })
    }

    /// Free-form address sent to the provider
    pub fn address_for(&self, locality: &str, region: &str) -> String {
        if self.country.is_empty() {
            format!("{}, {}", locality, region)
        } else {
            format!("{}, {}, {}", locality, region, self.country)
        }
    }

    async fn fetch(&self, address: &str) -> Result<reqwest::Response, GeocodeError> {
        self.rate_limiter.until_ready().await;

        tracing::debug!(address = %address, "Querying geocoding API");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodeError::Timeout(self.timeout)
                } else {
                    GeocodeError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeocodeError::ApiError(status.as_u16(), error_text));
        }

        Ok(response)
    }

    /// Forward a raw address query and return the provider's JSON untouched
    pub async fn raw_lookup(&self, address: &str) -> Result<serde_json::Value, GeocodeError> {
        self.fetch(address)
            .await?
            .json()
            .await
            .map_err(|e| GeocodeError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl GeocodeProvider for GoogleGeocoder {
    fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn lookup(&self, locality: &str, region: &str) -> Result<Coordinates, GeocodeError> {
        if !self.is_configured() {
            return Err(GeocodeError::NotConfigured);
        }

        let address = self.address_for(locality, region);
        let body: GeocodeResponse = self
            .fetch(&address)
            .await?
            .json()
            .await
            .map_err(|e| GeocodeError::ParseError(e.to_string()))?;

        parse_first_location(body, &address)
    }
}

fn parse_first_location(body: GeocodeResponse, address: &str) -> Result<Coordinates, GeocodeError> {
    match body.status.as_str() {
        "OK" => body
            .results
            .into_iter()
            .next()
            .map(|result| {
                Coordinates::new(result.geometry.location.lat, result.geometry.location.lng)
            })
            .ok_or_else(|| GeocodeError::NoMatch(address.to_string())),
        "ZERO_RESULTS" => Err(GeocodeError::NoMatch(address.to_string())),
        other => Err(GeocodeError::ProviderStatus(match body.error_message {
            Some(message) => format!("{}: {}", other, message),
            None => other.to_string(),
        })),
    }
}
