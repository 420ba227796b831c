//! geosales-ingest library interface
//!
//! Sales-record ingestion, geocoding enrichment and market analytics behind
//! a small JSON API. Exposed as a library for integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use crate::error::{ApiError, ApiResult, IngestError};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::PipelineSettings;
use crate::services::{GoogleGeocoder, IngestPipeline};
use crate::store::RecordStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: RecordStore,
    /// Single writer for the store: ingests and clears go through here
    pub pipeline: IngestPipeline,
    /// Present only when an API key is configured; backs the proxy endpoint
    pub geocoder: Option<Arc<GoogleGeocoder>>,
    /// Key handed to the dashboard's map widget
    pub api_key: Option<String>,
    pub max_upload_bytes: usize,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(pipeline: IngestPipeline) -> Self {
        Self {
            store: pipeline.store().clone(),
            pipeline,
            geocoder: None,
            api_key: None,
            max_upload_bytes: PipelineSettings::default().max_upload_bytes,
            startup_time: Utc::now(),
        }
    }

    pub fn with_geocoder(mut self, geocoder: Arc<GoogleGeocoder>, api_key: String) -> Self {
        self.geocoder = Some(geocoder);
        self.api_key = Some(api_key);
        self
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::sales_data_routes())
        .merge(api::ingest_routes(state.max_upload_bytes))
        .merge(api::analytics_routes())
        .merge(api::geocode_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
