//! HTTP API handlers for geosales-ingest
//!
//! JSON over HTTP for the dashboard: record listing, uploads, analytics and
//! the geocoding proxy.

pub mod analytics;
pub mod geocode;
pub mod health;
pub mod ingest;
pub mod sales_data;

pub use analytics::analytics_routes;
pub use geocode::geocode_routes;
pub use health::health_routes;
pub use ingest::ingest_routes;
pub use sales_data::sales_data_routes;
