//! Error types for geosales-ingest
//!
//! Row-level problems never surface here: they are absorbed and counted by
//! the pipeline stage that detects them. Only batch-level and request-level
//! failures become errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::geocoder::GeocodeError;
use crate::services::spreadsheet_reader::SpreadsheetError;

/// Batch-level ingest failures
#[derive(Debug, Error)]
pub enum IngestError {
    /// Nothing survived normalization and validation; the store is untouched
    #[error("No valid data found. Please check the format and required columns.")]
    NoValidRows,

    /// Another ingest holds the writer
    #[error("Another ingest is already running")]
    AlreadyRunning,
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upload over the configured size limit (413)
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Ingest failure
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Workbook could not be decoded
    #[error(transparent)]
    Spreadsheet(#[from] SpreadsheetError),

    /// Geocoding proxy failure
    #[error("Geocoding failed: {0}")]
    Geocode(#[from] GeocodeError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Ingest(IngestError::NoValidRows) => (StatusCode::BAD_REQUEST, "NO_VALID_ROWS"),
            ApiError::Ingest(IngestError::AlreadyRunning) => (StatusCode::CONFLICT, "INGEST_RUNNING"),
            ApiError::Spreadsheet(_) => (StatusCode::BAD_REQUEST, "INVALID_SPREADSHEET"),
            ApiError::Geocode(GeocodeError::NotConfigured) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "GEOCODE_NOT_CONFIGURED")
            }
            ApiError::Geocode(_) => (StatusCode::BAD_GATEWAY, "GEOCODE_FAILED"),
        };

        let message = match &self {
            ApiError::BadRequest(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::Internal(msg) => {
                msg.clone()
            }
            other => other.to_string(),
        };

        let mut body = json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        // Ingest callers report the insert count alongside the reason
        if matches!(self, ApiError::Ingest(_)) {
            body["count"] = json!(0);
        }

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
