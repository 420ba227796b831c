//! Sales record listing and reset
//!
//! GET /api/sales-data, POST /api/clear-sales-data

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::models::{SalesRecord, SalesYear};
use crate::AppState;

/// GET /api/sales-data query
#[derive(Debug, Default, Deserialize)]
pub struct SalesDataQuery {
    /// Comma-separated years, e.g. "2022,2024"
    #[serde(default)]
    pub years: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Parse a year filter; blank input means no filter
pub fn parse_years(raw: &str) -> Result<Vec<SalesYear>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .ok()
                .and_then(SalesYear::from_year)
                .ok_or_else(|| format!("Unsupported year: {}", part))
        })
        .collect()
}

/// GET /api/sales-data
pub async fn list_sales_data(
    State(state): State<AppState>,
    Query(query): Query<SalesDataQuery>,
) -> ApiResult<Json<Vec<SalesRecord>>> {
    let years = match query.years.as_deref() {
        Some(raw) => parse_years(raw).map_err(ApiError::BadRequest)?,
        None => Vec::new(),
    };

    let records = if years.is_empty() {
        state.store.list_all().await
    } else {
        state.store.list_by_years(&years).await
    };

    Ok(Json(records))
}

/// POST /api/clear-sales-data
pub async fn clear_sales_data(State(state): State<AppState>) -> Json<MessageResponse> {
    state.pipeline.clear().await;
    Json(MessageResponse {
        message: "Sales data cleared successfully".to_string(),
    })
}

pub fn sales_data_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sales-data", get(list_sales_data))
        .route("/api/clear-sales-data", post(clear_sales_data))
}
