//! Geocoding proxy for the dashboard
//!
//! POST /api/geocode forwards a free-form address and returns the provider's
//! JSON unchanged. GET /api/maps-config hands the map widget its key.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::services::GeocodeError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GeocodeRequest {
    pub address: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapsConfigResponse {
    pub api_key: String,
}

/// POST /api/geocode
pub async fn geocode_address(
    State(state): State<AppState>,
    Json(request): Json<GeocodeRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let geocoder = state.geocoder.as_ref().ok_or(GeocodeError::NotConfigured)?;

    let address = request.address.trim();
    if address.is_empty() {
        return Err(ApiError::BadRequest("Address is required".to_string()));
    }

    let body = geocoder.raw_lookup(address).await?;
    Ok(Json(body))
}

/// GET /api/maps-config
pub async fn maps_config(State(state): State<AppState>) -> Json<MapsConfigResponse> {
    Json(MapsConfigResponse {
        api_key: state.api_key.clone().unwrap_or_default(),
    })
}

pub fn geocode_routes() -> Router<AppState> {
    Router::new()
        .route("/api/geocode", post(geocode_address))
        .route("/api/maps-config", get(maps_config))
}
