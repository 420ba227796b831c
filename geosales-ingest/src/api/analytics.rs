//! GET /api/analytics

use axum::{extract::State, routing::get, Json, Router};

use crate::models::AnalyticsSummary;
use crate::services::analytics::summarize;
use crate::AppState;

/// Summary over every stored record, percentages rounded to one decimal
pub async fn get_analytics(State(state): State<AppState>) -> Json<AnalyticsSummary> {
    let records = state.store.list_all().await;
    Json(summarize(&records).rounded())
}

pub fn analytics_routes() -> Router<AppState> {
    Router::new().route("/api/analytics", get(get_analytics))
}
