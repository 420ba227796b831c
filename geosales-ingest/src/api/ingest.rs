//! Dataset ingest endpoints
//!
//! POST /api/upload-excel (multipart spreadsheet) and POST /api/ingest
//! (pre-parsed JSON rows). Both run the full pipeline and replace the
//! stored dataset on success.

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::models::{IngestReport, RawRow};
use crate::services::spreadsheet_reader::{is_spreadsheet_mime, read_first_sheet};
use crate::AppState;

/// Multipart field carrying the workbook
pub const UPLOAD_FIELD: &str = "file";

/// POST /api/ingest request
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub rows: Vec<RawRow>,
}

/// Successful ingest response
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub message: String,
    pub count: usize,
    pub report: IngestReport,
}

impl From<IngestReport> for IngestResponse {
    fn from(report: IngestReport) -> Self {
        Self {
            message: format!("Successfully imported {} records", report.inserted_count),
            count: report.inserted_count,
            report,
        }
    }
}

/// POST /api/upload-excel
pub async fn upload_spreadsheet(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<IngestResponse>> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        if !is_spreadsheet_mime(&content_type) {
            return Err(ApiError::BadRequest(
                "Only Excel files (.xlsx, .xls) and ODS files are allowed".to_string(),
            ));
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some((file_name, bytes));
        break;
    }

    let Some((file_name, bytes)) = upload else {
        return Err(ApiError::BadRequest("No file uploaded".to_string()));
    };

    tracing::info!(file = %file_name, bytes = bytes.len(), "Spreadsheet upload received");

    let rows = tokio::task::spawn_blocking(move || read_first_sheet(bytes.to_vec()))
        .await
        .map_err(|e| ApiError::Internal(format!("Spreadsheet decode task failed: {}", e)))??;

    let report = state.pipeline.ingest(rows).await?;
    Ok(Json(report.into()))
}

/// POST /api/ingest
pub async fn ingest_rows(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> ApiResult<Json<IngestResponse>> {
    let report = state.pipeline.ingest(request.rows).await?;
    Ok(Json(report.into()))
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::BadRequest(e.body_text())
    }
}

/// Build ingest routes with the upload size limit applied
pub fn ingest_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/api/upload-excel", post(upload_spreadsheet))
        .route("/api/ingest", post(ingest_rows))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
