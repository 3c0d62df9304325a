//! Upload-and-classify endpoint

use crate::services::{ClassifyOutcome, MockUploadService};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use recivo_common::catalog;
use serde::Deserialize;
use serde_json::json;

/// Request body for POST /api/upload-and-classify
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadAndClassifyRequest {
    pub file_name: String,
}

/// POST /api/upload-and-classify
///
/// Runs the full pipeline. The body always carries the structured
/// outcome; the status code follows the catalog descriptor on failure.
pub async fn upload_and_classify(
    State(state): State<AppState>,
    Json(request): Json<UploadAndClassifyRequest>,
) -> Response {
    let outcome = state.orchestrator.process(&request.file_name).await;
    (response_status(&outcome), Json(outcome)).into_response()
}

/// 200 on success, the descriptor's status on a cataloged failure,
/// 500 for unmapped failures
fn response_status(outcome: &ClassifyOutcome) -> StatusCode {
    if outcome.success {
        return StatusCode::OK;
    }
    outcome
        .error_code
        .as_deref()
        .and_then(catalog::lookup)
        .and_then(|d| StatusCode::from_u16(d.http_status).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// GET /api/available-files
///
/// File names the bundled mock upload resolver accepts.
pub async fn available_files() -> Json<serde_json::Value> {
    Json(json!({ "files": MockUploadService::available_file_names() }))
}

/// Build classify routes
pub fn classify_routes() -> Router<AppState> {
    Router::new()
        .route("/api/upload-and-classify", post(upload_and_classify))
        .route("/api/available-files", get(available_files))
}
