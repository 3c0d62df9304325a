//! Audit log listing endpoint

use crate::error::ApiResult;
use crate::models::AnalysisAttempt;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 100;

/// Query parameters for GET /api/analysis-logs
#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<u32>,
}

/// One attempt as rendered by the listing endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisLogEntry {
    pub id: Option<i64>,
    pub image_path: Option<String>,
    pub success: bool,
    pub message: Option<String>,
    pub class: Option<i64>,
    pub confidence: Option<f64>,
    /// Derived display band; "none" when no confidence was recorded
    pub confidence_level: &'static str,
    pub requested_at: String,
    pub responded_at: String,
}

impl From<AnalysisAttempt> for AnalysisLogEntry {
    fn from(attempt: AnalysisAttempt) -> Self {
        let confidence_level = attempt.confidence_level();
        Self {
            id: attempt.id,
            image_path: attempt.image_path,
            success: attempt.success,
            message: attempt.message,
            class: attempt.class_label,
            confidence: attempt.confidence,
            confidence_level,
            requested_at: attempt.requested_at.to_rfc3339(),
            responded_at: attempt.responded_at.to_rfc3339(),
        }
    }
}

/// GET /api/analysis-logs?limit=N
///
/// Most recent attempts first, default 10, capped at 100.
pub async fn recent_logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> ApiResult<Json<Vec<AnalysisLogEntry>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let attempts = state.orchestrator.recent_attempts(limit).await?;

    Ok(Json(attempts.into_iter().map(Into::into).collect()))
}

/// Build log routes
pub fn log_routes() -> Router<AppState> {
    Router::new().route("/api/analysis-logs", get(recent_logs))
}
