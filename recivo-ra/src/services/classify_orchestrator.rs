//! Upload-and-classify pipeline
//!
//! Sequences one request end to end: file name validation, upload
//! resolution, path validation, remote classification, outcome
//! interpretation, audit persistence, response assembly. Single pass, no
//! retries; every failure is converted into a response at this boundary
//! and an audit record is written for both branches.
//!
//! Failures travel as [`StageFailure`] values, not panics or rich error
//! objects: a stage either knows its catalog code (local validation,
//! resolver, transport) or hands over the raw upstream message for code
//! extraction.

use crate::models::{AnalysisAttempt, Confidence, ImagePath};
use crate::services::analysis_log_store::{AnalysisLogStore, StoreError};
use crate::services::classification_client::ClassificationApi;
use crate::services::upload_service::UploadService;
use chrono::{DateTime, Utc};
use recivo_common::catalog::{self, codes};
use serde::Serialize;
use std::sync::Arc;

/// Maximum accepted file name length in characters
const MAX_FILE_NAME_LEN: usize = 255;

/// File extensions accepted for upload (case-insensitive)
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Result of one pipeline invocation, ready for serialization
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyOutcome {
    pub success: bool,
    /// Raw outcome text: completion notice, upstream message, or error text
    pub message: String,
    /// RFC 3339 response timestamp
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_actions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ClassifyData>,
}

/// Classification payload returned on success
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<i64>,
    pub confidence: f64,
    /// Returned for the follow-on OCR request owned by another service
    pub uploaded_path: String,
    pub requires_confirmation: bool,
}

/// A pipeline stage failure
///
/// `Coded` failures know their catalog code up front; `Remote` failures
/// carry opaque upstream text whose code (if any) is embedded behind the
/// `Error:` marker.
#[derive(Debug, Clone)]
enum StageFailure {
    Coded { code: &'static str, detail: String },
    Remote { message: String },
}

impl StageFailure {
    fn coded(code: &'static str, detail: impl Into<String>) -> Self {
        StageFailure::Coded {
            code,
            detail: detail.into(),
        }
    }

    /// Text persisted to the audit record and echoed in the response.
    /// Coded failures embed their code behind the same `Error:` marker the
    /// upstream service uses, so stored messages stay uniformly greppable.
    fn audit_message(&self) -> String {
        match self {
            StageFailure::Coded { code, detail } => format!("Error:{code} - {detail}"),
            StageFailure::Remote { message } => message.clone(),
        }
    }

    fn error_code(&self) -> Option<String> {
        match self {
            StageFailure::Coded { code, .. } => Some((*code).to_string()),
            StageFailure::Remote { message } => catalog::extract_error_code(message),
        }
    }
}

/// Stage outcome carried to record construction and response assembly
enum Branch {
    Success {
        path: ImagePath,
        message: String,
        class: Option<i64>,
        confidence: Option<Confidence>,
    },
    Failure {
        /// Resolved path, raw identifier, or nothing (resolution failed)
        image_path: Option<String>,
        failure: StageFailure,
    },
}

/// Orchestrates the upload-and-classify pipeline over its three
/// collaborator capabilities
pub struct ClassifyOrchestrator {
    upload: Arc<dyn UploadService>,
    classifier: Arc<dyn ClassificationApi>,
    store: Arc<dyn AnalysisLogStore>,
}

impl ClassifyOrchestrator {
    pub fn new(
        upload: Arc<dyn UploadService>,
        classifier: Arc<dyn ClassificationApi>,
        store: Arc<dyn AnalysisLogStore>,
    ) -> Self {
        Self {
            upload,
            classifier,
            store,
        }
    }

    /// Run the full pipeline for one file identifier
    ///
    /// Never fails outward: every internal failure becomes a structured
    /// outcome. The audit record is written before returning, except when
    /// persistence itself fails; then the persistence failure is reported
    /// instead and the classification outcome survives only in the logs.
    pub async fn process(&self, file_name: &str) -> ClassifyOutcome {
        let requested_at = Utc::now();
        tracing::info!(file_name, "Starting upload-and-classify pipeline");

        let branch = self.run_stages(file_name).await;
        let responded_at = Utc::now();

        let (attempt, outcome) = match branch {
            Branch::Success {
                path,
                message,
                class,
                confidence,
            } => {
                let uploaded_path = path.as_str().to_string();
                let attempt = AnalysisAttempt::success_record(
                    path,
                    message,
                    class,
                    confidence,
                    requested_at,
                    responded_at,
                );
                let confidence = confidence.unwrap_or_else(Confidence::zero);
                let outcome = ClassifyOutcome {
                    success: true,
                    message: "Image classification completed".to_string(),
                    timestamp: responded_at.to_rfc3339(),
                    error_code: None,
                    error_name: None,
                    user_message: None,
                    recommended_actions: None,
                    data: Some(ClassifyData {
                        class,
                        confidence: confidence.value(),
                        uploaded_path,
                        requires_confirmation: confidence.needs_confirmation(),
                    }),
                };
                (attempt, outcome)
            }
            Branch::Failure {
                image_path,
                failure,
            } => {
                tracing::warn!(
                    file_name,
                    error = %failure.audit_message(),
                    "Pipeline stage failed"
                );
                let attempt = AnalysisAttempt::failure_record(
                    image_path,
                    failure.audit_message(),
                    requested_at,
                    responded_at,
                );
                let outcome = failure_outcome(&failure, responded_at);
                (attempt, outcome)
            }
        };

        match self.store.save(attempt).await {
            Ok(saved) => {
                tracing::info!(id = ?saved.id, success = saved.success, "Analysis attempt persisted");
                outcome
            }
            Err(e) => {
                // The attempt record is lost; the caller learns about the
                // persistence failure, the classification outcome only
                // survives in this log line.
                tracing::error!(
                    error = %e,
                    classification_success = outcome.success,
                    classification_message = %outcome.message,
                    "Failed to persist analysis attempt"
                );
                let failure = StageFailure::coded(
                    codes::INTERNAL_ERROR,
                    format!("failed to persist analysis attempt: {e}"),
                );
                failure_outcome(&failure, Utc::now())
            }
        }
    }

    /// Most recent attempts for the audit listing
    pub async fn recent_attempts(&self, limit: u32) -> Result<Vec<AnalysisAttempt>, StoreError> {
        self.store.find_recent(limit).await
    }

    /// Stages 1-5: everything up to record construction
    async fn run_stages(&self, file_name: &str) -> Branch {
        if let Err(failure) = validate_file_name(file_name) {
            return Branch::Failure {
                image_path: Some(file_name.to_string()),
                failure,
            };
        }

        let raw_path = match self.upload.upload_file(file_name).await {
            Ok(path) => path,
            // The identifier never resolved; it is preserved in the audit
            // message, not as the record's path.
            Err(e) => {
                return Branch::Failure {
                    image_path: None,
                    failure: StageFailure::coded(e.code(), e.to_string()),
                }
            }
        };

        let path = match ImagePath::parse(&raw_path) {
            Ok(path) => path,
            // The path did resolve; keep it so the audit trail shows what
            // the resolver produced.
            Err(e) => {
                return Branch::Failure {
                    image_path: Some(raw_path),
                    failure: StageFailure::coded(e.code(), e.to_string()),
                }
            }
        };

        let result = match self.classifier.classify(path.as_str()).await {
            Ok(result) => result,
            Err(e) => {
                return Branch::Failure {
                    image_path: Some(path.into_string()),
                    failure: StageFailure::coded(e.code(), e.to_string()),
                }
            }
        };

        if !result.success {
            return Branch::Failure {
                image_path: Some(path.into_string()),
                failure: StageFailure::Remote {
                    message: result.message,
                },
            };
        }

        let confidence = match result
            .estimated_data
            .confidence
            .map(Confidence::new)
            .transpose()
        {
            Ok(confidence) => confidence,
            Err(e) => {
                return Branch::Failure {
                    image_path: Some(path.into_string()),
                    failure: StageFailure::coded(
                        codes::INTERNAL_ERROR,
                        format!("classifier returned invalid confidence: {e}"),
                    ),
                }
            }
        };

        Branch::Success {
            path,
            message: result.message,
            class: result.estimated_data.class,
            confidence,
        }
    }
}

/// Identifier validation, applied before resolution is attempted
fn validate_file_name(file_name: &str) -> Result<(), StageFailure> {
    if file_name.trim().is_empty() {
        return Err(StageFailure::coded(
            codes::INVALID_PARAMETER,
            "file name is empty",
        ));
    }
    if file_name.chars().count() > MAX_FILE_NAME_LEN {
        return Err(StageFailure::coded(
            codes::PATH_TOO_LONG,
            format!("file name exceeds {MAX_FILE_NAME_LEN} characters"),
        ));
    }
    let lower = file_name.to_ascii_lowercase();
    if !ALLOWED_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
    {
        return Err(StageFailure::coded(
            codes::UNSUPPORTED_EXTENSION,
            format!("unsupported file extension on '{file_name}'"),
        ));
    }
    Ok(())
}

/// Build the failure response: full descriptor when the code is known,
/// otherwise just the raw message (degraded, never fabricated)
fn failure_outcome(failure: &StageFailure, responded_at: DateTime<Utc>) -> ClassifyOutcome {
    let message = failure.audit_message();
    let descriptor = failure
        .error_code()
        .and_then(|code| catalog::lookup(&code));

    match descriptor {
        Some(d) => ClassifyOutcome {
            success: false,
            message,
            timestamp: responded_at.to_rfc3339(),
            error_code: Some(d.code.to_string()),
            error_name: Some(d.name.to_string()),
            user_message: Some(d.user_message.to_string()),
            recommended_actions: Some(
                d.recommended_actions.iter().map(|s| s.to_string()).collect(),
            ),
            data: None,
        },
        None => ClassifyOutcome {
            success: false,
            message,
            timestamp: responded_at.to_rfc3339(),
            error_code: None,
            error_name: None,
            user_message: None,
            recommended_actions: None,
            data: None,
        },
    }
}
