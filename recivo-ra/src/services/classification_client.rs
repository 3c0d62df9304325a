//! Remote classification API client
//!
//! The classifier reports business-level rejection inside a 200 response
//! (`success: false` with an `Error:<code>` message), so this client only
//! fails on transport problems: timeout, connection failure, non-2xx
//! status, or an undecodable body.

use async_trait::async_trait;
use recivo_common::catalog::codes;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Transport-level failures; business rejection is not an error here
#[derive(Debug, Error)]
pub enum ClassificationApiError {
    /// The call did not complete within the configured deadline
    #[error("classification request timed out")]
    Timeout,

    /// Could not reach the classification service
    #[error("failed to reach classification service: {0}")]
    Connection(String),

    /// The service answered with a non-success HTTP status
    #[error("classification service returned status {0}: {1}")]
    Status(u16, String),

    /// The response body was not a valid classification result
    #[error("failed to parse classification response: {0}")]
    Parse(String),
}

impl ClassificationApiError {
    /// Fixed catalog code for this transport failure
    pub fn code(&self) -> &'static str {
        match self {
            ClassificationApiError::Timeout => codes::PROCESSING_TIMEOUT,
            ClassificationApiError::Connection(_) | ClassificationApiError::Status(..) => {
                codes::UPSTREAM_CONNECTION_FAILED
            }
            ClassificationApiError::Parse(_) => codes::INTERNAL_ERROR,
        }
    }
}

/// Request body for the classification endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationRequest {
    pub image_path: String,
}

/// Structured classification result
///
/// `success: false` carries the rejection reason in `message`, typically
/// with an embedded `Error:<code>` marker.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassificationResult {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub estimated_data: EstimatedData,
}

/// Classification payload, only populated on success
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EstimatedData {
    /// Receipt class id
    pub class: Option<i64>,
    /// Self-reported certainty in [0, 1]
    pub confidence: Option<f64>,
}

/// Remote classification capability consumed by the pipeline
#[async_trait]
pub trait ClassificationApi: Send + Sync {
    /// Classify the image at the given storage path
    async fn classify(
        &self,
        image_path: &str,
    ) -> Result<ClassificationResult, ClassificationApiError>;
}

/// HTTP client for the classification API
pub struct ClassificationApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ClassificationApiClient {
    /// Build a client with the given base URL and per-call deadline
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClassificationApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClassificationApiError::Connection(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ClassificationApi for ClassificationApiClient {
    async fn classify(
        &self,
        image_path: &str,
    ) -> Result<ClassificationResult, ClassificationApiError> {
        let url = format!("{}/api/v1/classify", self.base_url);

        tracing::debug!(image_path, url = %url, "Calling classification API");

        let response = self
            .http_client
            .post(&url)
            .json(&ClassificationRequest {
                image_path: image_path.to_string(),
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassificationApiError::Timeout
                } else {
                    ClassificationApiError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassificationApiError::Status(status.as_u16(), body));
        }

        let result: ClassificationResult = response
            .json()
            .await
            .map_err(|e| ClassificationApiError::Parse(e.to_string()))?;

        tracing::info!(
            image_path,
            success = result.success,
            class = ?result.estimated_data.class,
            confidence = ?result.estimated_data.confidence,
            "Classification API responded"
        );

        Ok(result)
    }
}
