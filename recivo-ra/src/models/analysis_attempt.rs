//! Immutable audit record for one classification attempt
//!
//! Every call into the pipeline produces exactly one of these, success or
//! failure, and it is persisted before the response is returned. Records
//! are never mutated or deleted by this service; retention is an external
//! concern.

use crate::models::{Confidence, ImagePath};
use chrono::{DateTime, Utc};

/// One end-to-end classification attempt
///
/// Field rules:
/// - `image_path` holds the resolved storage path when resolution
///   succeeded, otherwise the raw identifier (never both); `None` when the
///   identifier did not resolve at all.
/// - `class_label` and `confidence` are only present on success.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisAttempt {
    /// Assigned by the store on insert; `None` before persistence
    pub id: Option<i64>,
    pub image_path: Option<String>,
    pub success: bool,
    pub message: Option<String>,
    pub class_label: Option<i64>,
    pub confidence: Option<f64>,
    pub requested_at: DateTime<Utc>,
    pub responded_at: DateTime<Utc>,
}

impl AnalysisAttempt {
    /// Record for a successful classification; requires a validated path
    pub fn success_record(
        image_path: ImagePath,
        message: String,
        class_label: Option<i64>,
        confidence: Option<Confidence>,
        requested_at: DateTime<Utc>,
        responded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            image_path: Some(image_path.into_string()),
            success: true,
            message: Some(message),
            class_label,
            confidence: confidence.map(|c| c.value()),
            requested_at,
            responded_at,
        }
    }

    /// Record for a failed attempt
    ///
    /// `image_path` is the resolved path when resolution succeeded before
    /// the failure, the raw identifier when validation failed before
    /// resolution, or `None` when resolution itself failed. Class and
    /// confidence are always absent on failure.
    pub fn failure_record(
        image_path: Option<String>,
        message: String,
        requested_at: DateTime<Utc>,
        responded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            image_path,
            success: false,
            message: Some(message),
            class_label: None,
            confidence: None,
            requested_at,
            responded_at,
        }
    }

    /// Display band for the stored confidence, or "none" when absent
    pub fn confidence_level(&self) -> &'static str {
        self.confidence
            .and_then(|v| Confidence::new(v).ok())
            .map(|c| c.level().as_str())
            .unwrap_or("none")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timestamps() -> (DateTime<Utc>, DateTime<Utc>) {
        let requested = Utc::now();
        let responded = requested + chrono::Duration::milliseconds(120);
        (requested, responded)
    }

    #[test]
    fn success_record_carries_classification_fields() {
        let (requested, responded) = timestamps();
        let path = ImagePath::parse("/image/abc/receipt.jpg").unwrap();
        let confidence = Confidence::new(0.9234).unwrap();

        let attempt = AnalysisAttempt::success_record(
            path,
            "success".to_string(),
            Some(2),
            Some(confidence),
            requested,
            responded,
        );

        assert!(attempt.success);
        assert_eq!(attempt.id, None);
        assert_eq!(attempt.image_path.as_deref(), Some("/image/abc/receipt.jpg"));
        assert_eq!(attempt.class_label, Some(2));
        assert_eq!(attempt.confidence, Some(0.9234));
        assert_eq!(attempt.confidence_level(), "high");
        assert!(attempt.responded_at >= attempt.requested_at);
    }

    #[test]
    fn failure_record_never_carries_classification_fields() {
        let (requested, responded) = timestamps();

        let attempt = AnalysisAttempt::failure_record(
            Some("receipt.jpg".to_string()),
            "Error:E40001 - file name is empty".to_string(),
            requested,
            responded,
        );

        assert!(!attempt.success);
        assert_eq!(attempt.class_label, None);
        assert_eq!(attempt.confidence, None);
        assert_eq!(attempt.confidence_level(), "none");
    }

    #[test]
    fn failure_record_allows_absent_path() {
        let (requested, responded) = timestamps();
        let attempt = AnalysisAttempt::failure_record(
            None,
            "Error:E40004 - no stored image".to_string(),
            requested,
            responded,
        );
        assert_eq!(attempt.image_path, None);
    }
}
