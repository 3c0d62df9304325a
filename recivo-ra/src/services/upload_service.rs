//! Upload resolution: file name to storage path
//!
//! The real storage backend (S3 or similar) is owned by another team; the
//! pipeline only depends on the [`UploadService`] capability. The bundled
//! [`MockUploadService`] resolves against a fixed mapping table so the
//! service runs end-to-end without external storage.

use async_trait::async_trait;
use recivo_common::catalog::codes;
use thiserror::Error;

/// Upload resolution errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UploadError {
    /// No stored object exists for the given file name
    #[error("no stored image for file name: {0}")]
    NotFound(String),
}

impl UploadError {
    /// Catalog code for this failure
    pub fn code(&self) -> &'static str {
        match self {
            UploadError::NotFound(_) => codes::FILE_NOT_FOUND,
        }
    }
}

/// Storage resolution capability consumed by the pipeline
#[async_trait]
pub trait UploadService: Send + Sync {
    /// Resolve a file name to its storage path
    async fn upload_file(&self, file_name: &str) -> Result<String, UploadError>;
}

/// File name to storage path mapping used by the mock resolver
const FILE_NAME_TO_PATH: &[(&str, &str)] = &[
    // well-formed receipts
    (
        "taxi_receipt.jpg",
        "/image/a1b2c3d4e5f6g7h8i9j0/k1l2m3n4o5p6q7r8s/taxi_receipt.jpg",
    ),
    (
        "hotel_invoice.jpg",
        "/image/b2c3d4e5f6g7h8i9j0k1/l2m3n4o5p6q7r8s9t/hotel_invoice.jpg",
    ),
    (
        "convenience_receipt.jpg",
        "/image/c3d4e5f6g7h8i9j0k1l2/m3n4o5p6q7r8s9t0u/convenience_receipt.jpg",
    ),
    (
        "restaurant_bill.jpg",
        "/image/d4e5f6g7h8i9j0k1l2m3/n4o5p6q7r8s9t0u1v/restaurant_bill.jpg",
    ),
    (
        "parking_receipt.jpg",
        "/image/e5f6g7h8i9j0k1l2m3n4/o5p6q7r8s9t0u1v2w/parking_receipt.jpg",
    ),
    // images the classifier rejects
    (
        "error_corrupted.jpg",
        "/image/f6g7h8i9j0k1l2m3n4o5/p6q7r8s9t0u1v2w3x/error_corrupted.jpg",
    ),
    (
        "error_too_small.jpg",
        "/image/g7h8i9j0k1l2m3n4o5p6/q7r8s9t0u1v2w3x4y/error_too_small.jpg",
    ),
    (
        "error_no_receipt.jpg",
        "/image/h8i9j0k1l2m3n4o5p6q7/r8s9t0u1v2w3x4y5z/error_no_receipt.jpg",
    ),
    (
        "error_unreadable.jpg",
        "/image/i9j0k1l2m3n4o5p6q7r8/s9t0u1v2w3x4y5z6a/error_unreadable.jpg",
    ),
    (
        "error_blurry.jpg",
        "/image/j0k1l2m3n4o5p6q7r8s9/t0u1v2w3x4y5z6a7b/error_blurry.jpg",
    ),
    (
        "error_multiple.jpg",
        "/image/k1l2m3n4o5p6q7r8s9t0/u1v2w3x4y5z6a7b8c/error_multiple.jpg",
    ),
    (
        "error_timeout.jpg",
        "/image/l2m3n4o5p6q7r8s9t0u1/v2w3x4y5z6a7b8c9d/error_timeout.jpg",
    ),
];

/// Mock upload resolver backed by the static mapping table
#[derive(Debug, Clone, Default)]
pub struct MockUploadService;

impl MockUploadService {
    pub fn new() -> Self {
        Self
    }

    /// File names the mock resolver accepts
    pub fn available_file_names() -> Vec<&'static str> {
        FILE_NAME_TO_PATH.iter().map(|(name, _)| *name).collect()
    }
}

#[async_trait]
impl UploadService for MockUploadService {
    async fn upload_file(&self, file_name: &str) -> Result<String, UploadError> {
        let path = FILE_NAME_TO_PATH
            .iter()
            .find(|(name, _)| *name == file_name)
            .map(|(_, path)| (*path).to_string())
            .ok_or_else(|| UploadError::NotFound(file_name.to_string()))?;

        tracing::debug!(file_name, path = %path, "Resolved upload path");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImagePath;

    #[tokio::test]
    async fn resolves_known_file_name() {
        let service = MockUploadService::new();
        let path = service.upload_file("taxi_receipt.jpg").await.unwrap();
        assert_eq!(
            path,
            "/image/a1b2c3d4e5f6g7h8i9j0/k1l2m3n4o5p6q7r8s/taxi_receipt.jpg"
        );
    }

    #[tokio::test]
    async fn unknown_file_name_is_not_found() {
        let service = MockUploadService::new();
        let err = service.upload_file("nope.jpg").await.unwrap_err();
        assert_eq!(err, UploadError::NotFound("nope.jpg".to_string()));
        assert_eq!(err.code(), "E40004");
    }

    #[test]
    fn every_mapped_path_passes_format_validation() {
        for (name, path) in FILE_NAME_TO_PATH {
            assert!(
                ImagePath::parse(path).is_ok(),
                "mapping for {name} produces an invalid path"
            );
        }
    }

    #[test]
    fn available_file_names_lists_the_table() {
        let names = MockUploadService::available_file_names();
        assert!(names.contains(&"taxi_receipt.jpg"));
        assert_eq!(names.len(), FILE_NAME_TO_PATH.len());
    }
}
