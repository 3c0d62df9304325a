//! Pipeline services for recivo-ra

pub mod analysis_log_store;
pub mod classification_client;
pub mod classify_orchestrator;
pub mod upload_service;

pub use analysis_log_store::{AnalysisLogStore, SqliteAnalysisLogStore, StoreError};
pub use classification_client::{
    ClassificationApi, ClassificationApiClient, ClassificationApiError, ClassificationResult,
    EstimatedData,
};
pub use classify_orchestrator::{ClassifyData, ClassifyOrchestrator, ClassifyOutcome};
pub use upload_service::{MockUploadService, UploadError, UploadService};
