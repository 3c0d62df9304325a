//! Domain models for receipt analysis

pub mod analysis_attempt;
pub mod confidence;
pub mod image_path;

pub use analysis_attempt::AnalysisAttempt;
pub use confidence::{Confidence, ConfidenceError, ConfidenceLevel};
pub use image_path::{ImagePath, PathError};
