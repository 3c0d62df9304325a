//! Classifier confidence score with derived level and confirmation decision

use thiserror::Error;

/// Scores below this require user confirmation before the result is used.
///
/// Product threshold, intentionally independent of the level boundaries:
/// callers must use [`Confidence::needs_confirmation`] rather than derive
/// the decision from [`ConfidenceLevel`].
pub const CONFIRMATION_THRESHOLD: f64 = 0.85;

/// Confidence construction failure
#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum ConfidenceError {
    #[error("confidence must be between 0 and 1 (got {0})")]
    OutOfRange(f64),
}

/// Discrete confidence bands for display purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
    VeryLow,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::VeryLow => "very-low",
        }
    }
}

/// A classifier confidence score, guaranteed to be in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Confidence(f64);

impl Confidence {
    /// Validate and wrap a raw score; range is checked here and nowhere else
    pub fn new(score: f64) -> Result<Self, ConfidenceError> {
        if !(0.0..=1.0).contains(&score) {
            return Err(ConfidenceError::OutOfRange(score));
        }
        Ok(Self(score))
    }

    /// The zero score, used when the classifier omits a confidence value
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Discrete band: >= 0.85 high, >= 0.70 medium, >= 0.50 low, else very-low
    pub fn level(&self) -> ConfidenceLevel {
        if self.0 >= 0.85 {
            ConfidenceLevel::High
        } else if self.0 >= 0.70 {
            ConfidenceLevel::Medium
        } else if self.0 >= 0.50 {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::VeryLow
        }
    }

    /// Whether the user must confirm the classification result
    pub fn needs_confirmation(&self) -> bool {
        self.0 < CONFIRMATION_THRESHOLD
    }
}
