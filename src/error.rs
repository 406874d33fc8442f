//! Error types for echotype.

use std::path::PathBuf;

use thiserror::Error;

use crate::dimension::Dimension;

/// Top-level error type for scoring, classification, training and serving.
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown test variant name.
    #[error("Invalid test type '{0}'. Use \"short\" or \"full\"")]
    InvalidVariant(String),

    /// Answer sequence length does not match the variant's question count.
    #[error("Expected {expected} answers for the {variant} test, got {actual}")]
    AnswerCountMismatch {
        variant: String,
        expected: usize,
        actual: usize,
    },

    /// An answer outside 1..=5 or not an integer.
    #[error("Answer #{} must be an integer between 1 and 5, got {value}", .position + 1)]
    InvalidAnswerValue { position: usize, value: String },

    /// A dimension has no questions for a variant.
    #[error("Catalog has no {dimension} questions for the {variant} test")]
    EmptyDimension {
        dimension: Dimension,
        variant: String,
    },

    /// Text had no usable words left after cleaning.
    #[error("Text contains no usable words after cleaning")]
    EmptyNormalizedText,

    /// Fusion weight outside [0, 1].
    #[error("Quiz weight must lie in [0, 1], got {0}")]
    InvalidWeight(f64),

    /// Classifier artifact missing or corrupt.
    #[error("Failed to load classifier artifact {}: {reason}", .path.display())]
    ArtifactLoad { path: PathBuf, reason: String },

    /// Question catalog malformed.
    #[error("Failed to load question catalog: {0}")]
    CatalogLoad(String),

    /// Configuration file unreadable or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A training record carries a label that is not a 4-letter type.
    #[error("Invalid personality type label '{0}'")]
    InvalidLabel(String),

    /// Offline training could not proceed.
    #[error("Training failed: {0}")]
    Training(String),

    /// Unexpected failure inside a pipeline stage.
    #[error("{stage} failed: {message}")]
    Inference {
        stage: &'static str,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Errors caused by the request itself rather than the service.
    ///
    /// These are reported back to the caller and never retried.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidVariant(_)
                | Error::AnswerCountMismatch { .. }
                | Error::InvalidAnswerValue { .. }
                | Error::InvalidWeight(_)
                | Error::EmptyNormalizedText
        )
    }
}

/// Result type alias for echotype operations.
pub type Result<T> = std::result::Result<T, Error>;
