//! # EchoType
//!
//! MBTI personality typing from a 1-5 Likert questionnaire, optionally
//! blended with a TF-IDF + logistic regression reading of free-form text.
//!
//! The questionnaire yields a score in [0, 1] per dimension (1.0 = fully the
//! first-named trait: I, N, T, J). When the respondent supplies at least 50
//! characters of text, the text classifier's per-dimension affinities are
//! mixed in (70% quiz, 30% text by default) before thresholding into one of
//! the 16 types.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod descriptions;
pub mod dimension;
pub mod error;
pub mod fusion;
pub mod predictor;
pub mod scorer;
pub mod server;
pub mod text;
pub mod training;

pub use catalog::{Polarity, Question, QuestionCatalog, QuestionSet, TestVariant};
pub use config::Config;
pub use dimension::{Dimension, PerDimension, PersonalityType, ScoreVector};
pub use error::{Error, Result};
pub use fusion::{fuse, Fusion};
pub use predictor::{FusionSettings, Prediction, Predictor};
pub use scorer::{score, AnswerSequence};
pub use text::{
    ArtifactClassifier, ClassifierArtifact, DimensionPrediction, TextClassifier, TextPrediction,
};

/// Crate version reported by the health endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
