//! Free-text personality classification.
//!
//! Text is normalized by [`clean::clean_text`], vectorized with a frozen
//! [`tfidf::TfidfVectorizer`] and scored by four independent
//! [`logistic::LogisticModel`]s, one per dimension. The vectorizer and models
//! travel together in a [`artifact::ClassifierArtifact`] produced by the
//! offline trainer.

pub mod artifact;
pub mod classifier;
pub mod clean;
pub mod logistic;
pub mod tfidf;

pub use artifact::{ArtifactMetadata, ClassifierArtifact};
pub use classifier::{ArtifactClassifier, DimensionPrediction, TextClassifier, TextPrediction};
pub use clean::clean_text;
pub use logistic::{LogisticModel, LogisticOptions};
pub use tfidf::{FeatureVector, FitOptions, TfidfVectorizer};
