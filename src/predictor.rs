//! Request-level prediction: score the quiz, gate and classify the text,
//! fuse both.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use echotype::{ArtifactClassifier, ClassifierArtifact, Predictor, QuestionCatalog};
//!
//! let catalog = QuestionCatalog::builtin()?;
//! let artifact = ClassifierArtifact::load("models/echotype_classifier.json")?;
//! let predictor = Predictor::new(
//!     Arc::new(catalog),
//!     Arc::new(ArtifactClassifier::new(artifact)),
//!     Default::default(),
//! )?;
//!
//! let prediction = predictor.predict(&[3; 20], "short", None)?;
//! println!("{}", prediction.personality_type); // "ESFP"
//! # Ok::<(), echotype::Error>(())
//! ```

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::QuestionCatalog;
use crate::dimension::{Dimension, PerDimension, PersonalityType, ScoreVector};
use crate::error::{Error, Result};
use crate::fusion::{self, DEFAULT_QUIZ_WEIGHT};
use crate::scorer::AnswerSequence;
use crate::text::{TextClassifier, TextPrediction};

/// Minimum trimmed length, in characters, for text to be considered.
pub const MIN_TEXT_CHARS: usize = 50;

/// Fusion policy applied to every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionSettings {
    pub quiz_weight: f64,
    pub min_text_chars: usize,
}

impl Default for FusionSettings {
    fn default() -> Self {
        Self {
            quiz_weight: DEFAULT_QUIZ_WEIGHT,
            min_text_chars: MIN_TEXT_CHARS,
        }
    }
}

/// Whether `text` is long enough to be classified.
pub fn text_is_usable(text: Option<&str>, min_chars: usize) -> bool {
    text.map(|t| t.trim().chars().count() >= min_chars)
        .unwrap_or(false)
}

/// Outcome of one dimension after fusion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DimensionOutcome {
    pub name: &'static str,
    pub score: f64,
    #[serde(rename = "trait")]
    pub letter: char,
}

/// Result of a prediction request.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub personality_type: PersonalityType,
    /// Fused scores (equal to `quiz_scores` when text was not used).
    pub scores: ScoreVector,
    pub quiz_scores: ScoreVector,
    /// Classifier output, present only when text was used.
    pub text: Option<TextPrediction>,
}

impl Prediction {
    pub fn text_used(&self) -> bool {
        self.text.is_some()
    }

    pub fn dimensions(&self) -> PerDimension<DimensionOutcome> {
        self.scores.map(|dimension, &score| DimensionOutcome {
            name: dimension.display_name(),
            score,
            letter: self.personality_type.letter(dimension),
        })
    }

    pub fn letter(&self, dimension: Dimension) -> char {
        self.personality_type.letter(dimension)
    }
}

/// Shared, read-only prediction service.
///
/// Catalog and classifier are injected so tests and alternative front ends can
/// substitute their own.
#[derive(Clone)]
pub struct Predictor {
    catalog: Arc<QuestionCatalog>,
    classifier: Arc<dyn TextClassifier>,
    settings: FusionSettings,
}

impl Predictor {
    pub fn new(
        catalog: Arc<QuestionCatalog>,
        classifier: Arc<dyn TextClassifier>,
        settings: FusionSettings,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&settings.quiz_weight) {
            return Err(Error::InvalidWeight(settings.quiz_weight));
        }
        Ok(Self {
            catalog,
            classifier,
            settings,
        })
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> FusionSettings {
        self.settings
    }

    /// Predict a type from answers and optional text.
    ///
    /// Text shorter than `min_text_chars` after trimming is treated as absent.
    /// [`Error::EmptyNormalizedText`] is returned when usable-length text has
    /// no content words; callers may retry with `text = None`.
    pub fn predict(&self, answers: &[i64], variant: &str, text: Option<&str>) -> Result<Prediction> {
        let set = self.catalog.set(variant.parse()?);
        let quiz_scores = AnswerSequence::new(set, answers)
            .and_then(|sequence| sequence.score())
            .map_err(in_stage("questionnaire scoring"))?;

        let text_prediction = if text_is_usable(text, self.settings.min_text_chars) {
            let text = text.unwrap_or_default();
            let prediction = self
                .classifier
                .classify(text)
                .map_err(in_stage("text classification"))?;
            Some(prediction)
        } else {
            None
        };

        let fusion = fusion::fuse(
            &quiz_scores,
            text_prediction.as_ref(),
            self.settings.quiz_weight,
        )
        .map_err(in_stage("fusion"))?;

        debug!(
            variant,
            personality_type = %fusion.personality_type,
            text_used = text_prediction.is_some(),
            "prediction complete"
        );

        Ok(Prediction {
            personality_type: fusion.personality_type,
            scores: fusion.scores,
            quiz_scores,
            text: text_prediction,
        })
    }

    /// Like [`Predictor::predict`], but text that cleans down to nothing is
    /// dropped with a warning and the quiz answers alone decide.
    pub fn predict_lenient(
        &self,
        answers: &[i64],
        variant: &str,
        text: Option<&str>,
    ) -> Result<Prediction> {
        match self.predict(answers, variant, text) {
            Err(Error::EmptyNormalizedText) => {
                warn!("text has no usable words after cleaning, using quiz answers only");
                self.predict(answers, variant, None)
            }
            other => other,
        }
    }
}

/// Wrap service-side failures so they name the stage that produced them.
/// Caller errors pass through untouched.
fn in_stage(stage: &'static str) -> impl Fn(Error) -> Error {
    move |e| match e {
        e if e.is_caller_error() => e,
        e @ Error::Inference { .. } => e,
        e => Error::Inference {
            stage,
            message: e.to_string(),
        },
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::text::DimensionPrediction;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Classifier that always predicts INTJ with fixed confidence and counts
    /// its calls.
    #[derive(Default)]
    pub(crate) struct FixedClassifier {
        pub(crate) calls: AtomicUsize,
    }

    impl TextClassifier for FixedClassifier {
        fn classify(&self, text: &str) -> Result<TextPrediction> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if crate::text::clean_text(text).is_empty() {
                return Err(Error::EmptyNormalizedText);
            }
            Ok(TextPrediction::from_fn(|d| DimensionPrediction {
                letter: d.first_letter(),
                confidence: 0.9,
            }))
        }
    }

    pub(crate) fn predictor_with(classifier: Arc<FixedClassifier>, quiz_weight: f64) -> Predictor {
        Predictor::new(
            Arc::new(QuestionCatalog::builtin().unwrap()),
            classifier,
            FusionSettings {
                quiz_weight,
                ..FusionSettings::default()
            },
        )
        .unwrap()
    }
}
