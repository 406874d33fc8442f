//! Text classifier seam and its artifact-backed implementation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::artifact::ClassifierArtifact;
use super::clean::clean_text;
use crate::dimension::{Dimension, PerDimension, PersonalityType, ScoreVector};
use crate::error::{Error, Result};

/// Letter and confidence predicted for one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionPrediction {
    pub letter: char,
    /// Probability mass of the predicted letter.
    pub confidence: f64,
}

impl DimensionPrediction {
    /// Affinity toward the first-named trait of `dimension`.
    pub fn affinity(&self, dimension: Dimension) -> f64 {
        if self.letter == dimension.first_letter() {
            self.confidence
        } else {
            1.0 - self.confidence
        }
    }
}

/// Per-dimension output of a text classifier.
pub type TextPrediction = PerDimension<DimensionPrediction>;

impl TextPrediction {
    /// The type formed by the predicted letters.
    ///
    /// A first-trait letter always carries confidence above 0.5, so
    /// thresholding the affinities reproduces the predicted letters.
    pub fn personality_type(&self) -> PersonalityType {
        PersonalityType::from_scores(&self.affinities())
    }

    /// Convert to the quiz's `[0, 1]` first-trait scale.
    pub fn affinities(&self) -> ScoreVector {
        self.map(|dimension, prediction| prediction.affinity(dimension))
    }
}

/// Anything that can turn free text into per-dimension predictions.
pub trait TextClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<TextPrediction>;
}

/// Classifier backed by a trained [`ClassifierArtifact`].
#[derive(Debug, Clone)]
pub struct ArtifactClassifier {
    artifact: ClassifierArtifact,
}

impl ArtifactClassifier {
    pub fn new(artifact: ClassifierArtifact) -> Self {
        Self { artifact }
    }

    pub fn artifact(&self) -> &ClassifierArtifact {
        &self.artifact
    }
}

impl TextClassifier for ArtifactClassifier {
    fn classify(&self, text: &str) -> Result<TextPrediction> {
        let cleaned = clean_text(text);
        if cleaned.is_empty() {
            return Err(Error::EmptyNormalizedText);
        }

        let features = self.artifact.vectorizer().transform(&cleaned);
        debug!(
            tokens = cleaned.split(' ').count(),
            active_features = features.entries().len(),
            "text vectorized"
        );

        let prediction = self.artifact.classifiers().map(|dimension, model| {
            let outcome = model.predict(&features);
            DimensionPrediction {
                letter: if outcome.class == 1 {
                    dimension.first_letter()
                } else {
                    dimension.second_letter()
                },
                confidence: outcome.confidence(),
            }
        });
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::artifact::ArtifactMetadata;
    use crate::text::logistic::LogisticModel;
    use crate::text::tfidf::TfidfVectorizer;
    use std::collections::BTreeMap;

    fn classifier() -> ArtifactClassifier {
        let vocabulary: BTreeMap<String, usize> = [
            ("analysis".to_string(), 0),
            ("feelings".to_string(), 1),
            ("people".to_string(), 2),
        ]
        .into();
        let vectorizer = TfidfVectorizer::from_parts(vocabulary, vec![1.0, 1.0, 1.0], 2).unwrap();
        let classifiers = PerDimension {
            energy: LogisticModel::new(vec![1.0, 0.0, -4.0], 0.0),
            information: LogisticModel::new(vec![2.0, 0.0, 0.0], 0.0),
            decision: LogisticModel::new(vec![3.0, -3.0, 0.0], 0.0),
            lifestyle: LogisticModel::new(vec![0.0, 0.0, 0.0], 0.5),
        };
        let artifact =
            ClassifierArtifact::new(vectorizer, classifiers, ArtifactMetadata::default()).unwrap();
        ArtifactClassifier::new(artifact)
    }

    #[test]
    fn test_letters_and_confidences() {
        let prediction = classifier()
            .classify("I love ANALYSIS, and more analysis! https://x.y/z")
            .unwrap();
        assert_eq!(prediction.energy.letter, 'I');
        assert_eq!(prediction.information.letter, 'N');
        assert_eq!(prediction.decision.letter, 'T');
        assert_eq!(prediction.lifestyle.letter, 'J');
        for (_, p) in prediction.iter() {
            assert!(p.confidence > 0.5 && p.confidence <= 1.0);
        }
        assert_eq!(prediction.personality_type().to_string(), "INTJ");
    }

    #[test]
    fn test_second_letter_confidence_is_class_zero_mass() {
        let prediction = classifier().classify("people people feelings").unwrap();
        assert_eq!(prediction.energy.letter, 'E');
        assert_eq!(prediction.decision.letter, 'F');
        assert!(prediction.energy.confidence > 0.5);
        assert!(prediction.energy.affinity(Dimension::Energy) < 0.5);
    }

    #[test]
    fn test_zero_vector_tie_resolves_to_second_letter() {
        // Known stop-word-free text with no vocabulary hits: decision is 0.
        let prediction = classifier().classify("zebra quantum").unwrap();
        assert_eq!(prediction.information.letter, 'S');
        assert_eq!(prediction.information.confidence, 0.5);
    }

    #[test]
    fn test_empty_after_cleaning_is_rejected() {
        let err = classifier().classify("12345 !!! the and of").unwrap_err();
        assert!(matches!(err, Error::EmptyNormalizedText));
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = classifier();
        let text = "Deep analysis of people and their feelings, every single day.";
        let first = classifier.classify(text).unwrap();
        let second = classifier.classify(text).unwrap();
        for dimension in Dimension::ALL {
            assert_eq!(first.get(dimension).letter, second.get(dimension).letter);
            assert_eq!(
                first.get(dimension).confidence.to_bits(),
                second.get(dimension).confidence.to_bits()
            );
        }
    }

    #[test]
    fn test_artifact_from_json_classifies() {
        let json = serde_json::to_string(classifier().artifact()).unwrap();
        let artifact: ClassifierArtifact = serde_json::from_str(&json).unwrap();
        let prediction = ArtifactClassifier::new(artifact)
            .classify("analysis analysis analysis")
            .unwrap();
        assert_eq!(prediction.decision.letter, 'T');
    }

    #[test]
    fn test_mismatched_artifact_never_reaches_classify() {
        let mut json = serde_json::to_value(classifier().artifact()).unwrap();
        json["classifiers"]["I-E"]["weights"] = serde_json::json!([]);
        assert!(serde_json::from_value::<ClassifierArtifact>(json).is_err());
    }

    #[test]
    fn test_affinities_use_first_trait_scale() {
        let prediction = TextPrediction {
            energy: DimensionPrediction { letter: 'I', confidence: 0.8 },
            information: DimensionPrediction { letter: 'S', confidence: 0.75 },
            decision: DimensionPrediction { letter: 'T', confidence: 0.5 },
            lifestyle: DimensionPrediction { letter: 'P', confidence: 1.0 },
        };
        let scores = prediction.affinities();
        assert_eq!(scores.energy, 0.8);
        assert_eq!(scores.information, 0.25);
        assert_eq!(scores.decision, 0.5);
        assert_eq!(scores.lifestyle, 0.0);
    }
}
