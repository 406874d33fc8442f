//! Binary logistic regression over TF-IDF features.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::tfidf::FeatureVector;
use crate::error::{Error, Result};

/// Mini-batch gradient descent settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticOptions {
    pub epochs: usize,
    pub learning_rate: f64,
    pub batch_size: usize,
    /// Inverse regularization strength; smaller means stronger L2 penalty.
    pub c: f64,
}

impl Default for LogisticOptions {
    fn default() -> Self {
        Self {
            epochs: 30,
            learning_rate: 1.0,
            batch_size: 64,
            c: 1.0,
        }
    }
}

/// `P(class = 1 | x) = sigmoid(w·x + b)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    weights: Vec<f64>,
    intercept: f64,
}

/// Predicted class with the probability of each class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryPrediction {
    pub class: u8,
    /// `[P(class = 0), P(class = 1)]`
    pub probabilities: [f64; 2],
}

impl BinaryPrediction {
    /// Probability mass of the predicted class.
    pub fn confidence(&self) -> f64 {
        self.probabilities[self.class as usize]
    }
}

impl LogisticModel {
    pub fn new(weights: Vec<f64>, intercept: f64) -> Self {
        Self { weights, intercept }
    }

    pub fn width(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn decision(&self, x: &FeatureVector) -> f64 {
        x.dot(&self.weights) + self.intercept
    }

    pub fn probability(&self, x: &FeatureVector) -> f64 {
        sigmoid(self.decision(x))
    }

    /// Class 1 when its probability is strictly above one half.
    pub fn predict(&self, x: &FeatureVector) -> BinaryPrediction {
        let p1 = self.probability(x);
        BinaryPrediction {
            class: u8::from(p1 > 0.5),
            probabilities: [1.0 - p1, p1],
        }
    }

    pub fn validate(&self, width: usize) -> std::result::Result<(), String> {
        if self.weights.len() != width {
            return Err(format!(
                "classifier has {} weights but the vectorizer produces {} features",
                self.weights.len(),
                width
            ));
        }
        if !self.intercept.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err("classifier parameters must be finite".into());
        }
        Ok(())
    }

    /// Fit by shuffled mini-batch gradient descent on mean log-loss plus an
    /// L2 penalty of `1 / (2 C N) * |w|^2`. The intercept is not penalized.
    pub fn fit<R: Rng>(
        samples: &[FeatureVector],
        labels: &[bool],
        options: &LogisticOptions,
        rng: &mut R,
    ) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::Training("no training samples".into()));
        }
        if samples.len() != labels.len() {
            return Err(Error::Training(format!(
                "{} samples but {} labels",
                samples.len(),
                labels.len()
            )));
        }
        if options.batch_size == 0 || options.c <= 0.0 || options.learning_rate <= 0.0 {
            return Err(Error::Training(
                "batch_size, c and learning_rate must be positive".into(),
            ));
        }

        let width = samples[0].width();
        let n = samples.len() as f64;
        let decay_rate = 1.0 / (options.c * n);
        let mut model = Self::new(vec![0.0; width], 0.0);
        let mut order: Vec<usize> = (0..samples.len()).collect();
        let mut gradient = vec![0.0; width];

        for _ in 0..options.epochs {
            order.shuffle(rng);
            for batch in order.chunks(options.batch_size) {
                gradient.iter_mut().for_each(|g| *g = 0.0);
                let mut intercept_gradient = 0.0;

                for &i in batch {
                    let target = if labels[i] { 1.0 } else { 0.0 };
                    let error = model.probability(&samples[i]) - target;
                    for &(j, v) in samples[i].entries() {
                        gradient[j] += error * v;
                    }
                    intercept_gradient += error;
                }

                let scale = options.learning_rate / batch.len() as f64;
                let shrink = 1.0 - options.learning_rate * decay_rate;
                for (w, g) in model.weights.iter_mut().zip(gradient.iter()) {
                    *w = *w * shrink - scale * g;
                }
                model.intercept -= scale * intercept_gradient;
            }
        }

        Ok(model)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tfidf::{FitOptions, TfidfVectorizer};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn toy_data() -> (TfidfVectorizer, Vec<FeatureVector>, Vec<bool>) {
        let docs: Vec<String> = [
            "logic analysis systems logic",
            "analysis logic reason",
            "systems reason logic",
            "feelings people warmth",
            "people warmth harmony",
            "harmony feelings people",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let labels = vec![true, true, true, false, false, false];
        let options = FitOptions {
            max_features: 100,
            min_df: 1,
            max_df: 1.0,
            min_token_len: 2,
        };
        let vectorizer = TfidfVectorizer::fit(&docs, &options).unwrap();
        let samples = docs.iter().map(|d| vectorizer.transform(d)).collect();
        (vectorizer, samples, labels)
    }

    #[test]
    fn test_sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(800.0) <= 1.0);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(-800.0).is_finite());
    }

    #[test]
    fn test_zero_model_predicts_class_zero_at_tie() {
        let model = LogisticModel::new(vec![0.0; 3], 0.0);
        let prediction = model.predict(&FeatureVector::default());
        assert_eq!(prediction.class, 0);
        assert_eq!(prediction.confidence(), 0.5);
    }

    #[test]
    fn test_confidence_is_predicted_class_mass() {
        let model = LogisticModel::new(vec![], 2.0);
        let prediction = model.predict(&FeatureVector::default());
        assert_eq!(prediction.class, 1);
        assert!(prediction.confidence() > 0.5);
        assert_eq!(prediction.confidence(), prediction.probabilities[1]);

        let model = LogisticModel::new(vec![], -2.0);
        let prediction = model.predict(&FeatureVector::default());
        assert_eq!(prediction.class, 0);
        assert!(prediction.confidence() > 0.5);
    }

    #[test]
    fn test_fit_separates_toy_data() {
        let (vectorizer, samples, labels) = toy_data();
        let mut rng = StdRng::seed_from_u64(7);
        let options = LogisticOptions {
            epochs: 200,
            learning_rate: 1.0,
            batch_size: 2,
            c: 10.0,
        };
        let model = LogisticModel::fit(&samples, &labels, &options, &mut rng).unwrap();
        assert_eq!(model.width(), vectorizer.width());
        for (sample, &label) in samples.iter().zip(labels.iter()) {
            assert_eq!(model.predict(sample).class == 1, label);
        }
        assert_eq!(model.predict(&vectorizer.transform("logic reason")).class, 1);
        assert_eq!(model.predict(&vectorizer.transform("warmth people")).class, 0);
    }

    #[test]
    fn test_fit_is_deterministic_under_seed() {
        let (_, samples, labels) = toy_data();
        let options = LogisticOptions::default();
        let a = LogisticModel::fit(&samples, &labels, &options, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = LogisticModel::fit(&samples, &labels, &options, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fit_rejects_mismatched_labels() {
        let (_, samples, _) = toy_data();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(LogisticModel::fit(&samples, &[true], &LogisticOptions::default(), &mut rng).is_err());
    }

    #[test]
    fn test_validate_width() {
        let model = LogisticModel::new(vec![0.1, 0.2], 0.0);
        assert!(model.validate(2).is_ok());
        assert!(model.validate(3).is_err());
        assert!(LogisticModel::new(vec![f64::NAN], 0.0).validate(1).is_err());
    }
}
