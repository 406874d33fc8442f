//! Held-out evaluation of a trained artifact.

use crate::dimension::{Dimension, PerDimension, PersonalityType};
use crate::text::{FeatureVector, LogisticModel};

/// Accuracy counts over one split.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub documents: usize,
    pub dimension_correct: PerDimension<usize>,
    pub exact_correct: usize,
}

impl Evaluation {
    pub fn dimension_accuracy(&self, dimension: Dimension) -> f64 {
        ratio(*self.dimension_correct.get(dimension), self.documents)
    }

    /// Fraction of documents whose full 4-letter type was predicted.
    pub fn exact_accuracy(&self) -> f64 {
        ratio(self.exact_correct, self.documents)
    }
}

fn ratio(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}

/// Score `classifiers` against vectorized documents and their true types.
pub fn evaluate(
    classifiers: &PerDimension<LogisticModel>,
    features: &[FeatureVector],
    labels: &[PersonalityType],
) -> Evaluation {
    let mut dimension_correct = PerDimension::from_fn(|_| 0usize);
    let mut exact_correct = 0;

    for (x, label) in features.iter().zip(labels.iter()) {
        let mut all_right = true;
        for (dimension, model) in classifiers.iter() {
            let predicted_first = model.predict(x).class == 1;
            if predicted_first == label.has_first_trait(dimension) {
                *dimension_correct.get_mut(dimension) += 1;
            } else {
                all_right = false;
            }
        }
        if all_right {
            exact_correct += 1;
        }
    }

    Evaluation {
        documents: features.len().min(labels.len()),
        dimension_correct,
        exact_correct,
    }
}

/// Print the accuracy table for both splits.
pub fn print_results(train: &Evaluation, test: &Evaluation) {
    println!("===================================================================\n");
    println!("Final Results\n");
    println!("+--------------------------------+----------+----------+");
    println!("| Dimension                      |  Train   |   Test   |");
    println!("+--------------------------------+----------+----------+");
    for dimension in Dimension::ALL {
        println!(
            "| {:<30} | {:>6.2}%  | {:>6.2}%  |",
            dimension.display_name(),
            train.dimension_accuracy(dimension) * 100.0,
            test.dimension_accuracy(dimension) * 100.0
        );
    }
    println!("+--------------------------------+----------+----------+");
    println!(
        "| {:<30} | {:>6.2}%  | {:>6.2}%  |",
        "Exact type (16-way)",
        train.exact_accuracy() * 100.0,
        test.exact_accuracy() * 100.0
    );
    println!("+--------------------------------+----------+----------+\n");

    println!("Analysis:");
    println!(
        "  vs Random (16-way): {:.1}x better",
        test.exact_accuracy() / 0.0625
    );
    println!("\n===================================================================\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TfidfVectorizer;
    use std::collections::BTreeMap;

    #[test]
    fn test_counts_per_dimension_and_exact() {
        let vocabulary: BTreeMap<String, usize> =
            [("alone".to_string(), 0), ("party".to_string(), 1)].into();
        let vectorizer = TfidfVectorizer::from_parts(vocabulary, vec![1.0, 1.0], 2).unwrap();
        // "alone" pushes every dimension to the first trait, "party" to the second
        let model = LogisticModel::new(vec![5.0, -5.0], 0.0);
        let classifiers = PerDimension::from_fn(|_| model.clone());

        let features = vec![vectorizer.transform("alone"), vectorizer.transform("party")];
        let labels: Vec<PersonalityType> =
            vec!["INTJ".parse().unwrap(), "ESFJ".parse().unwrap()];

        let evaluation = evaluate(&classifiers, &features, &labels);
        assert_eq!(evaluation.documents, 2);
        assert_eq!(evaluation.exact_correct, 1);
        assert_eq!(evaluation.dimension_accuracy(Dimension::Energy), 1.0);
        assert_eq!(evaluation.dimension_accuracy(Dimension::Lifestyle), 0.5);
        assert_eq!(evaluation.exact_accuracy(), 0.5);
    }

    #[test]
    fn test_empty_split_has_zero_accuracy() {
        let classifiers = PerDimension::from_fn(|_| LogisticModel::new(vec![0.0], 0.0));
        let evaluation = evaluate(&classifiers, &[], &[]);
        assert_eq!(evaluation.exact_accuracy(), 0.0);
    }
}
