//! Offline trainer: CSV corpus in, classifier artifact out.
//!
//! The pipeline is deterministic under `training.seed`: the same corpus and
//! configuration produce a byte-identical artifact.

pub mod data;
pub mod evaluate;

use std::path::Path;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::TrainingConfig;
use crate::dimension::{PerDimension, PersonalityType};
use crate::error::Result;
use crate::text::{ArtifactMetadata, ClassifierArtifact, FeatureVector, LogisticModel, TfidfVectorizer};

pub use data::{load_records, read_records, LabeledDocument, MbtiRecord};
pub use evaluate::{evaluate, print_results, Evaluation};

/// Summary of one training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub train_documents: usize,
    pub test_documents: usize,
    pub vocabulary_size: usize,
    pub train: Evaluation,
    pub test: Evaluation,
    pub elapsed: Duration,
}

/// Train on the CSV at `config.csv_path`.
pub fn train_from_csv(config: &TrainingConfig) -> Result<(ClassifierArtifact, TrainingReport)> {
    println!("Loading dataset...");
    let start = Instant::now();
    let records = load_records(&config.csv_path)?;
    println!(
        "  Loaded {} records ({:.2}s)\n",
        records.len(),
        start.elapsed().as_secs_f64()
    );
    train(&records, config)
}

/// Train on already-loaded records.
pub fn train(records: &[MbtiRecord], config: &TrainingConfig) -> Result<(ClassifierArtifact, TrainingReport)> {
    let start = Instant::now();
    let documents = records
        .iter()
        .map(LabeledDocument::from_record)
        .collect::<Result<Vec<_>>>()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let (train_docs, test_docs) = data::split(documents, config.train_split, &mut rng)?;
    println!("Train: {} | Test: {}\n", train_docs.len(), test_docs.len());
    info!(
        train = train_docs.len(),
        test = test_docs.len(),
        seed = config.seed,
        "corpus split"
    );

    println!("Building TF-IDF vectorizer (top {} words)...", config.max_features);
    let train_texts: Vec<String> = train_docs.iter().map(|d| d.text.clone()).collect();
    let vectorizer = TfidfVectorizer::fit(&train_texts, &config.fit_options())?;
    println!("  Vocabulary size: {}\n", vectorizer.width());

    let train_features = vectorize(&vectorizer, &train_docs);
    let train_labels: Vec<PersonalityType> = train_docs.iter().map(|d| d.label).collect();

    println!("Training logistic regression (4 binary classifiers: I/E, N/S, T/F, J/P)...");
    let options = config.logistic_options();
    let classifiers = PerDimension::try_from_fn(|dimension| {
        let labels: Vec<bool> = train_labels
            .iter()
            .map(|label| label.has_first_trait(dimension))
            .collect();
        let model = LogisticModel::fit(&train_features, &labels, &options, &mut rng)?;
        info!(dimension = %dimension, "classifier trained");
        Ok::<_, crate::error::Error>(model)
    })?;

    println!("\nEvaluation\n");
    let train_eval = evaluate(&classifiers, &train_features, &train_labels);
    let test_features = vectorize(&vectorizer, &test_docs);
    let test_labels: Vec<PersonalityType> = test_docs.iter().map(|d| d.label).collect();
    let test_eval = evaluate(&classifiers, &test_features, &test_labels);
    println!("Training Set:");
    println!("  Accuracy: {:.2}%\n", train_eval.exact_accuracy() * 100.0);
    println!("Test Set:");
    println!("  Accuracy: {:.2}%\n", test_eval.exact_accuracy() * 100.0);

    let report = TrainingReport {
        train_documents: train_docs.len(),
        test_documents: test_docs.len(),
        vocabulary_size: vectorizer.width(),
        train: train_eval,
        test: test_eval,
        elapsed: start.elapsed(),
    };
    info!(
        vocabulary = report.vocabulary_size,
        test_exact_accuracy = report.test.exact_accuracy(),
        elapsed_secs = report.elapsed.as_secs_f64(),
        "training complete"
    );

    let metadata = ArtifactMetadata {
        training_documents: report.train_documents,
        seed: config.seed,
    };
    let artifact = ClassifierArtifact::new(vectorizer, classifiers, metadata)?;
    Ok((artifact, report))
}

/// Full `train` command: train, print the report, save to `artifact_path`.
pub fn run(config: &TrainingConfig, artifact_path: &Path) -> Result<TrainingReport> {
    println!("\n===================================================================");
    println!("  EchoType Text Classifier: TF-IDF + Logistic Regression");
    println!("===================================================================\n");

    println!("Configuration:");
    println!("  Data: {}", config.csv_path.display());
    println!(
        "  Train/Test split: {:.0}%/{:.0}%",
        config.train_split * 100.0,
        (1.0 - config.train_split) * 100.0
    );
    println!(
        "  TF-IDF features: {} (min_df {}, max_df {})",
        config.max_features, config.min_df, config.max_df
    );
    println!("  Learning rate: {}", config.learning_rate);
    println!("  C: {}", config.regularization_c);
    println!("  Epochs: {}", config.epochs);
    println!("  Batch size: {}", config.batch_size);
    println!("  Seed: {}\n", config.seed);
    println!("===================================================================\n");

    let (artifact, report) = train_from_csv(config)?;
    print_results(&report.train, &report.test);

    println!("Saving model...");
    artifact.save(artifact_path)?;
    println!("\n✓ Model saved:");
    println!("  - {}", artifact_path.display());
    println!("\nTotal training time: {:.2}s\n", report.elapsed.as_secs_f64());
    Ok(report)
}

fn vectorize(vectorizer: &TfidfVectorizer, documents: &[LabeledDocument]) -> Vec<FeatureVector> {
    documents.iter().map(|d| vectorizer.transform(&d.text)).collect()
}
