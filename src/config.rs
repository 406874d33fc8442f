//! Configuration structures for the EchoType service and trainer.
//!
//! This module provides strongly-typed configuration management using TOML files.
//! The configuration covers the question catalog, the classifier artifact,
//! fusion policy, the HTTP server and training hyperparameters. Every field
//! has a default, so a partial `config.toml` is valid.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::fusion::DEFAULT_QUIZ_WEIGHT;
use crate::predictor::{FusionSettings, MIN_TEXT_CHARS};
use crate::text::{FitOptions, LogisticOptions};

/// Main configuration structure loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Question catalog source
    pub catalog: CatalogConfig,
    /// Classifier artifact location
    pub model: ModelConfig,
    /// Quiz/text fusion policy
    pub fusion: FusionConfig,
    /// HTTP server settings
    pub server: ServerConfig,
    /// Offline training hyperparameters
    pub training: TrainingConfig,
}

/// Question catalog configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path to a catalog JSON file. The built-in catalog is used when unset.
    pub path: Option<PathBuf>,
}

/// Classifier artifact configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Artifact written by `train` and loaded by `serve`/`predict`
    pub artifact_path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from("models/echotype_classifier.json"),
        }
    }
}

/// Fusion policy configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Weight of the questionnaire when text is present (0.7 = 70% quiz, 30% text)
    pub quiz_weight: f64,
    /// Minimum trimmed text length, in characters, before text is classified
    pub min_text_chars: usize,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            quiz_weight: DEFAULT_QUIZ_WEIGHT,
            min_text_chars: MIN_TEXT_CHARS,
        }
    }
}

impl FusionConfig {
    pub fn settings(&self) -> FusionSettings {
        FusionSettings {
            quiz_weight: self.quiz_weight,
            min_text_chars: self.min_text_chars,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `0.0.0.0:5000`
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Training hyperparameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Path to the CSV dataset file (columns `type`, `posts`)
    pub csv_path: PathBuf,
    /// Train/test split ratio (e.g., 0.8 = 80% train, 20% test)
    pub train_split: f64,
    /// Seed for the shuffle and the gradient descent order
    pub seed: u64,
    /// Maximum number of TF-IDF features to keep
    pub max_features: usize,
    /// Minimum number of documents a term must appear in
    pub min_df: usize,
    /// Maximum fraction of documents a term may appear in
    pub max_df: f64,
    /// Passes over the training split per dimension
    pub epochs: usize,
    /// Gradient descent step size
    pub learning_rate: f64,
    /// Mini-batch size
    pub batch_size: usize,
    /// Inverse L2 regularization strength
    pub regularization_c: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("data/mbti_1.csv"),
            train_split: 0.8,
            seed: 42,
            max_features: 3000,
            min_df: 5,
            max_df: 0.7,
            epochs: 30,
            learning_rate: 1.0,
            batch_size: 64,
            regularization_c: 1.0,
        }
    }
}

impl TrainingConfig {
    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            max_features: self.max_features,
            min_df: self.min_df,
            max_df: self.max_df,
            ..FitOptions::default()
        }
    }

    pub fn logistic_options(&self) -> LogisticOptions {
        LogisticOptions {
            epochs: self.epochs,
            learning_rate: self.learning_rate,
            batch_size: self.batch_size,
            c: self.regularization_c,
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    ///
    /// A file that exists but is invalid is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using default configuration");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.fusion.quiz_weight) {
            return Err(Error::InvalidWeight(self.fusion.quiz_weight));
        }
        let t = &self.training;
        if !(t.train_split > 0.0 && t.train_split < 1.0) {
            return Err(Error::Config(format!(
                "training.train_split must lie in (0, 1), got {}",
                t.train_split
            )));
        }
        if !(t.max_df > 0.0 && t.max_df <= 1.0) {
            return Err(Error::Config(format!(
                "training.max_df must lie in (0, 1], got {}",
                t.max_df
            )));
        }
        if t.max_features == 0 || t.batch_size == 0 || t.epochs == 0 {
            return Err(Error::Config(
                "training.max_features, batch_size and epochs must be positive".into(),
            ));
        }
        if t.learning_rate <= 0.0 || t.regularization_c <= 0.0 {
            return Err(Error::Config(
                "training.learning_rate and regularization_c must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.fusion.quiz_weight, 0.7);
        assert_eq!(config.fusion.min_text_chars, 50);
        assert_eq!(config.training.max_features, 3000);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[fusion]\nquiz_weight = 0.6\n\n[server]\nbind = \"127.0.0.1:8080\"\n",
        )
        .unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.fusion.quiz_weight, 0.6);
        assert_eq!(config.fusion.min_text_chars, 50);
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.training, TrainingConfig::default());
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_invalid_weight_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[fusion]\nquiz_weight = 1.2\n").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::InvalidWeight(_))));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[training\nseed = ").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_bad_train_split_is_rejected() {
        let mut config = Config::default();
        config.training.train_split = 1.0;
        assert!(config.validate().is_err());
    }
}
