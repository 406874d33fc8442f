//! Trained classifier artifact: vectorizer plus one logistic model per
//! dimension, persisted as a single JSON document.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use super::logistic::LogisticModel;
use super::tfidf::TfidfVectorizer;
use crate::dimension::PerDimension;
use crate::error::{Error, Result};

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Provenance recorded by the trainer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub training_documents: usize,
    pub seed: u64,
}

/// Every instance is validated: built by [`ClassifierArtifact::new`] or
/// deserialized, the four models match the vectorizer width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierArtifact {
    format_version: u32,
    metadata: ArtifactMetadata,
    vectorizer: TfidfVectorizer,
    classifiers: PerDimension<LogisticModel>,
}

impl<'de> Deserialize<'de> for ClassifierArtifact {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Parts {
            format_version: u32,
            #[serde(default)]
            metadata: ArtifactMetadata,
            vectorizer: TfidfVectorizer,
            classifiers: PerDimension<LogisticModel>,
        }

        let parts = Parts::deserialize(deserializer)?;
        let artifact = Self {
            format_version: parts.format_version,
            metadata: parts.metadata,
            vectorizer: parts.vectorizer,
            classifiers: parts.classifiers,
        };
        artifact.validate().map_err(serde::de::Error::custom)?;
        Ok(artifact)
    }
}

impl ClassifierArtifact {
    pub fn new(
        vectorizer: TfidfVectorizer,
        classifiers: PerDimension<LogisticModel>,
        metadata: ArtifactMetadata,
    ) -> Result<Self> {
        let artifact = Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            metadata,
            vectorizer,
            classifiers,
        };
        artifact.validate().map_err(Error::Training)?;
        Ok(artifact)
    }

    /// Read and validate an artifact. Any failure is reported as
    /// [`Error::ArtifactLoad`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let failure = |reason: String| Error::ArtifactLoad {
            path: path.to_path_buf(),
            reason,
        };

        let json = std::fs::read_to_string(path).map_err(|e| failure(e.to_string()))?;
        let artifact: Self = serde_json::from_str(&json).map_err(|e| failure(e.to_string()))?;

        info!(
            path = %path.display(),
            features = artifact.vectorizer.width(),
            training_documents = artifact.metadata.training_documents,
            "classifier artifact loaded"
        );
        Ok(artifact)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "classifier artifact saved");
        Ok(())
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(format!(
                "unsupported artifact format version {} (expected {})",
                self.format_version, ARTIFACT_FORMAT_VERSION
            ));
        }
        self.vectorizer.validate()?;
        let width = self.vectorizer.width();
        for (dimension, model) in self.classifiers.iter() {
            model
                .validate(width)
                .map_err(|e| format!("{} classifier: {}", dimension, e))?;
        }
        Ok(())
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn classifiers(&self) -> &PerDimension<LogisticModel> {
        &self.classifiers
    }

    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }
}
