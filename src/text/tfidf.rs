//! TF-IDF vectorizer with a frozen vocabulary.
//!
//! Fitting keeps terms whose document frequency lies within
//! `[min_df, max_df * n_docs]`, then the `max_features` terms with the highest
//! corpus count. Vocabulary indices are assigned alphabetically. IDF is
//! smoothed: `ln((1 + n) / (1 + df)) + 1`. Transformed vectors hold raw term
//! counts times IDF, L2-normalized.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Vectorizer hyper-parameters used by [`TfidfVectorizer::fit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    pub max_features: usize,
    /// Minimum number of documents a term must appear in.
    pub min_df: usize,
    /// Maximum fraction of documents a term may appear in.
    pub max_df: f64,
    pub min_token_len: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_features: 3000,
            min_df: 5,
            max_df: 0.7,
            min_token_len: 2,
        }
    }
}

/// A fixed-width feature vector stored as sorted `(index, value)` pairs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    width: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    #[cfg(test)]
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries.iter().map(|&(i, v)| weights[i] * v).sum()
    }

    #[cfg(test)]
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.width];
        for &(i, v) in &self.entries {
            dense[i] = v;
        }
        dense
    }
}

/// Frozen vocabulary and IDF weights.
///
/// Deserialization runs [`TfidfVectorizer::validate`], so every instance maps
/// each vocabulary index to an IDF weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    min_token_len: usize,
}

impl<'de> Deserialize<'de> for TfidfVectorizer {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Parts {
            vocabulary: BTreeMap<String, usize>,
            idf: Vec<f64>,
            min_token_len: usize,
        }

        let parts = Parts::deserialize(deserializer)?;
        let vectorizer = Self {
            vocabulary: parts.vocabulary,
            idf: parts.idf,
            min_token_len: parts.min_token_len,
        };
        vectorizer.validate().map_err(serde::de::Error::custom)?;
        Ok(vectorizer)
    }
}

impl TfidfVectorizer {
    /// Build directly from a vocabulary and matching IDF weights.
    pub fn from_parts(
        vocabulary: BTreeMap<String, usize>,
        idf: Vec<f64>,
        min_token_len: usize,
    ) -> Result<Self> {
        let vectorizer = Self {
            vocabulary,
            idf,
            min_token_len,
        };
        vectorizer.validate().map_err(Error::Training)?;
        Ok(vectorizer)
    }

    /// Fit vocabulary and IDF on already-cleaned documents.
    pub fn fit(documents: &[String], options: &FitOptions) -> Result<Self> {
        if documents.is_empty() {
            return Err(Error::Training("cannot fit vectorizer on an empty corpus".into()));
        }

        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        let mut term_freq: HashMap<&str, usize> = HashMap::new();

        for doc in documents {
            let mut unique: HashSet<&str> = HashSet::new();
            for token in tokens(doc, options.min_token_len) {
                *term_freq.entry(token).or_insert(0) += 1;
                unique.insert(token);
            }
            for token in unique {
                *doc_freq.entry(token).or_insert(0) += 1;
            }
        }

        let n_docs = documents.len() as f64;
        let max_doc_count = options.max_df * n_docs;

        let mut candidates: Vec<(&str, usize)> = term_freq
            .into_iter()
            .filter(|(term, _)| {
                let df = doc_freq[term];
                df >= options.min_df && (df as f64) <= max_doc_count
            })
            .collect();

        // Highest corpus count first, alphabetical among ties
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        candidates.truncate(options.max_features);

        if candidates.is_empty() {
            return Err(Error::Training(
                "no terms survived document-frequency filtering".into(),
            ));
        }

        let mut terms: Vec<&str> = candidates.into_iter().map(|(term, _)| term).collect();
        terms.sort_unstable();

        let vocabulary: BTreeMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect();
        let idf = terms
            .iter()
            .map(|term| ((1.0 + n_docs) / (1.0 + doc_freq[term] as f64)).ln() + 1.0)
            .collect();

        Ok(Self {
            vocabulary,
            idf,
            min_token_len: options.min_token_len,
        })
    }

    /// Vectorize one cleaned document.
    pub fn transform(&self, document: &str) -> FeatureVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokens(document, self.min_token_len) {
            if let Some(&idx) = self.vocabulary.get(token) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, count)| (idx, count * self.idf[idx]))
            .collect();

        let norm = entries.iter().map(|&(_, x)| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, val) in &mut entries {
                *val /= norm;
            }
        }

        FeatureVector {
            width: self.width(),
            entries,
        }
    }

    /// Number of features produced by [`TfidfVectorizer::transform`].
    pub fn width(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Check internal consistency of a deserialized vectorizer.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.vocabulary.is_empty() {
            return Err("vectorizer vocabulary is empty".into());
        }
        if self.idf.len() != self.vocabulary.len() {
            return Err(format!(
                "vectorizer has {} IDF weights for {} terms",
                self.idf.len(),
                self.vocabulary.len()
            ));
        }
        let mut seen = vec![false; self.idf.len()];
        for (term, &idx) in &self.vocabulary {
            if idx >= seen.len() || seen[idx] {
                return Err(format!("vocabulary index {} of '{}' is invalid", idx, term));
            }
            seen[idx] = true;
        }
        if self.idf.iter().any(|w| !w.is_finite()) {
            return Err("vectorizer IDF weights must be finite".into());
        }
        Ok(())
    }
}

fn tokens(document: &str, min_len: usize) -> impl Iterator<Item = &str> {
    document
        .split_whitespace()
        .filter(move |w| w.chars().count() >= min_len)
}
