//! Likert questionnaire scoring.
//!
//! Each dimension block of `n` answers sums to a value in `[n, 5n]` after
//! reverse items are flipped (`6 - r`); that range is mapped linearly onto
//! `[0, 1]` with `(sum - n) / (4n)`.

use crate::catalog::{Question, QuestionCatalog, QuestionSet};
use crate::dimension::{Dimension, ScoreVector};
use crate::error::{Error, Result};

pub const MIN_RESPONSE: i64 = 1;
pub const MAX_RESPONSE: i64 = 5;

/// Responses validated against, and paired with, the questions of one variant.
#[derive(Debug, Clone)]
pub struct AnswerSequence<'a> {
    set: &'a QuestionSet,
    responses: Vec<u8>,
}

impl<'a> AnswerSequence<'a> {
    /// Validate `raw` for `set`: the length must equal the question count and
    /// every value must lie in 1..=5.
    pub fn new(set: &'a QuestionSet, raw: &[i64]) -> Result<Self> {
        if raw.len() != set.len() {
            return Err(Error::AnswerCountMismatch {
                variant: set.variant().to_string(),
                expected: set.len(),
                actual: raw.len(),
            });
        }

        let responses = raw
            .iter()
            .enumerate()
            .map(|(position, &value)| {
                if (MIN_RESPONSE..=MAX_RESPONSE).contains(&value) {
                    Ok(value as u8)
                } else {
                    Err(Error::InvalidAnswerValue {
                        position,
                        value: value.to_string(),
                    })
                }
            })
            .collect::<Result<Vec<u8>>>()?;

        Ok(Self { set, responses })
    }

    pub fn responses(&self) -> &[u8] {
        &self.responses
    }

    /// `(question, response)` pairs of one dimension, in presentation order.
    pub fn pairs(&self, dimension: Dimension) -> impl Iterator<Item = (&'a Question, u8)> + '_ {
        let range = self.set.block_range(dimension);
        self.set.questions()[range.clone()]
            .iter()
            .zip(self.responses[range].iter().copied())
    }

    /// Normalized score of every dimension.
    pub fn score(&self) -> Result<ScoreVector> {
        ScoreVector::try_from_fn(|dimension| self.dimension_score(dimension))
    }

    fn dimension_score(&self, dimension: Dimension) -> Result<f64> {
        let n = self.set.block_range(dimension).len();
        if n == 0 {
            return Err(Error::EmptyDimension {
                dimension,
                variant: self.set.variant().to_string(),
            });
        }
        let sum: u32 = self
            .pairs(dimension)
            .map(|(question, response)| u32::from(question.polarity.apply(response)))
            .sum();
        Ok(f64::from(sum - n as u32) / f64::from(4 * n as u32))
    }
}

/// Score a raw answer sequence for the named variant.
pub fn score(catalog: &QuestionCatalog, answers: &[i64], variant: &str) -> Result<ScoreVector> {
    let set = catalog.set(variant.parse()?);
    AnswerSequence::new(set, answers)?.score()
}
