//! Weighted fusion of questionnaire and text scores.

use crate::dimension::{PersonalityType, ScoreVector};
use crate::error::{Error, Result};
use crate::text::TextPrediction;

/// Share of the final score taken from the questionnaire when text is used.
pub const DEFAULT_QUIZ_WEIGHT: f64 = 0.7;

/// Final type and the scores it was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fusion {
    pub personality_type: PersonalityType,
    pub scores: ScoreVector,
}

/// Blend quiz scores with an optional text prediction.
///
/// Without text the quiz scores are returned unchanged. With text, each
/// dimension is `quiz * quiz_weight + text_affinity * (1 - quiz_weight)`.
pub fn fuse(
    quiz_scores: &ScoreVector,
    text: Option<&TextPrediction>,
    quiz_weight: f64,
) -> Result<Fusion> {
    if !(0.0..=1.0).contains(&quiz_weight) {
        return Err(Error::InvalidWeight(quiz_weight));
    }

    let scores = match text {
        None => *quiz_scores,
        Some(prediction) => {
            let text_scores = prediction.affinities();
            let text_weight = 1.0 - quiz_weight;
            quiz_scores.map(|dimension, &quiz| {
                quiz * quiz_weight + text_scores.get(dimension) * text_weight
            })
        }
    };

    Ok(Fusion {
        personality_type: PersonalityType::from_scores(&scores),
        scores,
    })
}
