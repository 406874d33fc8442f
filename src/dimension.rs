//! The four MBTI dimensions and the values keyed by them.
//!
//! Every dimension has a first-named trait (I, N, T, J) and a second-named
//! trait (E, S, F, P). Scores in `[0, 1]` measure affinity toward the
//! first-named trait.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One of the four independent personality axes, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    /// Introversion / Extraversion
    #[serde(rename = "I-E")]
    Energy,
    /// Intuition / Sensing
    #[serde(rename = "N-S")]
    Information,
    /// Thinking / Feeling
    #[serde(rename = "T-F")]
    Decision,
    /// Judging / Perceiving
    #[serde(rename = "J-P")]
    Lifestyle,
}

impl Dimension {
    /// All dimensions in the fixed I-E, N-S, T-F, J-P order.
    pub const ALL: [Dimension; 4] = [
        Dimension::Energy,
        Dimension::Information,
        Dimension::Decision,
        Dimension::Lifestyle,
    ];

    /// Catalog / wire key, e.g. `"I-E"`.
    pub fn key(self) -> &'static str {
        match self {
            Dimension::Energy => "I-E",
            Dimension::Information => "N-S",
            Dimension::Decision => "T-F",
            Dimension::Lifestyle => "J-P",
        }
    }

    pub fn first_letter(self) -> char {
        match self {
            Dimension::Energy => 'I',
            Dimension::Information => 'N',
            Dimension::Decision => 'T',
            Dimension::Lifestyle => 'J',
        }
    }

    pub fn second_letter(self) -> char {
        match self {
            Dimension::Energy => 'E',
            Dimension::Information => 'S',
            Dimension::Decision => 'F',
            Dimension::Lifestyle => 'P',
        }
    }

    /// Human-readable axis name.
    pub fn display_name(self) -> &'static str {
        match self {
            Dimension::Energy => "Introversion ↔ Extraversion",
            Dimension::Information => "Intuition ↔ Sensing",
            Dimension::Decision => "Thinking ↔ Feeling",
            Dimension::Lifestyle => "Judging ↔ Perceiving",
        }
    }

    /// Trait name for a letter of this dimension, e.g. `'I'` → "Introvert".
    pub fn trait_name(self, letter: char) -> &'static str {
        match (self, letter == self.first_letter()) {
            (Dimension::Energy, true) => "Introvert",
            (Dimension::Energy, false) => "Extravert",
            (Dimension::Information, true) => "Intuitive",
            (Dimension::Information, false) => "Sensing",
            (Dimension::Decision, true) => "Thinking",
            (Dimension::Decision, false) => "Feeling",
            (Dimension::Lifestyle, true) => "Judging",
            (Dimension::Lifestyle, false) => "Perceiving",
        }
    }

    /// Letter selected by a score. Strictly above 0.5 picks the first trait;
    /// a tie at exactly 0.5 picks the second.
    pub fn letter_for(self, score: f64) -> char {
        if score > 0.5 {
            self.first_letter()
        } else {
            self.second_letter()
        }
    }

    /// Position of this dimension's letter inside a type label.
    pub fn index(self) -> usize {
        match self {
            Dimension::Energy => 0,
            Dimension::Information => 1,
            Dimension::Decision => 2,
            Dimension::Lifestyle => 3,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One value per dimension, serialized as a map keyed by `"I-E"`, `"N-S"`,
/// `"T-F"`, `"J-P"`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerDimension<T> {
    #[serde(rename = "I-E")]
    pub energy: T,
    #[serde(rename = "N-S")]
    pub information: T,
    #[serde(rename = "T-F")]
    pub decision: T,
    #[serde(rename = "J-P")]
    pub lifestyle: T,
}

impl<T> PerDimension<T> {
    /// Build by evaluating `f` once per dimension, in fixed order.
    pub fn from_fn(mut f: impl FnMut(Dimension) -> T) -> Self {
        Self {
            energy: f(Dimension::Energy),
            information: f(Dimension::Information),
            decision: f(Dimension::Decision),
            lifestyle: f(Dimension::Lifestyle),
        }
    }

    /// Fallible variant of [`PerDimension::from_fn`]; stops at the first error.
    pub fn try_from_fn<E>(mut f: impl FnMut(Dimension) -> std::result::Result<T, E>) -> std::result::Result<Self, E> {
        Ok(Self {
            energy: f(Dimension::Energy)?,
            information: f(Dimension::Information)?,
            decision: f(Dimension::Decision)?,
            lifestyle: f(Dimension::Lifestyle)?,
        })
    }

    pub fn get(&self, dimension: Dimension) -> &T {
        match dimension {
            Dimension::Energy => &self.energy,
            Dimension::Information => &self.information,
            Dimension::Decision => &self.decision,
            Dimension::Lifestyle => &self.lifestyle,
        }
    }

    pub fn get_mut(&mut self, dimension: Dimension) -> &mut T {
        match dimension {
            Dimension::Energy => &mut self.energy,
            Dimension::Information => &mut self.information,
            Dimension::Decision => &mut self.decision,
            Dimension::Lifestyle => &mut self.lifestyle,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Dimension, &T) -> U) -> PerDimension<U> {
        PerDimension::from_fn(|d| f(d, self.get(d)))
    }

    /// Iterate `(dimension, value)` pairs in fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, &T)> + '_ {
        Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}

/// Normalized affinity toward the first-named trait of each dimension.
pub type ScoreVector = PerDimension<f64>;

impl ScoreVector {
    /// Threshold every dimension into a personality type.
    pub fn to_type(&self) -> PersonalityType {
        PersonalityType::from_scores(self)
    }
}

/// A four-letter personality type such as `INTJ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PersonalityType {
    letters: [char; 4],
}

impl PersonalityType {
    /// Threshold each score: `> 0.5` selects the first trait, otherwise the
    /// second.
    pub fn from_scores(scores: &ScoreVector) -> Self {
        let mut letters = [' '; 4];
        for (dimension, &score) in scores.iter() {
            letters[dimension.index()] = dimension.letter_for(score);
        }
        Self { letters }
    }

    /// The 16 valid types.
    pub fn all() -> Vec<PersonalityType> {
        let mut types = Vec::with_capacity(16);
        for mask in 0u8..16 {
            let mut letters = [' '; 4];
            for dimension in Dimension::ALL {
                let first = mask & (1 << (3 - dimension.index())) == 0;
                letters[dimension.index()] = if first {
                    dimension.first_letter()
                } else {
                    dimension.second_letter()
                };
            }
            types.push(PersonalityType { letters });
        }
        types
    }

    pub fn letter(&self, dimension: Dimension) -> char {
        self.letters[dimension.index()]
    }

    /// Whether this type carries the first-named trait of `dimension`.
    pub fn has_first_trait(&self, dimension: Dimension) -> bool {
        self.letter(dimension) == dimension.first_letter()
    }

    pub fn as_string(&self) -> String {
        self.letters.iter().collect()
    }
}

impl fmt::Display for PersonalityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.letters {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl FromStr for PersonalityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        let chars: Vec<char> = upper.chars().collect();
        if chars.len() != 4 {
            return Err(Error::InvalidLabel(s.to_string()));
        }
        let mut letters = [' '; 4];
        for dimension in Dimension::ALL {
            let c = chars[dimension.index()];
            if c != dimension.first_letter() && c != dimension.second_letter() {
                return Err(Error::InvalidLabel(s.to_string()));
            }
            letters[dimension.index()] = c;
        }
        Ok(Self { letters })
    }
}

impl Serialize for PersonalityType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_string())
    }
}

impl<'de> Deserialize<'de> for PersonalityType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
