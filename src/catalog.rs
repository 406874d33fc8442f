//! Question catalog loading and per-variant question selection.
//!
//! The catalog document groups questions by dimension and carries a
//! `test_types` table describing how many questions each variant asks per
//! dimension:
//!
//! ```json
//! {
//!   "test_types": { "short": { "questions_per_dimension": 5 },
//!                   "full":  { "questions_per_dimension": 10 } },
//!   "I-E": [ { "id": "IE-01", "dimension": "I-E", "question": "...",
//!              "reverse": true, "category": "short" } ],
//!   "N-S": [ ... ], "T-F": [ ... ], "J-P": [ ... ]
//! }
//! ```
//!
//! Both variants are selected once at load time. The "short" variant keeps
//! only questions tagged `short`; the "full" variant keeps the first
//! `questions_per_dimension` questions of each group in catalog order.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dimension::{Dimension, PerDimension};
use crate::error::{Error, Result};

const BUILTIN_CATALOG: &str = include_str!("../data/questions.json");

/// Test length offered to the respondent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestVariant {
    Short,
    Full,
}

impl TestVariant {
    pub const ALL: [TestVariant; 2] = [TestVariant::Short, TestVariant::Full];

    pub fn as_str(self) -> &'static str {
        match self {
            TestVariant::Short => "short",
            TestVariant::Full => "full",
        }
    }
}

impl fmt::Display for TestVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "short" => Ok(TestVariant::Short),
            "full" => Ok(TestVariant::Full),
            other => Err(Error::InvalidVariant(other.to_string())),
        }
    }
}

/// Whether a raw response counts toward the first-named trait as given or
/// flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Forward,
    Reverse,
}

impl Polarity {
    /// Map a 1..=5 response onto the first-trait scale.
    pub fn apply(self, response: u8) -> u8 {
        match self {
            Polarity::Forward => response,
            Polarity::Reverse => 6 - response,
        }
    }
}

/// A single Likert item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    pub id: String,
    pub dimension: Dimension,
    pub text: String,
    pub polarity: Polarity,
    pub category: TestVariant,
}

/// Wire shape of a question, shared by the catalog file and the HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuestionRecord {
    id: String,
    dimension: Dimension,
    question: String,
    #[serde(default)]
    reverse: bool,
    category: TestVariant,
}

impl From<QuestionRecord> for Question {
    fn from(record: QuestionRecord) -> Self {
        Question {
            id: record.id,
            dimension: record.dimension,
            text: record.question,
            polarity: if record.reverse {
                Polarity::Reverse
            } else {
                Polarity::Forward
            },
            category: record.category,
        }
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        QuestionRecord {
            id: question.id,
            dimension: question.dimension,
            question: question.text,
            reverse: question.polarity == Polarity::Reverse,
            category: question.category,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VariantSettings {
    questions_per_dimension: usize,
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    test_types: HashMap<String, VariantSettings>,
    #[serde(flatten)]
    groups: PerDimension<Vec<Question>>,
}

/// The ordered questions of one variant, grouped I-E, N-S, T-F, J-P.
///
/// `blocks` records which positions of the answer sequence belong to each
/// dimension, so answers are always paired with the question they answer.
#[derive(Debug, Clone)]
pub struct QuestionSet {
    variant: TestVariant,
    questions: Vec<Question>,
    blocks: PerDimension<Range<usize>>,
}

impl QuestionSet {
    fn select(
        variant: TestVariant,
        groups: &PerDimension<Vec<Question>>,
        settings: &VariantSettings,
    ) -> Result<Self> {
        let mut questions = Vec::new();
        let blocks = PerDimension::try_from_fn(|dimension| {
            let group = groups.get(dimension);
            let start = questions.len();
            match variant {
                TestVariant::Short => questions.extend(
                    group
                        .iter()
                        .filter(|q| q.category == TestVariant::Short)
                        .cloned(),
                ),
                TestVariant::Full => questions.extend(
                    group
                        .iter()
                        .take(settings.questions_per_dimension)
                        .cloned(),
                ),
            }
            let end = questions.len();
            if start == end {
                return Err(Error::EmptyDimension {
                    dimension,
                    variant: variant.to_string(),
                });
            }
            if variant == TestVariant::Short && end - start != settings.questions_per_dimension {
                warn!(
                    dimension = %dimension,
                    tagged = end - start,
                    configured = settings.questions_per_dimension,
                    "short test question count differs from configuration"
                );
            }
            Ok(start..end)
        })?;

        Ok(Self {
            variant,
            questions,
            blocks,
        })
    }

    pub fn variant(&self) -> TestVariant {
        self.variant
    }

    /// All questions in presentation order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Answer positions that belong to `dimension`.
    pub fn block_range(&self, dimension: Dimension) -> Range<usize> {
        self.blocks.get(dimension).clone()
    }

    /// Questions of one dimension, in catalog order.
    pub fn block(&self, dimension: Dimension) -> &[Question] {
        &self.questions[self.block_range(dimension)]
    }
}

/// Immutable question catalog with both variants pre-selected.
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    short: QuestionSet,
    full: QuestionSet,
}

impl QuestionCatalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::CatalogLoad(format!("{}: {}", path.display(), e)))?;
        let catalog = Self::from_json(&content)?;
        info!(
            path = %path.display(),
            short = catalog.short.len(),
            full = catalog.full.len(),
            "question catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let document: CatalogDocument =
            serde_json::from_str(content).map_err(|e| Error::CatalogLoad(e.to_string()))?;
        Self::from_document(document)
    }

    fn from_document(document: CatalogDocument) -> Result<Self> {
        let mut seen = HashSet::new();
        for (dimension, group) in document.groups.iter() {
            for question in group {
                if question.dimension != dimension {
                    return Err(Error::CatalogLoad(format!(
                        "question {} is tagged {} but listed under {}",
                        question.id, question.dimension, dimension
                    )));
                }
                if !seen.insert(question.id.as_str()) {
                    return Err(Error::CatalogLoad(format!(
                        "duplicate question id {}",
                        question.id
                    )));
                }
            }
        }

        for name in document.test_types.keys() {
            if name.parse::<TestVariant>().is_err() {
                debug!(test_type = %name, "ignoring unknown test type in catalog");
            }
        }

        let settings = |variant: TestVariant| {
            document.test_types.get(variant.as_str()).ok_or_else(|| {
                Error::CatalogLoad(format!("missing test_types.{} configuration", variant))
            })
        };

        let short_settings = settings(TestVariant::Short)?;
        let full_settings = settings(TestVariant::Full)?;

        let short = QuestionSet::select(TestVariant::Short, &document.groups, short_settings)?;
        let full = QuestionSet::select(TestVariant::Full, &document.groups, full_settings)?;

        Ok(Self { short, full })
    }

    /// Selected questions of a variant.
    pub fn set(&self, variant: TestVariant) -> &QuestionSet {
        match variant {
            TestVariant::Short => &self.short,
            TestVariant::Full => &self.full,
        }
    }

    /// Ordered questions for a variant name such as `"short"`.
    pub fn questions_for(&self, variant: &str) -> Result<&[Question]> {
        Ok(self.set(variant.parse()?).questions())
    }

    /// Number of answers expected for a variant name.
    pub fn question_count(&self, variant: &str) -> Result<usize> {
        Ok(self.set(variant.parse()?).len())
    }
}
