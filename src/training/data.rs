//! Training corpus loading and splitting.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use crate::dimension::PersonalityType;
use crate::error::{Error, Result};
use crate::text::clean_text;

/// One row of the corpus: a 4-letter label and the author's posts.
#[derive(Debug, Deserialize, Clone)]
pub struct MbtiRecord {
    #[serde(rename = "type")]
    pub mbti_type: String,
    pub posts: String,
}

/// A record with its label parsed and its posts cleaned.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledDocument {
    pub label: PersonalityType,
    pub text: String,
}

impl LabeledDocument {
    pub fn from_record(record: &MbtiRecord) -> Result<Self> {
        Ok(Self {
            label: record.mbti_type.trim().parse()?,
            text: clean_text(&record.posts),
        })
    }
}

pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<MbtiRecord>> {
    let file = File::open(path.as_ref())?;
    read_records(file)
}

pub fn read_records<R: Read>(reader: R) -> Result<Vec<MbtiRecord>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let records: Vec<MbtiRecord> = rdr.deserialize().collect::<std::result::Result<_, _>>()?;
    Ok(records)
}

/// Shuffle `documents` and cut them at `train_split`.
///
/// Both halves must be non-empty.
pub fn split<R: Rng>(
    mut documents: Vec<LabeledDocument>,
    train_split: f64,
    rng: &mut R,
) -> Result<(Vec<LabeledDocument>, Vec<LabeledDocument>)> {
    if documents.is_empty() {
        return Err(Error::Training("training corpus is empty".into()));
    }
    documents.shuffle(rng);
    let cut = (documents.len() as f64 * train_split) as usize;
    if cut == 0 || cut == documents.len() {
        return Err(Error::Training(format!(
            "train_split {} leaves an empty split over {} documents",
            train_split,
            documents.len()
        )));
    }
    let test = documents.split_off(cut);
    Ok((documents, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const CSV: &str = "type,posts\n\
                       INTJ,\"Planning ahead http://a.b/c is what I do ||| Systems!\"\n\
                       ESFP,Party tonight with everyone\n";

    #[test]
    fn test_read_records() {
        let records = read_records(CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].mbti_type, "INTJ");
        assert!(records[0].posts.contains("|||"));
    }

    #[test]
    fn test_labeled_document_cleans_posts() {
        let records = read_records(CSV.as_bytes()).unwrap();
        let doc = LabeledDocument::from_record(&records[0]).unwrap();
        assert_eq!(doc.label.to_string(), "INTJ");
        assert_eq!(doc.text, "planning ahead systems");
    }

    #[test]
    fn test_bad_label_is_rejected() {
        let record = MbtiRecord {
            mbti_type: "XYZW".into(),
            posts: "whatever".into(),
        };
        assert!(matches!(
            LabeledDocument::from_record(&record),
            Err(Error::InvalidLabel(_))
        ));
    }

    #[test]
    fn test_missing_column_is_csv_error() {
        let result = read_records("label,text\nINTJ,hello\n".as_bytes());
        assert!(matches!(result, Err(Error::Csv(_))));
    }

    #[test]
    fn test_split_is_seeded() {
        let docs: Vec<LabeledDocument> = (0..10)
            .map(|i| LabeledDocument {
                label: "INTJ".parse().unwrap(),
                text: format!("doc{}", i),
            })
            .collect();
        let (train_a, test_a) = split(docs.clone(), 0.8, &mut StdRng::seed_from_u64(42)).unwrap();
        let (train_b, test_b) = split(docs.clone(), 0.8, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(train_a.len(), 8);
        assert_eq!(test_a.len(), 2);
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);

        assert!(split(docs[..1].to_vec(), 0.8, &mut StdRng::seed_from_u64(1)).is_err());
        assert!(split(Vec::new(), 0.8, &mut StdRng::seed_from_u64(1)).is_err());
    }
}
