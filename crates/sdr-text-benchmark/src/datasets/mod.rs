//! Labeled text datasets.
//!
//! Samples come either from a CSV file ([`load_csv`]) or from the seeded
//! synthetic corpus generator ([`CorpusGenerator`]).

mod csv_loader;
mod generator;

pub use csv_loader::{load_csv, read_csv};
pub use generator::{CorpusGenerator, GeneratorConfig};

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sdr_text_core::{Label, LabelVocabulary};

/// One raw sample and its label names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledRecord {
    pub text: String,
    /// Label names, unique, in column order
    pub labels: Vec<String>,
}

impl LabeledRecord {
    pub fn new<S: Into<String>>(text: impl Into<String>, labels: impl IntoIterator<Item = S>) -> Self {
        let mut seen = BTreeSet::new();
        let labels = labels
            .into_iter()
            .map(Into::into)
            .filter(|l: &String| seen.insert(l.clone()))
            .collect();
        Self {
            text: text.into(),
            labels,
        }
    }
}

/// A named collection of labeled records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabeledDataset {
    pub name: String,
    pub records: Vec<LabeledRecord>,
}

impl LabeledDataset {
    pub fn new(name: impl Into<String>, records: Vec<LabeledRecord>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Label vocabulary in first-appearance order.
    pub fn vocabulary(&self) -> LabelVocabulary {
        LabelVocabulary::from_label_lists(self.records.iter().map(|r| r.labels.iter()))
    }

    /// Label index sets per record.
    pub fn label_sets(&self, vocabulary: &LabelVocabulary) -> Vec<BTreeSet<Label>> {
        self.records
            .iter()
            .map(|r| r.labels.iter().filter_map(|l| vocabulary.get(l)).collect())
            .collect()
    }

    /// Number of records carrying more than one label.
    pub fn multi_label_count(&self) -> usize {
        self.records.iter().filter(|r| r.labels.len() > 1).count()
    }
}

/// Errors raised while loading a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// IO error reading or writing a file
    #[error("IO error reading {}: {error}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Malformed CSV
    #[error("CSV error in {}: {error}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        error: csv::Error,
    },

    /// A configured column is missing from the header
    #[error("Column '{column}' not found in {}", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// The file has a header but not enough columns for text and labels
    #[error("{} needs a text column and at least one label column, found {columns} columns", .path.display())]
    TooFewColumns { path: PathBuf, columns: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_dedups_labels() {
        let r = LabeledRecord::new("text", ["b", "a", "b"]);
        assert_eq!(r.labels, vec!["b", "a"]);
    }

    #[test]
    fn test_vocabulary_and_label_sets() {
        let ds = LabeledDataset::new(
            "toy",
            vec![
                LabeledRecord::new("fox", ["animal"]),
                LabeledRecord::new("fox eats", ["action", "animal"]),
            ],
        );
        let vocab = ds.vocabulary();
        assert_eq!(vocab.names(), &["animal", "action"]);
        let sets = ds.label_sets(&vocab);
        assert_eq!(sets[1], BTreeSet::from([0, 1]));
        assert_eq!(ds.multi_label_count(), 1);
    }

    #[test]
    fn test_load_error_display() {
        let err = LoadError::MissingColumn {
            path: PathBuf::from("data.csv"),
            column: "Response".into(),
        };
        assert!(err.to_string().contains("Response"));
        assert!(err.to_string().contains("data.csv"));
    }
}
