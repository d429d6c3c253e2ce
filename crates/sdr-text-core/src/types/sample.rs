//! Labels, label vocabulary and encoded samples.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::Pattern;
use crate::error::{SdrError, SdrResult};

/// Index into a [`LabelVocabulary`].
pub type Label = usize;

/// Ordered, append-only mapping between label strings and label indices.
///
/// Indices follow first appearance, so a vocabulary built from the same
/// records always assigns the same index to the same label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelVocabulary {
    names: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, Label>,
}

impl LabelVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vocabulary from per-sample label lists, in first-appearance order.
    pub fn from_label_lists<I, L, S>(lists: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab = Self::new();
        for list in lists {
            for name in list {
                vocab.intern(name.as_ref());
            }
        }
        vocab
    }

    /// Return the index of `name`, adding it if unseen.
    pub fn intern(&mut self, name: &str) -> Label {
        if let Some(&label) = self.index.get(name) {
            return label;
        }
        let label = self.names.len();
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), label);
        label
    }

    /// Index of an existing label.
    pub fn get(&self, name: &str) -> Option<Label> {
        self.index.get(name).copied()
    }

    /// Name of a label index.
    pub fn name(&self, label: Label) -> SdrResult<&str> {
        self.names
            .get(label)
            .map(String::as_str)
            .ok_or(SdrError::UnknownLabel {
                label,
                vocabulary_size: self.names.len(),
            })
    }

    /// Map label strings to a label set; unknown names are an error.
    pub fn encode_labels<S: AsRef<str>>(&self, names: &[S]) -> SdrResult<BTreeSet<Label>> {
        names
            .iter()
            .map(|n| {
                self.get(n.as_ref()).ok_or_else(|| {
                    SdrError::InvalidInput(format!("label '{}' not in vocabulary", n.as_ref()))
                })
            })
            .collect()
    }

    /// Label names in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Rebuild the lookup index after deserialization.
    pub fn reindex(&mut self) {
        self.index = self
            .names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
    }
}

/// An encoded sample: its patterns and its actual labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// One pattern per token, or a single pattern for document-level encoders
    pub patterns: Vec<Pattern>,
    /// Actual labels of the sample
    pub labels: BTreeSet<Label>,
}

impl Sample {
    pub fn new(patterns: Vec<Pattern>, labels: impl IntoIterator<Item = Label>) -> Self {
        Self {
            patterns,
            labels: labels.into_iter().collect(),
        }
    }

    /// Number of patterns that can be learned (non-empty).
    pub fn learnable_patterns(&self) -> usize {
        self.patterns.iter().filter(|p| !p.is_empty()).count()
    }
}
