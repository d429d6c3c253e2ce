use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Label;

/// Per-label vote totals for one inference.
///
/// Labels that received no vote are absent and read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyVector {
    scores: BTreeMap<Label, u64>,
}

impl FrequencyVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `score` to `label`. Zero scores are not recorded.
    pub fn add(&mut self, label: Label, score: u64) {
        if score > 0 {
            *self.scores.entry(label).or_insert(0) += score;
        }
    }

    /// Score of `label`, zero when absent.
    pub fn get(&self, label: Label) -> u64 {
        self.scores.get(&label).copied().unwrap_or(0)
    }

    /// Elementwise sum with another vector.
    pub fn accumulate(&mut self, other: &FrequencyVector) {
        for (&label, &score) in &other.scores {
            self.add(label, score);
        }
    }

    /// Labels with a positive score, in label order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, u64)> + '_ {
        self.scores.iter().map(|(&l, &s)| (l, s))
    }

    /// True when every label scores zero.
    pub fn is_zero(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.scores.values().sum()
    }
}

impl FromIterator<(Label, u64)> for FrequencyVector {
    fn from_iter<T: IntoIterator<Item = (Label, u64)>>(iter: T) -> Self {
        let mut v = Self::new();
        for (label, score) in iter {
            v.add(label, score);
        }
        v
    }
}
