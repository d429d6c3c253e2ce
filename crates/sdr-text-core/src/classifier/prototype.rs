//! Prototype store with overlap voting.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::FrequencyVector;
use crate::types::{Label, Pattern};

/// How a stored prototype is scored against a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    /// Number of shared active bits
    #[default]
    RawOverlap,
    /// One vote when the active bits are identical, none otherwise
    ExactMatch,
}

impl SimilarityMetric {
    fn score(self, query: &Pattern, prototype: &Pattern) -> u64 {
        match self {
            SimilarityMetric::RawOverlap => query.overlap(prototype) as u64,
            SimilarityMetric::ExactMatch => u64::from(query.same_bits(prototype)),
        }
    }
}

/// Stores `(pattern, label)` prototypes and votes for labels of similar ones.
#[derive(Debug, Clone, Default)]
pub struct PrototypeClassifier {
    prototypes: Vec<(Pattern, Label)>,
    metric: SimilarityMetric,
    k: Option<usize>,
}

impl PrototypeClassifier {
    /// Raw-overlap classifier where every prototype votes.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metric(mut self, metric: SimilarityMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Restrict voting to the `k` best-scoring prototypes.
    pub fn with_k(mut self, k: Option<usize>) -> Self {
        self.k = k;
        self
    }

    /// Store a prototype and return the number of stored prototypes.
    ///
    /// Duplicate `(pattern, label)` pairs are stored again and vote again.
    /// Empty patterns carry no information and are not stored.
    pub fn learn(&mut self, pattern: &Pattern, label: Label) -> usize {
        if pattern.is_empty() {
            debug!(text = %pattern.text, label, "skipping empty pattern");
        } else {
            self.prototypes.push((pattern.clone(), label));
        }
        self.prototypes.len()
    }

    /// Per-label votes for `query`.
    ///
    /// With no `k`, every prototype adds its score to its label. With `k`,
    /// only the `k` highest positive scores vote; equal scores keep
    /// insertion order. An empty store or empty query yields a zero vector.
    pub fn infer(&self, query: &Pattern) -> FrequencyVector {
        if query.is_empty() || self.prototypes.is_empty() {
            return FrequencyVector::new();
        }

        let mut scored: Vec<(u64, Label)> = self
            .prototypes
            .iter()
            .map(|(p, label)| (self.metric.score(query, p), *label))
            .filter(|(score, _)| *score > 0)
            .collect();

        if let Some(k) = self.k {
            scored.sort_by(|a, b| b.0.cmp(&a.0));
            scored.truncate(k);
        }

        scored.into_iter().map(|(score, label)| (label, score)).collect()
    }

    /// Remove every prototype.
    pub fn reset(&mut self) {
        self.prototypes.clear();
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }
}
