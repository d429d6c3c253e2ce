//! Multi-label classification metrics.
//!
//! # Accuracy
//!
//! Per sample, `|predicted ∩ actual| / |actual|`; a fold's accuracy is the
//! mean over its samples. Extra predicted labels are not penalised, so a
//! sample that predicts every label scores 1.0.
//!
//! # Confusion matrix
//!
//! Square over the label vocabulary plus a trailing `(none)` slot. Every
//! `(actual, predicted)` pair of a sample increments its cell; a sample with
//! no prediction increments `(actual, none)` for each actual label.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use sdr_text_core::{Label, LabelVocabulary, SdrError, SdrResult};

/// Header used for the empty-prediction slot.
pub const NONE_LABEL: &str = "(none)";

/// Label confusion counts with a `(none)` slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    labels: Vec<String>,
    counts: Vec<Vec<u64>>,
}

impl ConfusionMatrix {
    /// Zero matrix over `labels`.
    pub fn new(labels: &[String]) -> Self {
        let dim = labels.len() + 1;
        Self {
            labels: labels.to_vec(),
            counts: vec![vec![0; dim]; dim],
        }
    }

    pub fn for_vocabulary(vocabulary: &LabelVocabulary) -> Self {
        Self::new(vocabulary.names())
    }

    /// Side length, vocabulary size plus one.
    pub fn dim(&self) -> usize {
        self.counts.len()
    }

    /// Index of the `(none)` slot.
    pub fn none_index(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Count at `(actual, predicted)`.
    pub fn get(&self, actual: usize, predicted: usize) -> u64 {
        self.counts
            .get(actual)
            .and_then(|row| row.get(predicted))
            .copied()
            .unwrap_or(0)
    }

    fn check(&self, label: Label) -> SdrResult<()> {
        if label >= self.labels.len() {
            return Err(SdrError::UnknownLabel {
                label,
                vocabulary_size: self.labels.len(),
            });
        }
        Ok(())
    }

    /// Record one sample.
    pub fn record(&mut self, actual: &BTreeSet<Label>, predicted: &[Label]) -> SdrResult<()> {
        for &label in actual.iter().chain(predicted) {
            self.check(label)?;
        }
        let none = self.none_index();
        for &a in actual {
            if predicted.is_empty() {
                self.counts[a][none] += 1;
            } else {
                for &p in predicted {
                    self.counts[a][p] += 1;
                }
            }
        }
        Ok(())
    }

    /// Elementwise sum.
    pub fn add(&mut self, other: &ConfusionMatrix) -> SdrResult<()> {
        if other.dim() != self.dim() {
            return Err(SdrError::DimensionMismatch {
                expected: self.dim(),
                actual: other.dim(),
            });
        }
        for (row, other_row) in self.counts.iter_mut().zip(&other.counts) {
            for (cell, &v) in row.iter_mut().zip(other_row) {
                *cell += v;
            }
        }
        Ok(())
    }

    /// Sum of each row.
    pub fn row_totals(&self) -> Vec<u64> {
        self.counts.iter().map(|r| r.iter().sum()).collect()
    }

    /// Sum of each column.
    pub fn column_totals(&self) -> Vec<u64> {
        (0..self.dim())
            .map(|c| self.counts.iter().map(|r| r[c]).sum())
            .collect()
    }

    pub fn total(&self) -> u64 {
        self.row_totals().iter().sum()
    }

    /// Rendered table: header row of labels, one row per actual label with
    /// its total, and a final row of column totals.
    pub fn to_table(&self) -> Vec<Vec<String>> {
        let mut headers: Vec<String> = vec![String::new()];
        headers.extend(self.labels.iter().cloned());
        headers.push(NONE_LABEL.to_string());
        headers.push("total".to_string());

        let mut table = vec![headers];
        let row_totals = self.row_totals();
        for (i, row) in self.counts.iter().enumerate() {
            let name = self
                .labels
                .get(i)
                .cloned()
                .unwrap_or_else(|| NONE_LABEL.to_string());
            let mut line = vec![name];
            line.extend(row.iter().map(u64::to_string));
            line.push(row_totals[i].to_string());
            table.push(line);
        }

        let mut totals = vec!["total".to_string()];
        totals.extend(self.column_totals().iter().map(u64::to_string));
        totals.push(self.total().to_string());
        table.push(totals);
        table
    }
}

/// Accuracy restricted to samples carrying one label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelAccuracy {
    pub label: Label,
    pub name: String,
    /// Mean per-sample accuracy over samples whose actual set holds the label
    pub accuracy: f64,
    /// Number of such samples
    pub support: usize,
}

/// Metrics of one fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldEvaluation {
    pub accuracy: f64,
    pub sample_accuracies: Vec<f64>,
    pub confusion: ConfusionMatrix,
    pub label_accuracies: Vec<LabelAccuracy>,
}

/// Cumulative metrics over every evaluated fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub max_accuracy: f64,
    pub mean_accuracy: f64,
    pub min_accuracy: f64,
    pub folds: usize,
    pub total_confusion: ConfusionMatrix,
}

/// Fraction of a sample's actual labels that were predicted.
///
/// `None` when `actual` is empty, since such a sample has no defined accuracy.
pub fn sample_accuracy(predicted: &[Label], actual: &BTreeSet<Label>) -> Option<f64> {
    if actual.is_empty() {
        return None;
    }
    let predicted: BTreeSet<Label> = predicted.iter().copied().collect();
    Some(predicted.intersection(actual).count() as f64 / actual.len() as f64)
}

/// Evaluate one fold.
///
/// # Errors
///
/// - `LengthMismatch` when `predicted` and `actual` differ in length
/// - `EmptyLabels` when a sample has no actual label
/// - `UnknownLabel` when a label is outside the vocabulary
/// - `InvalidInput` when the fold has no samples
pub fn evaluate_fold(
    predicted: &[Vec<Label>],
    actual: &[BTreeSet<Label>],
    vocabulary: &LabelVocabulary,
) -> SdrResult<FoldEvaluation> {
    if predicted.len() != actual.len() {
        return Err(SdrError::length_mismatch(
            "predicted",
            predicted.len(),
            "actual",
            actual.len(),
        ));
    }
    if actual.is_empty() {
        return Err(SdrError::InvalidInput("cannot evaluate an empty fold".into()));
    }

    let mut confusion = ConfusionMatrix::for_vocabulary(vocabulary);
    let mut sample_accuracies = Vec::with_capacity(actual.len());
    let mut per_label: BTreeMap<Label, (f64, usize)> = BTreeMap::new();

    for (i, (p, a)) in predicted.iter().zip(actual).enumerate() {
        let acc = sample_accuracy(p, a).ok_or(SdrError::EmptyLabels { index: i })?;
        confusion.record(a, p)?;
        sample_accuracies.push(acc);
        for &label in a {
            let entry = per_label.entry(label).or_insert((0.0, 0));
            entry.0 += acc;
            entry.1 += 1;
        }
    }

    let accuracy = sample_accuracies.iter().sum::<f64>() / sample_accuracies.len() as f64;
    let label_accuracies = per_label
        .into_iter()
        .map(|(label, (sum, support))| {
            Ok(LabelAccuracy {
                label,
                name: vocabulary.name(label)?.to_string(),
                accuracy: sum / support as f64,
                support,
            })
        })
        .collect::<SdrResult<Vec<_>>>()?;

    Ok(FoldEvaluation {
        accuracy,
        sample_accuracies,
        confusion,
        label_accuracies,
    })
}

/// Combine fold evaluations into max/mean/min accuracy and a summed matrix.
///
/// # Errors
///
/// `InvalidInput` for an empty slice, `DimensionMismatch` when the folds'
/// matrices disagree in size.
pub fn evaluate_experiment(folds: &[FoldEvaluation]) -> SdrResult<ExperimentSummary> {
    let first = folds
        .first()
        .ok_or_else(|| SdrError::InvalidInput("no folds to summarize".into()))?;

    let mut total_confusion = first.confusion.clone();
    for fold in &folds[1..] {
        total_confusion.add(&fold.confusion)?;
    }

    let accuracies: Vec<f64> = folds.iter().map(|f| f.accuracy).collect();
    let max_accuracy = accuracies.iter().copied().fold(f64::MIN, f64::max);
    let min_accuracy = accuracies.iter().copied().fold(f64::MAX, f64::min);
    let mean_accuracy = accuracies.iter().sum::<f64>() / accuracies.len() as f64;

    Ok(ExperimentSummary {
        max_accuracy,
        mean_accuracy,
        min_accuracy,
        folds: folds.len(),
        total_confusion,
    })
}

/// Average each label's accuracy across several folds, weighting by support.
pub fn aggregate_label_accuracy<'a, I>(folds: I) -> Vec<LabelAccuracy>
where
    I: IntoIterator<Item = &'a FoldEvaluation>,
{
    let mut acc: BTreeMap<Label, (String, f64, usize)> = BTreeMap::new();
    for fold in folds {
        for la in &fold.label_accuracies {
            let entry = acc.entry(la.label).or_insert((la.name.clone(), 0.0, 0));
            entry.1 += la.accuracy * la.support as f64;
            entry.2 += la.support;
        }
    }
    acc.into_iter()
        .map(|(label, (name, sum, support))| LabelAccuracy {
            label,
            name,
            accuracy: if support == 0 { 0.0 } else { sum / support as f64 },
            support,
        })
        .collect()
}
