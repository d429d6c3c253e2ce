//! JSON report generation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::RunSummary;
use crate::metrics::{ConfusionMatrix, LabelAccuracy};
use crate::runners::ExperimentResults;

/// Schema version of the JSON report.
pub const REPORT_VERSION: &str = "1.0";

/// Complete JSON report structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub metadata: ReportMetadata,
    pub summary: RunSummary,
    pub folds: Vec<FoldReport>,
    pub total_confusion: ConfusionMatrix,
    pub label_accuracy_by_train_size: BTreeMap<usize, Vec<LabelAccuracy>>,
}

/// Report metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub version: String,
    pub started_at: String,
    pub generated_at: String,
    pub encode_ms: u64,
}

/// Per-fold results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldReport {
    pub index: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub accuracy: f64,
    pub train_ms: u64,
    pub test_ms: u64,
    pub confusion: ConfusionMatrix,
}

impl From<&ExperimentResults> for JsonReport {
    fn from(results: &ExperimentResults) -> Self {
        Self {
            metadata: ReportMetadata {
                version: REPORT_VERSION.to_string(),
                started_at: results.started_at.to_rfc3339(),
                generated_at: chrono::Utc::now().to_rfc3339(),
                encode_ms: results.encode_ms,
            },
            summary: RunSummary::from(results),
            folds: results
                .folds
                .iter()
                .map(|f| FoldReport {
                    index: f.index,
                    train_size: f.train_size,
                    test_size: f.test_size,
                    accuracy: f.evaluation.accuracy,
                    train_ms: f.train_ms,
                    test_ms: f.test_ms,
                    confusion: f.evaluation.confusion.clone(),
                })
                .collect(),
            total_confusion: results.summary.total_confusion.clone(),
            label_accuracy_by_train_size: results.label_accuracy_by_train_size.clone(),
        }
    }
}

/// Generate pretty-printed JSON.
pub fn generate_json(results: &ExperimentResults) -> String {
    let report = JsonReport::from(results);
    serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to serialize report");
        format!("{{\"error\": \"{}\"}}", e)
    })
}
