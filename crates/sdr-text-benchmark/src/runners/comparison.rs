//! Side-by-side comparison of encoder backends.
//!
//! Runs the same split policy, seed and tokenizer once per [`ModelKind`] so
//! the backends are measured on identical folds. Each backend writes its
//! artifacts under `results_dir/<kind>`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use sdr_text_core::{ModelKind, SdrError, SdrResult};

use super::experiment::{ExperimentResults, ExperimentRunner};
use crate::config::ExperimentConfig;
use crate::datasets::LabeledDataset;

/// Results of every compared backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResults {
    pub runs: Vec<(ModelKind, ExperimentResults)>,
}

impl ComparisonResults {
    /// Backend with the highest mean accuracy; first listed wins ties.
    pub fn best(&self) -> Option<(ModelKind, f64)> {
        self.runs
            .iter()
            .map(|(kind, r)| (*kind, r.summary.mean_accuracy))
            .fold(None, |best, (kind, acc)| match best {
                Some((_, b)) if b >= acc => best,
                _ => Some((kind, acc)),
            })
    }
}

/// Runs one experiment per backend.
pub struct ComparisonRunner {
    base: ExperimentConfig,
    kinds: Vec<ModelKind>,
}

impl ComparisonRunner {
    /// Compare every backend using `base` for everything but the model.
    pub fn new(base: ExperimentConfig) -> Self {
        Self {
            base,
            kinds: ModelKind::all().to_vec(),
        }
    }

    pub fn with_kinds(mut self, kinds: Vec<ModelKind>) -> Self {
        self.kinds = kinds;
        self
    }

    /// Output directory for one backend's encoding log and classifications.
    pub fn results_dir_for(&self, kind: ModelKind) -> PathBuf {
        self.base.results_dir.join(kind.to_string())
    }

    pub fn run(&self, dataset: &LabeledDataset) -> SdrResult<ComparisonResults> {
        if self.kinds.is_empty() {
            return Err(SdrError::ConfigError("no model kinds to compare".into()));
        }
        let mut runs = Vec::with_capacity(self.kinds.len());
        for &kind in &self.kinds {
            let config = ExperimentConfig {
                name: format!("{}-{}", self.base.name, kind),
                model: self.base.model.switch_kind(kind),
                results_dir: self.results_dir_for(kind),
                ..self.base.clone()
            };
            let results = ExperimentRunner::new(config)?.run(dataset)?;
            info!(%kind, mean = results.summary.mean_accuracy, "backend evaluated");
            runs.push((kind, results));
        }
        Ok(ComparisonResults { runs })
    }
}
