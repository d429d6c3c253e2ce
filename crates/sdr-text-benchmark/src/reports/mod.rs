//! Report generation for experiment results.
//!
//! Supports JSON for automated comparison and Markdown for reading. Per-fold
//! classifications are written separately as CSV.

pub mod classifications;
pub mod json;
pub mod markdown;

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::runners::ExperimentResults;

/// Report format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// JSON for automated analysis.
    Json,
    /// Markdown tables for reading.
    Markdown,
    /// Both formats.
    Both,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "both" => Ok(ReportFormat::Both),
            other => Err(format!("unknown report format '{}'", other)),
        }
    }
}

/// Experiment report generator.
pub struct ExperimentReport {
    results: ExperimentResults,
}

impl ExperimentReport {
    pub fn new(results: ExperimentResults) -> Self {
        Self { results }
    }

    /// Generate report in specified format.
    pub fn generate(&self, format: ReportFormat) -> ReportOutput {
        let json = matches!(format, ReportFormat::Json | ReportFormat::Both)
            .then(|| json::generate_json(&self.results));
        let markdown = matches!(format, ReportFormat::Markdown | ReportFormat::Both)
            .then(|| markdown::generate_markdown(&self.results));
        ReportOutput { json, markdown }
    }

    /// Write report to `base_path` with `.json` / `.md` extensions.
    pub fn write_to_file(&self, format: ReportFormat, base_path: &Path) -> std::io::Result<()> {
        let output = self.generate(format);

        if let Some(parent) = base_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        if let Some(json_content) = output.json {
            std::fs::write(base_path.with_extension("json"), json_content)?;
        }

        if let Some(md_content) = output.markdown {
            std::fs::write(base_path.with_extension("md"), md_content)?;
        }

        Ok(())
    }

    /// Write one classifications CSV per fold into `dir`.
    pub fn write_classifications(&self, dir: &Path) -> std::io::Result<Vec<std::path::PathBuf>> {
        classifications::write_all(&self.results, dir)
    }

    pub fn results(&self) -> &ExperimentResults {
        &self.results
    }
}

/// Generated report output.
#[derive(Debug, Clone)]
pub struct ReportOutput {
    /// JSON report content (if generated).
    pub json: Option<String>,
    /// Markdown report content (if generated).
    pub markdown: Option<String>,
}

/// Headline numbers of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub experiment: String,
    pub dataset: String,
    pub encoder: String,
    pub samples: usize,
    pub labels: usize,
    pub folds: usize,
    pub seed: u64,
    pub max_accuracy: f64,
    pub mean_accuracy: f64,
    pub min_accuracy: f64,
}

impl From<&ExperimentResults> for RunSummary {
    fn from(results: &ExperimentResults) -> Self {
        Self {
            run_id: results.run_id.to_string(),
            experiment: results.config.name.clone(),
            dataset: results.dataset_name.clone(),
            encoder: results.encoder.clone(),
            samples: results.sample_count,
            labels: results.labels.len(),
            folds: results.summary.folds,
            seed: results.config.seed,
            max_accuracy: results.summary.max_accuracy,
            mean_accuracy: results.summary.mean_accuracy,
            min_accuracy: results.summary.min_accuracy,
        }
    }
}
