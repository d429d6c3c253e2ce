//! # sdr-text Benchmark Suite
//!
//! Cross-validated evaluation of sparse-pattern text classifiers.
//!
//! ## Flow
//!
//! 1. Load a labeled CSV or generate a synthetic corpus
//! 2. Tokenize and encode every sample once
//! 3. For each fold: reset, train on the training indices, classify the
//!    test indices, evaluate
//! 4. Combine folds into max/mean/min accuracy and a summed confusion matrix
//!
//! ## Metrics Tracked
//!
//! - **Accuracy**: `|predicted ∩ actual| / |actual|`, averaged per fold
//! - **Confusion**: label × label counts with a `(none)` slot
//! - **Per-label accuracy**: grouped by training-set size
//!
//! ## Usage
//!
//! ```bash
//! # 5-fold cross-validation on a CSV file
//! cargo run -p sdr-text-benchmark --bin sdr-text-bench -- --data survey.csv --k-folds 5
//!
//! # Training-size sweep on synthetic data, Markdown report
//! cargo run -p sdr-text-benchmark --bin sdr-text-bench -- --synthetic 300 --train-sizes 50,100,200 --format markdown
//!
//! # Compare every backend
//! cargo run -p sdr-text-benchmark --bin sdr-text-bench -- --synthetic 300 --compare
//! ```

pub mod config;
pub mod datasets;
pub mod metrics;
pub mod reports;
pub mod runners;
pub mod splits;

pub use config::{CsvLayout, ExperimentConfig, SplitPolicy};
pub use datasets::{load_csv, CorpusGenerator, GeneratorConfig, LabeledDataset, LabeledRecord, LoadError};
pub use metrics::{
    evaluate_experiment, evaluate_fold, ConfusionMatrix, ExperimentSummary, FoldEvaluation,
    LabelAccuracy,
};
pub use reports::{ExperimentReport, ReportFormat};
pub use runners::{ComparisonResults, ComparisonRunner, ExperimentResults, ExperimentRunner};
pub use splits::{CrossValidationSplitter, Fold};
