//! Evaluation metrics.
//!
//! - **Fold**: recall-style accuracy, confusion matrix, per-label accuracy
//! - **Experiment**: max/mean/min fold accuracy and the summed confusion matrix

pub mod classification;

pub use classification::{
    aggregate_label_accuracy, evaluate_experiment, evaluate_fold, sample_accuracy,
    ConfusionMatrix, ExperimentSummary, FoldEvaluation, LabelAccuracy, NONE_LABEL,
};
