//! Experiment runners.
//!
//! [`ExperimentRunner`] evaluates one model configuration over the folds of a
//! split policy; [`ComparisonRunner`] repeats that for several backends.

pub mod comparison;
pub mod experiment;

pub use comparison::{ComparisonResults, ComparisonRunner};
pub use experiment::{
    ClassificationRecord, ExperimentResults, ExperimentRunner, FoldResult, ENCODING_LOG_FILE,
};
