//! Nearest-prototype classification.
//!
//! [`PrototypeClassifier`] stores labeled patterns and turns a query pattern
//! into a [`FrequencyVector`] of per-label votes. [`WinnerSelector`] ranks
//! that vector into an ordered list of winning labels.

mod frequency;
mod prototype;
mod winner;

pub use frequency::FrequencyVector;
pub use prototype::{PrototypeClassifier, SimilarityMetric};
pub use winner::WinnerSelector;
