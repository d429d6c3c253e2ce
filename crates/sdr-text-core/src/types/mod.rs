//! Core data types: patterns, labels and samples.

mod pattern;
mod sample;

pub use pattern::Pattern;
pub use sample::{Label, LabelVocabulary, Sample};
