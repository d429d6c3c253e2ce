//! JSON log of encoded samples.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SdrError, SdrResult};
use crate::types::{LabelVocabulary, Sample};

/// One encoded pattern in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRecord {
    pub text: String,
    pub sparsity: f64,
    pub bits: Vec<u32>,
}

/// One sample in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingRecord {
    pub index: usize,
    pub labels: Vec<String>,
    pub patterns: Vec<PatternRecord>,
}

impl EncodingRecord {
    pub fn from_sample(
        index: usize,
        sample: &Sample,
        vocabulary: &LabelVocabulary,
    ) -> SdrResult<Self> {
        let labels = sample
            .labels
            .iter()
            .map(|&l| vocabulary.name(l).map(str::to_string))
            .collect::<SdrResult<Vec<_>>>()?;
        let patterns = sample
            .patterns
            .iter()
            .map(|p| PatternRecord {
                text: p.text.clone(),
                sparsity: p.sparsity,
                bits: p.bits().to_vec(),
            })
            .collect();
        Ok(Self {
            index,
            labels,
            patterns,
        })
    }
}

pub(super) fn write(path: &Path, samples: &[Sample], vocabulary: &LabelVocabulary) -> SdrResult<()> {
    let records = samples
        .iter()
        .enumerate()
        .map(|(i, s)| EncodingRecord::from_sample(i, s, vocabulary))
        .collect::<SdrResult<Vec<_>>>()?;
    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(path, json).map_err(|e| SdrError::io(path, e))?;
    tracing::info!(path = %path.display(), samples = records.len(), "wrote encoding log");
    Ok(())
}
