//! Classification model: encoder, prototype classifier and winner selector.
//!
//! # Lifecycle per fold
//!
//! 1. [`ClassificationModel::reset_model`] clears learned prototypes
//! 2. [`ClassificationModel::train_model`] learns every non-empty pattern
//!    of a sample once per actual label
//! 3. [`ClassificationModel::test_model`] sums the votes of every pattern of
//!    a sample and selects the winning labels once
//!
//! Backends are chosen by [`ModelKind`] through [`ClassificationModel::from_config`].

mod encoding_log;

pub use encoding_log::{EncodingRecord, PatternRecord};

use std::path::Path;

use tracing::{debug, info, warn};

use crate::classifier::{FrequencyVector, PrototypeClassifier, WinnerSelector};
use crate::config::{ModelConfig, ModelKind};
use crate::encoders::{FingerprintCache, FingerprintEncoder, RandomSdrEncoder, TextEncoder};
use crate::error::SdrResult;
use crate::types::{Label, LabelVocabulary, Pattern, Sample};

/// Text classification model over a pluggable encoder backend.
pub struct ClassificationModel {
    encoder: Box<dyn TextEncoder>,
    classifier: PrototypeClassifier,
    selector: WinnerSelector,
    num_labels: usize,
}

impl ClassificationModel {
    /// Assemble a model from parts.
    pub fn new(
        encoder: Box<dyn TextEncoder>,
        classifier: PrototypeClassifier,
        selector: WinnerSelector,
        num_labels: usize,
    ) -> Self {
        Self {
            encoder,
            classifier,
            selector,
            num_labels,
        }
    }

    /// Build the backend named by `config.kind`.
    ///
    /// # Errors
    ///
    /// `ConfigError` when the configuration does not validate, or an IO /
    /// serialization error when the fingerprint cache cannot be read.
    pub fn from_config(config: &ModelConfig) -> SdrResult<Self> {
        config.validate()?;

        let encoder: Box<dyn TextEncoder> = match config.kind {
            ModelKind::RandomSdr | ModelKind::Keywords => {
                Box::new(RandomSdrEncoder::new(config.n, config.w)?)
            }
            ModelKind::Fingerprint => {
                let cache = match &config.fingerprint_cache {
                    Some(path) => FingerprintCache::load(path)?,
                    None => {
                        warn!("no fingerprint cache configured, every sample will use fallback patterns");
                        FingerprintCache::new()
                    }
                };
                Box::new(FingerprintEncoder::new(Box::new(cache), config.n, config.w)?)
            }
        };

        let classifier = PrototypeClassifier::new()
            .with_metric(config.metric)
            .with_k(config.k);

        info!(
            kind = %config.kind,
            n = config.n,
            w = config.w,
            num_labels = config.num_labels,
            metric = ?config.metric,
            k = ?config.k,
            "built classification model"
        );

        Ok(Self::new(
            encoder,
            classifier,
            WinnerSelector::new(config.tiebreak_seed),
            config.num_labels,
        ))
    }

    /// Encode the tokens of one sample.
    pub fn encode(&self, tokens: &[String]) -> Vec<Pattern> {
        self.encoder.encode(tokens)
    }

    /// Encode tokens and attach the sample's labels.
    pub fn encode_sample(&self, tokens: &[String], labels: impl IntoIterator<Item = Label>) -> Sample {
        Sample::new(self.encode(tokens), labels)
    }

    /// Forget every learned prototype.
    pub fn reset_model(&mut self) {
        self.classifier.reset();
    }

    /// Learn every non-empty pattern of `sample` under each of its labels.
    ///
    /// Returns the number of `(pattern, label)` pairs learned.
    pub fn train_model(&mut self, sample: &Sample) -> usize {
        let mut learned = 0;
        for pattern in sample.patterns.iter().filter(|p| !p.is_empty()) {
            for &label in &sample.labels {
                self.classifier.learn(pattern, label);
                learned += 1;
            }
        }
        if learned == 0 {
            debug!(patterns = sample.patterns.len(), "sample contributed no prototypes");
        }
        learned
    }

    /// Summed votes over every pattern of `sample`.
    pub fn infer_sample(&self, sample: &Sample) -> FrequencyVector {
        let mut votes = FrequencyVector::new();
        for pattern in &sample.patterns {
            votes.accumulate(&self.classifier.infer(pattern));
        }
        votes
    }

    /// Predict up to `num_labels` labels for `sample`.
    ///
    /// An untrained model, or a sample whose patterns match nothing,
    /// yields an empty prediction.
    pub fn test_model(&mut self, sample: &Sample, num_labels: usize) -> Vec<Label> {
        let votes = self.infer_sample(sample);
        self.selector.select_winners(&votes, num_labels)
    }

    /// Predict with the configured winner count.
    pub fn classify(&mut self, sample: &Sample) -> Vec<Label> {
        self.test_model(sample, self.num_labels)
    }

    /// Write every sample's patterns and label names as JSON.
    pub fn write_encodings(
        &self,
        path: &Path,
        samples: &[Sample],
        vocabulary: &LabelVocabulary,
    ) -> SdrResult<()> {
        encoding_log::write(path, samples, vocabulary)
    }

    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    pub fn prototype_count(&self) -> usize {
        self.classifier.len()
    }

    pub fn encoder_name(&self) -> &str {
        self.encoder.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::SimilarityMetric;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn model() -> ClassificationModel {
        let config = ModelConfig::random_sdr()
            .with_dimensions(1024, 20)
            .with_tiebreak_seed(3)
            .with_num_labels(1);
        ClassificationModel::from_config(&config).unwrap()
    }

    #[test]
    fn test_untrained_model_predicts_nothing() {
        let mut m = model();
        let sample = m.encode_sample(&tokens(&["fox"]), [0]);
        assert!(m.classify(&sample).is_empty());
    }

    #[test]
    fn test_train_learns_pattern_label_pairs() {
        let mut m = model();
        let sample = m.encode_sample(&tokens(&["fox", "eats"]), [0, 1]);
        assert_eq!(m.train_model(&sample), 4);
        assert_eq!(m.prototype_count(), 4);
    }

    #[test]
    fn test_empty_patterns_are_skipped() {
        let mut m = model();
        let sample = Sample::new(vec![Pattern::empty("gap", 1024)], [0]);
        assert_eq!(m.train_model(&sample), 0);
        assert_eq!(m.prototype_count(), 0);
    }

    #[test]
    fn test_reset_forgets() {
        let mut m = model();
        let sample = m.encode_sample(&tokens(&["fox"]), [0]);
        m.train_model(&sample);
        assert_eq!(m.classify(&sample), vec![0]);
        m.reset_model();
        assert!(m.classify(&sample).is_empty());
    }

    #[test]
    fn test_votes_sum_over_tokens() {
        let mut m = model();
        let a = m.encode_sample(&tokens(&["alpha"]), [0]);
        let b = m.encode_sample(&tokens(&["beta"]), [1]);
        m.train_model(&a);
        m.train_model(&b);
        m.train_model(&b);

        let query = m.encode_sample(&tokens(&["alpha", "beta"]), []);
        let votes = m.infer_sample(&query);
        assert!(votes.get(0) >= 20);
        assert!(votes.get(1) >= 40);
        assert_eq!(m.test_model(&query, 1), vec![1]);
    }

    #[test]
    fn test_keywords_backend_uses_exact_match() {
        let config = ModelConfig::keywords().with_num_labels(2).with_tiebreak_seed(1);
        let mut m = ClassificationModel::from_config(&config).unwrap();
        let trained = m.encode_sample(&tokens(&["goal", "match"]), [0]);
        m.train_model(&trained);

        let query = m.encode_sample(&tokens(&["goal"]), []);
        assert_eq!(m.infer_sample(&query).get(0), 1);
        assert_eq!(m.encoder_name(), "random_sdr");
        assert_eq!(config.metric, SimilarityMetric::ExactMatch);
    }

    #[test]
    fn test_fingerprint_backend_is_document_level() {
        let config = ModelConfig::fingerprint().with_tiebreak_seed(1);
        let m = ClassificationModel::from_config(&config).unwrap();
        assert_eq!(m.encode(&tokens(&["a", "b", "c"])).len(), 1);
        assert_eq!(m.encoder_name(), "fingerprint");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ModelConfig::random_sdr().with_dimensions(10, 20);
        let err = ClassificationModel::from_config(&config).err().unwrap();
        assert!(err.is_config_error());
    }
}
