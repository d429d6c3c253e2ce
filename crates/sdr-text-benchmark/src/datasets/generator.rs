//! Synthetic labeled corpus generator.
//!
//! Each topic owns a vocabulary of pseudo-words; samples draw words from
//! their topic's vocabulary with a Zipf distribution, plus a few words from
//! a shared background vocabulary. A configurable fraction of samples mixes
//! two topics and carries both labels.

use std::collections::HashSet;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Zipf;

use super::{LabeledDataset, LabeledRecord};

const CONSONANTS: &[u8] = b"bcdfghjklmnprstvz";
const VOWELS: &[u8] = b"aeiou";

/// Configuration for corpus generation.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Random seed.
    pub seed: u64,
    /// Number of samples.
    pub num_samples: usize,
    /// Number of topics (labels).
    pub num_topics: usize,
    /// Distinct words per topic.
    pub words_per_topic: usize,
    /// Distinct background words shared by all topics.
    pub background_words: usize,
    /// Inclusive range of topic words per sample.
    pub min_words: usize,
    pub max_words: usize,
    /// Background words added to each sample.
    pub noise_words: usize,
    /// Zipf exponent for word draws.
    pub zipf_exponent: f64,
    /// Fraction of samples carrying two labels.
    pub multi_label_fraction: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_samples: 200,
            num_topics: 4,
            words_per_topic: 40,
            background_words: 30,
            min_words: 4,
            max_words: 10,
            noise_words: 2,
            zipf_exponent: 1.1,
            multi_label_fraction: 0.1,
        }
    }
}

/// Generates labeled synthetic text.
pub struct CorpusGenerator {
    config: GeneratorConfig,
    rng: ChaCha8Rng,
}

impl CorpusGenerator {
    pub fn new(seed: u64) -> Self {
        Self::with_config(GeneratorConfig {
            seed,
            ..Default::default()
        })
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Topic label name.
    pub fn topic_name(topic: usize) -> String {
        format!("topic_{}", topic)
    }

    fn pseudo_word(&mut self, used: &mut HashSet<String>) -> String {
        loop {
            let syllables = self.rng.gen_range(2..=4);
            let mut word = String::with_capacity(syllables * 2);
            for _ in 0..syllables {
                word.push(*CONSONANTS.choose(&mut self.rng).unwrap_or(&b'k') as char);
                word.push(*VOWELS.choose(&mut self.rng).unwrap_or(&b'a') as char);
            }
            if used.insert(word.clone()) {
                return word;
            }
        }
    }

    fn vocabulary(&mut self, size: usize, used: &mut HashSet<String>) -> Vec<String> {
        (0..size).map(|_| self.pseudo_word(used)).collect()
    }

    fn draw(&mut self, words: &[String], zipf: &Zipf<f64>) -> String {
        let rank = zipf.sample(&mut self.rng) as usize;
        words[rank.clamp(1, words.len()) - 1].clone()
    }

    /// Generate a dataset. Topics with no words produce empty samples.
    pub fn generate(&mut self) -> LabeledDataset {
        let cfg = self.config.clone();
        let topics = cfg.num_topics.max(1);
        let per_topic = cfg.words_per_topic.max(1);

        let mut used = HashSet::new();
        let topic_words: Vec<Vec<String>> =
            (0..topics).map(|_| self.vocabulary(per_topic, &mut used)).collect();
        let background = self.vocabulary(cfg.background_words, &mut used);

        let exponent = if cfg.zipf_exponent > 0.0 { cfg.zipf_exponent } else { 1.0 };
        let topic_zipf = Zipf::new(per_topic as u64, exponent).ok();
        let background_zipf = Zipf::new(cfg.background_words.max(1) as u64, exponent).ok();

        let min_words = cfg.min_words.max(1);
        let max_words = cfg.max_words.max(min_words);

        let records = (0..cfg.num_samples)
            .map(|_| {
                let primary = self.rng.gen_range(0..topics);
                let mut labels = vec![primary];
                if topics > 1 && self.rng.gen_bool(cfg.multi_label_fraction.clamp(0.0, 1.0)) {
                    let mut second = self.rng.gen_range(0..topics - 1);
                    if second >= primary {
                        second += 1;
                    }
                    labels.push(second);
                }

                let count = self.rng.gen_range(min_words..=max_words);
                let mut words = Vec::with_capacity(count + cfg.noise_words);
                for i in 0..count {
                    let topic = labels[i % labels.len()];
                    if let Some(z) = &topic_zipf {
                        words.push(self.draw(&topic_words[topic], z));
                    }
                }
                if !background.is_empty() {
                    if let Some(z) = &background_zipf {
                        for _ in 0..cfg.noise_words {
                            words.push(self.draw(&background, z));
                        }
                    }
                }
                words.shuffle(&mut self.rng);

                LabeledRecord::new(
                    words.join(" "),
                    labels.into_iter().map(Self::topic_name),
                )
            })
            .collect();

        LabeledDataset::new(format!("synthetic_{}", cfg.seed), records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_seeded() {
        let a = CorpusGenerator::new(9).generate();
        let b = CorpusGenerator::new(9).generate();
        let c = CorpusGenerator::new(10).generate();
        assert_eq!(a, b);
        assert_ne!(a.records, c.records);
    }

    #[test]
    fn test_sample_count_and_labels() {
        let ds = CorpusGenerator::with_config(GeneratorConfig {
            num_samples: 50,
            num_topics: 3,
            ..Default::default()
        })
        .generate();
        assert_eq!(ds.len(), 50);
        assert!(ds.vocabulary().len() <= 3);
        for r in &ds.records {
            assert!(!r.labels.is_empty() && r.labels.len() <= 2);
            assert!(!r.text.is_empty());
        }
    }

    #[test]
    fn test_multi_label_fraction_extremes() {
        let single = CorpusGenerator::with_config(GeneratorConfig {
            multi_label_fraction: 0.0,
            ..Default::default()
        })
        .generate();
        assert_eq!(single.multi_label_count(), 0);

        let all = CorpusGenerator::with_config(GeneratorConfig {
            multi_label_fraction: 1.0,
            ..Default::default()
        })
        .generate();
        assert_eq!(all.multi_label_count(), all.len());
    }

    #[test]
    fn test_words_survive_tokenization() {
        use sdr_text_core::{TextPreprocessor, Tokenizer};
        let ds = CorpusGenerator::new(1).generate();
        let tokenizer = TextPreprocessor::default();
        let text = &ds.records[0].text;
        assert_eq!(tokenizer.tokenize(text).join(" "), *text);
    }
}
