//! Winner selection with randomized tie-breaking.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use super::FrequencyVector;
use crate::types::Label;

/// Ranks labels by vote count, breaking ties at random.
///
/// The generator is owned by the selector and advanced on every call, so
/// repeated ties resolve differently while a seeded run stays reproducible.
#[derive(Debug, Clone)]
pub struct WinnerSelector {
    rng: ChaCha8Rng,
}

impl Default for WinnerSelector {
    fn default() -> Self {
        Self::new(None)
    }
}

impl WinnerSelector {
    /// Seeded selector, or entropy-seeded when `seed` is `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { rng }
    }

    /// Up to `num_labels` labels with positive votes, highest first.
    ///
    /// Each label gets a fresh uniform tiebreaker per call. Labels with zero
    /// votes never win, so the result may be shorter than `num_labels` or
    /// empty.
    pub fn select_winners(&mut self, votes: &FrequencyVector, num_labels: usize) -> Vec<Label> {
        let mut ranked: Vec<(Label, u64, f64)> = votes
            .iter()
            .filter(|(_, score)| *score > 0)
            .map(|(label, score)| (label, score, self.rng.gen::<f64>()))
            .collect();

        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.total_cmp(&b.2)));
        ranked.truncate(num_labels);
        ranked.into_iter().map(|(label, _, _)| label).collect()
    }
}
