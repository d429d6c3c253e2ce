//! Deterministic pseudo-random patterns seeded by text.

use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

use super::{Granularity, TextEncoder};
use crate::error::{SdrError, SdrResult};
use crate::types::Pattern;

/// Pattern of `w` active bits out of `n`, fully determined by `text`.
///
/// The generator is local to the call and seeded with the SHA-256 digest of
/// the text, so equal texts always map to equal patterns and no shared RNG
/// state is touched. Callers guarantee `0 < w <= n`.
pub fn random_pattern(text: &str, n: usize, w: usize) -> Pattern {
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&Sha256::digest(text.as_bytes()));
    let mut rng = ChaCha8Rng::from_seed(seed);
    let mut bits: Vec<u32> = index::sample(&mut rng, n, w.min(n))
        .into_iter()
        .map(|i| i as u32)
        .collect();
    bits.sort_unstable();
    // Only fails for n == 0, which config validation rejects.
    Pattern::new(text, bits, n).unwrap_or_else(|_| Pattern::empty(text, n))
}

/// Token-level random-hash encoder.
#[derive(Debug, Clone)]
pub struct RandomSdrEncoder {
    n: usize,
    w: usize,
}

impl RandomSdrEncoder {
    /// Create an encoder producing `w`-of-`n` patterns.
    pub fn new(n: usize, w: usize) -> SdrResult<Self> {
        if n == 0 || w == 0 || w > n {
            return Err(SdrError::ConfigError(format!(
                "random encoder needs 0 < w <= n, got n={} w={}",
                n, w
            )));
        }
        Ok(Self { n, w })
    }

    pub fn w(&self) -> usize {
        self.w
    }
}

impl TextEncoder for RandomSdrEncoder {
    fn encode(&self, tokens: &[String]) -> Vec<Pattern> {
        tokens
            .iter()
            .map(|t| random_pattern(t, self.n, self.w))
            .collect()
    }

    fn granularity(&self) -> Granularity {
        Granularity::Token
    }

    fn dimension(&self) -> usize {
        self.n
    }

    fn name(&self) -> &str {
        "random_sdr"
    }
}
