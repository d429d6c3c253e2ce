//! Text encoders producing sparse patterns.
//!
//! - [`RandomSdrEncoder`]: one deterministic pseudo-random pattern per token
//! - [`FingerprintEncoder`]: one semantic fingerprint per sample, looked up
//!   through a [`FingerprintSource`], falling back to a random pattern
//!
//! Encoding never fails: a gap in an external source is replaced by the
//! text-seeded fallback pattern and reported with `tracing::warn!`.

mod fingerprint;
mod random;

pub use fingerprint::{Fingerprint, FingerprintCache, FingerprintEncoder, FingerprintSource};
pub use random::{random_pattern, RandomSdrEncoder};

use crate::types::Pattern;

/// Whether an encoder emits one pattern per token or one per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Token,
    Document,
}

/// Converts a tokenized sample into patterns.
pub trait TextEncoder {
    /// Encode the tokens of one sample.
    ///
    /// Token-level encoders return one pattern per token, document-level
    /// encoders a single pattern for the tokens joined by spaces. An empty
    /// token list yields no patterns.
    fn encode(&self, tokens: &[String]) -> Vec<Pattern>;

    /// Output granularity.
    fn granularity(&self) -> Granularity;

    /// Pattern dimension `n`.
    fn dimension(&self) -> usize;

    /// Short name used in logs and reports.
    fn name(&self) -> &str;
}
