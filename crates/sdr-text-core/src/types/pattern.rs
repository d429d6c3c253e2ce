//! Sparse binary pattern (SDR) representation.
//!
//! A pattern is the set of active bit positions out of `n` possible bits.
//! Active positions are stored sorted ascending and unique so that overlap
//! and equality can be computed with a single merge-join pass.

use serde::{Deserialize, Serialize};

use crate::error::{SdrError, SdrResult};

/// Sparse binary pattern for a token or a whole sample.
///
/// Patterns are immutable once produced. A pattern may be empty when an
/// external encoder returned nothing and no fallback was applied; empty
/// patterns are never learned.
///
/// # Example
///
/// ```
/// use sdr_text_core::types::Pattern;
///
/// let a = Pattern::new("fox", vec![1, 5, 9], 16).unwrap();
/// let b = Pattern::new("dog", vec![5, 9, 12], 16).unwrap();
/// assert_eq!(a.overlap(&b), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// Text the pattern was produced from
    pub text: String,
    /// Fraction of active bits, `|bits| / n`
    pub sparsity: f64,
    /// Sorted ascending active positions, each `< n`
    bits: Vec<u32>,
    /// Total number of bits
    n: usize,
}

impl Pattern {
    /// Create a pattern from sorted, unique active positions.
    ///
    /// # Errors
    ///
    /// - `ConfigError` if `n == 0`
    /// - `InvalidInput` if a position is `>= n` or positions are unsorted or duplicated
    pub fn new(text: impl Into<String>, bits: Vec<u32>, n: usize) -> SdrResult<Self> {
        if n == 0 {
            return Err(SdrError::ConfigError(
                "pattern dimension n must be greater than 0".into(),
            ));
        }

        let mut prev: Option<u32> = None;
        for &bit in &bits {
            if bit as usize >= n {
                return Err(SdrError::InvalidInput(format!(
                    "bit {} out of range for n={}",
                    bit, n
                )));
            }
            if let Some(p) = prev {
                if bit <= p {
                    return Err(SdrError::InvalidInput(format!(
                        "bits must be sorted and unique, found {} after {}",
                        bit, p
                    )));
                }
            }
            prev = Some(bit);
        }

        let sparsity = bits.len() as f64 / n as f64;
        Ok(Self {
            text: text.into(),
            sparsity,
            bits,
            n,
        })
    }

    /// Create a pattern from arbitrary positions, sorting and deduplicating them.
    pub fn from_positions(
        text: impl Into<String>,
        mut bits: Vec<u32>,
        n: usize,
    ) -> SdrResult<Self> {
        bits.sort_unstable();
        bits.dedup();
        Self::new(text, bits, n)
    }

    /// Create an empty pattern (no active bits).
    pub fn empty(text: impl Into<String>, n: usize) -> Self {
        Self {
            text: text.into(),
            sparsity: 0.0,
            bits: Vec::new(),
            n,
        }
    }

    /// Active bit positions, sorted ascending.
    #[inline]
    pub fn bits(&self) -> &[u32] {
        &self.bits
    }

    /// Total number of bits.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of active bits.
    #[inline]
    pub fn active_count(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of active bits shared with `other`.
    pub fn overlap(&self, other: &Pattern) -> usize {
        let (mut i, mut j, mut count) = (0, 0, 0);
        while i < self.bits.len() && j < other.bits.len() {
            match self.bits[i].cmp(&other.bits[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    count += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        count
    }

    /// True when both patterns have exactly the same active bits.
    pub fn same_bits(&self, other: &Pattern) -> bool {
        self.bits == other.bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_out_of_range() {
        let err = Pattern::new("x", vec![1, 16], 16).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_new_rejects_unsorted_and_duplicates() {
        assert!(Pattern::new("x", vec![3, 2], 16).is_err());
        assert!(Pattern::new("x", vec![2, 2], 16).is_err());
    }

    #[test]
    fn test_zero_dimension_is_config_error() {
        let err = Pattern::new("x", vec![], 0).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_from_positions_sorts_and_dedups() {
        let p = Pattern::from_positions("x", vec![9, 1, 9, 4], 10).unwrap();
        assert_eq!(p.bits(), &[1, 4, 9]);
        assert!((p.sparsity - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_overlap() {
        let a = Pattern::new("a", vec![0, 2, 4, 6, 8], 10).unwrap();
        let b = Pattern::new("b", vec![1, 2, 3, 4], 10).unwrap();
        let empty = Pattern::empty("", 10);
        assert_eq!(a.overlap(&b), 2);
        assert_eq!(b.overlap(&a), 2);
        assert_eq!(a.overlap(&a), 5);
        assert_eq!(a.overlap(&empty), 0);
    }

    #[test]
    fn test_same_bits_ignores_text() {
        let a = Pattern::new("a", vec![1, 2], 10).unwrap();
        let b = Pattern::new("b", vec![1, 2], 10).unwrap();
        let c = Pattern::new("a", vec![1, 3], 10).unwrap();
        assert!(a.same_bits(&b));
        assert!(!a.same_bits(&c));
    }
}
