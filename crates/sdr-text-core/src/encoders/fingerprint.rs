//! Document-level semantic fingerprint encoder.
//!
//! Fingerprints come from a [`FingerprintSource`]. The bundled source is a
//! JSON file cache mapping text to active positions, so experiments can run
//! offline against fingerprints fetched earlier.
//!
//! When the source cannot serve the whole text, the fingerprint of the
//! sample's rarest token (lowest document frequency) stands in for it. Only
//! when no token has a fingerprint either is the text encoded with
//! [`random_pattern`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{random_pattern, Granularity, TextEncoder};
use crate::error::{SdrError, SdrResult};
use crate::types::Pattern;

/// Fingerprint as returned by a semantic service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Active positions in the fingerprint grid
    pub positions: Vec<u32>,
    /// Reported sparsity, if the service provides one
    #[serde(default)]
    pub sparsity: Option<f64>,
    /// Document frequency of the term, for single-token fingerprints
    #[serde(default)]
    pub df: Option<u64>,
}

/// Supplier of semantic fingerprints.
///
/// `Ok(None)` means the source has no fingerprint for the text. Errors are
/// transport or decoding failures; the encoder treats both as gaps.
pub trait FingerprintSource {
    fn fingerprint(&self, text: &str) -> SdrResult<Option<Fingerprint>>;
}

/// File-backed fingerprint cache.
#[derive(Debug, Clone, Default)]
pub struct FingerprintCache {
    entries: HashMap<String, Fingerprint>,
    path: Option<PathBuf>,
}

impl FingerprintCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a cache file. A missing file yields an empty cache bound to `path`.
    pub fn load(path: &Path) -> SdrResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "fingerprint cache not found, starting empty");
            return Ok(Self {
                entries: HashMap::new(),
                path: Some(path.to_path_buf()),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| SdrError::io(path, e))?;
        let entries: HashMap<String, Fingerprint> = serde_json::from_str(&content)?;
        debug!(path = %path.display(), entries = entries.len(), "loaded fingerprint cache");
        Ok(Self {
            entries,
            path: Some(path.to_path_buf()),
        })
    }

    /// Write the cache back to the file it was loaded from.
    pub fn save(&self) -> SdrResult<()> {
        match &self.path {
            Some(path) => self.save_to(path),
            None => Err(SdrError::ConfigError(
                "fingerprint cache has no backing file".into(),
            )),
        }
    }

    pub fn save_to(&self, path: &Path) -> SdrResult<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(path, json).map_err(|e| SdrError::io(path, e))
    }

    pub fn insert(&mut self, text: impl Into<String>, fingerprint: Fingerprint) {
        self.entries.insert(text.into(), fingerprint);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FingerprintSource for FingerprintCache {
    fn fingerprint(&self, text: &str) -> SdrResult<Option<Fingerprint>> {
        Ok(self.entries.get(text).cloned())
    }
}

/// Encodes a whole sample as one fingerprint pattern.
pub struct FingerprintEncoder {
    source: Box<dyn FingerprintSource>,
    n: usize,
    w: usize,
    fallback: bool,
}

impl FingerprintEncoder {
    /// Create an encoder over `source` with random fallback enabled.
    pub fn new(source: Box<dyn FingerprintSource>, n: usize, w: usize) -> SdrResult<Self> {
        if n == 0 || w == 0 || w > n {
            return Err(SdrError::ConfigError(format!(
                "fingerprint encoder needs 0 < w <= n, got n={} w={}",
                n, w
            )));
        }
        Ok(Self {
            source,
            n,
            w,
            fallback: true,
        })
    }

    /// Emit empty patterns for gaps instead of random fallbacks.
    pub fn without_fallback(mut self) -> Self {
        self.fallback = false;
        self
    }

    /// Resolve a fingerprint into a usable pattern, or the reason it is not one.
    fn lookup(&self, text: &str) -> Result<(Pattern, Option<u64>), String> {
        let fp = match self.source.fingerprint(text) {
            Ok(Some(fp)) => fp,
            Ok(None) => return Err("no fingerprint for text".into()),
            Err(e) => return Err(e.to_string()),
        };
        if fp.positions.is_empty() {
            return Err("empty fingerprint".into());
        }
        let mut pattern =
            Pattern::from_positions(text, fp.positions, self.n).map_err(|e| e.to_string())?;
        if let Some(sparsity) = fp.sparsity {
            pattern.sparsity = sparsity;
        }
        Ok((pattern, fp.df))
    }

    /// Fingerprint of the least document-frequent token that has one.
    ///
    /// Tokens without a reported `df` rank after those with one; among equals
    /// the earliest token wins.
    fn substitute(&self, text: &str, tokens: &[String]) -> Option<Pattern> {
        let mut best: Option<(Pattern, Option<u64>)> = None;
        for token in tokens {
            let Ok((pattern, df)) = self.lookup(token) else {
                continue;
            };
            let rank = df.unwrap_or(u64::MAX);
            if best
                .as_ref()
                .map_or(true, |(_, best_df)| rank < best_df.unwrap_or(u64::MAX))
            {
                best = Some((pattern, df));
            }
        }
        best.map(|(mut pattern, df)| {
            debug!(text, token = %pattern.text, ?df, "substituting rarest token fingerprint");
            pattern.text = text.to_string();
            pattern
        })
    }

    fn gap(&self, text: &str, reason: &str) -> Pattern {
        if self.fallback {
            warn!(text, reason, "fingerprint unavailable, using random fallback pattern");
            random_pattern(text, self.n, self.w)
        } else {
            warn!(text, reason, "fingerprint unavailable, emitting empty pattern");
            Pattern::empty(text, self.n)
        }
    }
}

impl TextEncoder for FingerprintEncoder {
    fn encode(&self, tokens: &[String]) -> Vec<Pattern> {
        if tokens.is_empty() {
            return Vec::new();
        }
        let text = tokens.join(" ");
        let pattern = match self.lookup(&text) {
            Ok((pattern, _)) => pattern,
            Err(reason) => self
                .substitute(&text, tokens)
                .unwrap_or_else(|| self.gap(&text, &reason)),
        };
        vec![pattern]
    }

    fn granularity(&self) -> Granularity {
        Granularity::Document
    }

    fn dimension(&self) -> usize {
        self.n
    }

    fn name(&self) -> &str {
        "fingerprint"
    }
}
