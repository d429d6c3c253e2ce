//! Model configuration.
//!
//! A [`ModelConfig`] selects the encoder backend through [`ModelKind`] and
//! carries the pattern dimensions, classifier settings and winner count.
//! Presets mirror the three backends:
//!
//! | Preset | n | w | Metric | k |
//! |--------|---|---|--------|---|
//! | `random_sdr()` | 16384 | 328 | raw overlap | all |
//! | `fingerprint()` | 16384 | 819 | raw overlap | all |
//! | `keywords()` | 100 | 20 | exact match | num_labels |

mod sub_configs;

pub use sub_configs::{LoggingConfig, TokenizerConfig};

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::classifier::SimilarityMetric;
use crate::error::{SdrError, SdrResult};

/// Side length of the semantic fingerprint grid.
pub const FINGERPRINT_GRID_SIDE: usize = 128;

/// Encoder backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Token-level pseudo-random patterns seeded by the token text
    RandomSdr,
    /// Document-level semantic fingerprints with random fallback
    Fingerprint,
    /// Token-level random patterns matched exactly against the k nearest prototypes
    Keywords,
}

impl ModelKind {
    pub fn all() -> &'static [ModelKind] {
        &[ModelKind::RandomSdr, ModelKind::Fingerprint, ModelKind::Keywords]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::RandomSdr => "random_sdr",
            ModelKind::Fingerprint => "fingerprint",
            ModelKind::Keywords => "keywords",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = SdrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "random_sdr" | "random" | "randomsdr" => Ok(ModelKind::RandomSdr),
            "fingerprint" | "cio" => Ok(ModelKind::Fingerprint),
            "keywords" | "keyword" => Ok(ModelKind::Keywords),
            other => Err(SdrError::ConfigError(format!(
                "unknown model kind '{}', expected one of random_sdr, fingerprint, keywords",
                other
            ))),
        }
    }
}

/// Configuration of a classification model.
///
/// When deserialized, fields left out take the preset of the named `kind`,
/// so `kind = "keywords"` alone yields the keyword preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PartialModelConfig")]
pub struct ModelConfig {
    /// Encoder backend.
    pub kind: ModelKind,
    /// Total number of bits per pattern.
    pub n: usize,
    /// Target number of active bits per pattern.
    pub w: usize,
    /// Maximum number of winning labels per sample.
    pub num_labels: usize,
    /// Prototype similarity metric.
    pub metric: SimilarityMetric,
    /// Only the k best-scoring prototypes vote; `None` lets all vote.
    pub k: Option<usize>,
    /// Seed for winner tie-breaking; `None` draws from entropy.
    pub tiebreak_seed: Option<u64>,
    /// JSON fingerprint cache used by the fingerprint backend.
    pub fingerprint_cache: Option<PathBuf>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::random_sdr()
    }
}

/// On-disk form of [`ModelConfig`]; every field but `kind` is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialModelConfig {
    kind: Option<ModelKind>,
    n: Option<usize>,
    w: Option<usize>,
    num_labels: Option<usize>,
    metric: Option<SimilarityMetric>,
    k: Option<usize>,
    tiebreak_seed: Option<u64>,
    fingerprint_cache: Option<PathBuf>,
}

impl From<PartialModelConfig> for ModelConfig {
    fn from(partial: PartialModelConfig) -> Self {
        let mut config = Self::for_kind(partial.kind.unwrap_or(ModelKind::RandomSdr));
        if let Some(num_labels) = partial.num_labels {
            config = config.with_num_labels(num_labels);
        }
        config.n = partial.n.unwrap_or(config.n);
        config.w = partial.w.unwrap_or(config.w);
        config.metric = partial.metric.unwrap_or(config.metric);
        config.k = partial.k.or(config.k);
        config.tiebreak_seed = partial.tiebreak_seed;
        config.fingerprint_cache = partial.fingerprint_cache;
        config
    }
}

impl ModelConfig {
    /// Token-level random patterns, raw overlap, all prototypes vote.
    pub fn random_sdr() -> Self {
        Self {
            kind: ModelKind::RandomSdr,
            n: 16_384,
            w: 328,
            num_labels: 3,
            metric: SimilarityMetric::RawOverlap,
            k: None,
            tiebreak_seed: None,
            fingerprint_cache: None,
        }
    }

    /// Document-level fingerprints on a 128x128 grid at 5% sparsity.
    pub fn fingerprint() -> Self {
        let n = FINGERPRINT_GRID_SIDE * FINGERPRINT_GRID_SIDE;
        Self {
            kind: ModelKind::Fingerprint,
            n,
            w: n / 20,
            ..Self::random_sdr()
        }
    }

    /// Small token patterns with exact matching over the `num_labels` nearest prototypes.
    pub fn keywords() -> Self {
        let num_labels = 3;
        Self {
            kind: ModelKind::Keywords,
            n: 100,
            w: 20,
            num_labels,
            metric: SimilarityMetric::ExactMatch,
            k: Some(num_labels),
            ..Self::random_sdr()
        }
    }

    /// Preset for a backend.
    pub fn for_kind(kind: ModelKind) -> Self {
        match kind {
            ModelKind::RandomSdr => Self::random_sdr(),
            ModelKind::Fingerprint => Self::fingerprint(),
            ModelKind::Keywords => Self::keywords(),
        }
    }

    /// Set the winner count; the keyword backend keeps `k` equal to it.
    pub fn with_num_labels(mut self, num_labels: usize) -> Self {
        self.num_labels = num_labels;
        if self.kind == ModelKind::Keywords {
            self.k = Some(num_labels);
        }
        self
    }

    /// Preset for `kind` that keeps this config's winner count, tie-break seed
    /// and fingerprint cache.
    pub fn switch_kind(&self, kind: ModelKind) -> Self {
        let mut model = Self::for_kind(kind).with_num_labels(self.num_labels);
        model.tiebreak_seed = self.tiebreak_seed;
        model.fingerprint_cache = self.fingerprint_cache.clone();
        model
    }

    pub fn with_dimensions(mut self, n: usize, w: usize) -> Self {
        self.n = n;
        self.w = w;
        self
    }

    pub fn with_tiebreak_seed(mut self, seed: u64) -> Self {
        self.tiebreak_seed = Some(seed);
        self
    }

    pub fn with_fingerprint_cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.fingerprint_cache = Some(path.into());
        self
    }

    /// Validate dimensions and classifier settings.
    pub fn validate(&self) -> SdrResult<()> {
        if self.n == 0 {
            return Err(SdrError::ConfigError("model.n must be greater than 0".into()));
        }
        if self.w == 0 {
            return Err(SdrError::ConfigError("model.w must be greater than 0".into()));
        }
        if self.w > self.n {
            return Err(SdrError::ConfigError(format!(
                "model.w ({}) cannot exceed model.n ({})",
                self.w, self.n
            )));
        }
        if self.n > u32::MAX as usize {
            return Err(SdrError::ConfigError(format!(
                "model.n ({}) exceeds the addressable bit range",
                self.n
            )));
        }
        if self.num_labels == 0 {
            return Err(SdrError::ConfigError(
                "model.num_labels must be greater than 0".into(),
            ));
        }
        if self.k == Some(0) {
            return Err(SdrError::ConfigError("model.k must be greater than 0".into()));
        }
        Ok(())
    }
}
