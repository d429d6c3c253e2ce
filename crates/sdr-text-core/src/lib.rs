//! # sdr-text-core
//!
//! Sparse-pattern text classification primitives.
//!
//! ## Pipeline
//!
//! ```text
//! text -> Tokenizer -> tokens -> TextEncoder -> patterns
//!      -> PrototypeClassifier::learn         (training)
//!      -> PrototypeClassifier::infer         (testing)
//!      -> FrequencyVector -> WinnerSelector  -> predicted labels
//! ```
//!
//! ## Backends
//!
//! | Kind | Granularity | Metric |
//! |------|-------------|--------|
//! | `random_sdr` | token | raw overlap |
//! | `fingerprint` | document | raw overlap |
//! | `keywords` | token | exact match, k nearest |
//!
//! ## Example
//!
//! ```
//! use sdr_text_core::config::ModelConfig;
//! use sdr_text_core::model::ClassificationModel;
//!
//! let config = ModelConfig::random_sdr().with_dimensions(1024, 20).with_num_labels(1);
//! let mut model = ClassificationModel::from_config(&config).unwrap();
//! let fox = model.encode_sample(&["fox".to_string()], [0]);
//! model.train_model(&fox);
//! assert_eq!(model.test_model(&fox, 1), vec![0]);
//! ```

pub mod classifier;
pub mod config;
pub mod encoders;
pub mod error;
pub mod model;
pub mod tokenize;
pub mod types;

pub use classifier::{FrequencyVector, PrototypeClassifier, SimilarityMetric, WinnerSelector};
pub use config::{LoggingConfig, ModelConfig, ModelKind, TokenizerConfig};
pub use encoders::{
    random_pattern, FingerprintCache, FingerprintEncoder, FingerprintSource, RandomSdrEncoder,
    TextEncoder,
};
pub use error::{SdrError, SdrResult};
pub use model::ClassificationModel;
pub use tokenize::{SpellCorrector, TextPreprocessor, Tokenizer};
pub use types::{Label, LabelVocabulary, Pattern, Sample};
