//! Experiment configuration: data layout, split policy, model and tokenizer.
//!
//! # Loading order
//!
//! 1. `config/default.toml`
//! 2. `config/{SDR_TEXT_ENV}.toml` (defaults to `development`)
//! 3. Environment variables with the `SDR_TEXT__` prefix, `__` separating
//!    nested keys (e.g. `SDR_TEXT__MODEL__NUM_LABELS=2`)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sdr_text_core::{LoggingConfig, ModelConfig, SdrError, SdrResult, TokenizerConfig};

/// How samples are partitioned into train and test sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SplitPolicy {
    /// k-fold cross-validation; every sample is tested exactly once.
    KFold {
        k: usize,
        /// Permute sample order before cutting blocks.
        #[serde(default)]
        shuffle: bool,
    },
    /// One trial per training-set size.
    TrainSizes {
        sizes: Vec<usize>,
        /// Train on the first `size` samples instead of a random draw.
        #[serde(default)]
        ordered: bool,
    },
}

impl Default for SplitPolicy {
    fn default() -> Self {
        SplitPolicy::KFold { k: 5, shuffle: true }
    }
}

/// Column layout of the CSV input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvLayout {
    /// Header of the sample text column; first column when unset.
    pub text_column: Option<String>,
    /// Headers of the label columns; every column after the text column when empty.
    pub label_columns: Vec<String>,
}

/// Complete experiment configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Experiment name used in report titles and file names.
    pub name: String,
    /// CSV input; `None` runs against a synthetic corpus.
    pub data_path: Option<PathBuf>,
    /// Directory for reports, classification CSVs and the encoding log.
    pub results_dir: PathBuf,
    pub layout: CsvLayout,
    pub split: SplitPolicy,
    /// Seed for fold assignment and random splits.
    pub seed: u64,
    pub model: ModelConfig,
    pub tokenizer: TokenizerConfig,
    pub logging: LoggingConfig,
    /// Write `encoding_log.json` after encoding.
    pub write_encodings: bool,
    /// Write one classifications CSV per fold.
    pub write_classifications: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            name: "experiment".to_string(),
            data_path: None,
            results_dir: PathBuf::from("results"),
            layout: CsvLayout::default(),
            split: SplitPolicy::default(),
            seed: 42,
            model: ModelConfig::default(),
            tokenizer: TokenizerConfig::default(),
            logging: LoggingConfig::default(),
            write_encodings: false,
            write_classifications: false,
        }
    }
}

impl ExperimentConfig {
    /// Load layered configuration from files and environment.
    pub fn load() -> SdrResult<Self> {
        let env = std::env::var("SDR_TEXT_ENV").unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("SDR_TEXT").separator("__"));

        let config: ExperimentConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load a single TOML file.
    pub fn from_file(path: &Path) -> SdrResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SdrError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: ExperimentConfig = toml::from_str(&content)
            .map_err(|e| SdrError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Small patterns and 3 folds, fast enough for CI.
    pub fn ci() -> Self {
        Self {
            name: "ci".to_string(),
            split: SplitPolicy::KFold { k: 3, shuffle: true },
            model: ModelConfig::random_sdr()
                .with_dimensions(1024, 20)
                .with_tiebreak_seed(42),
            ..Default::default()
        }
    }

    /// One trial per training size.
    pub fn train_sizes(sizes: Vec<usize>, ordered: bool) -> Self {
        Self {
            split: SplitPolicy::TrainSizes { sizes, ordered },
            ..Default::default()
        }
    }

    /// Validate settings that do not depend on the data.
    ///
    /// Fold counts and training sizes (`1 <= k <= N`, `size <= N`) are checked
    /// when the folds are built, against the actual sample count.
    pub fn validate(&self) -> SdrResult<()> {
        self.model.validate()?;

        match &self.split {
            SplitPolicy::TrainSizes { sizes, .. } if sizes.is_empty() => {
                return Err(SdrError::ConfigError(
                    "split.sizes must name at least one training size".into(),
                ));
            }
            _ => {}
        }

        if self.name.trim().is_empty() {
            return Err(SdrError::ConfigError("name must not be empty".into()));
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => Ok(()),
            other => Err(SdrError::ConfigError(format!(
                "logging.format must be pretty, compact or json, got '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdr_text_core::ModelKind;

    #[test]
    fn test_default_validates() {
        ExperimentConfig::default().validate().unwrap();
        ExperimentConfig::ci().validate().unwrap();
    }

    #[test]
    fn test_zero_folds_left_to_splitter() {
        let config = ExperimentConfig {
            split: SplitPolicy::KFold { k: 0, shuffle: false },
            ..Default::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_train_sizes_rejected() {
        assert!(ExperimentConfig::train_sizes(vec![], true).validate().is_err());
        ExperimentConfig::train_sizes(vec![0, 5], true).validate().unwrap();
    }

    #[test]
    fn test_bad_logging_format_rejected() {
        let mut config = ExperimentConfig::default();
        config.logging.format = "xml".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("experiment.toml");
        std::fs::write(
            &path,
            r#"
name = "survey"
seed = 7

[split]
kind = "train_sizes"
sizes = [10, 20]
ordered = true

[model]
kind = "keywords"
num_labels = 2

[tokenizer]
ignore_common = 50
"#,
        )
        .unwrap();

        let config = ExperimentConfig::from_file(&path).unwrap();
        assert_eq!(config.name, "survey");
        assert_eq!(config.seed, 7);
        assert_eq!(
            config.split,
            SplitPolicy::TrainSizes {
                sizes: vec![10, 20],
                ordered: true
            }
        );
        assert_eq!(config.model.kind, ModelKind::Keywords);
        assert_eq!(config.model.num_labels, 2);
        assert_eq!(config.model.n, 100);
        assert_eq!(config.model.k, Some(2));
        assert_eq!(config.tokenizer.ignore_common, Some(50));
    }

    #[test]
    fn test_from_file_invalid_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[model]\nn = 10\nw = 20\n").unwrap();
        let err = ExperimentConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("cannot exceed"));
    }

    #[test]
    fn test_missing_file() {
        let err = ExperimentConfig::from_file(Path::new("/nonexistent/x.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
