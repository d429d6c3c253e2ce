//! Tokenizer and logging configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Tokenizer options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Drop the N most frequent words of the common-word corpus.
    pub ignore_common: Option<usize>,
    /// Literal strings removed before tokenizing.
    pub remove_strings: Vec<String>,
    /// Pass tokens through a spelling corrector when one is installed.
    pub correct_spell: bool,
    /// Word-frequency file (`word count` per line) backing `ignore_common`.
    pub common_words_path: Option<PathBuf>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            ignore_common: None,
            remove_strings: Vec::new(),
            correct_spell: false,
            common_words_path: None,
        }
    }
}

impl TokenizerConfig {
    /// Preprocessing preset used for survey-style free text.
    pub fn preprocess() -> Self {
        Self {
            ignore_common: Some(100),
            remove_strings: vec!["[identifier deleted]".to_string()],
            correct_spell: true,
            common_words_path: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            include_location: false,
        }
    }
}
