//! Text preprocessing and tokenization.
//!
//! [`TextPreprocessor`] lowercases the text, strips configured literal
//! strings and apostrophes, and keeps runs of `[a-z$]`. It can drop the most
//! frequent words of a reference corpus and hand each token to an optional
//! [`SpellCorrector`].

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::TokenizerConfig;
use crate::error::{SdrError, SdrResult};

static TOKEN_PATTERN: OnceLock<Regex> = OnceLock::new();

fn token_pattern() -> &'static Regex {
    TOKEN_PATTERN.get_or_init(|| Regex::new(r"[a-z$]+").expect("token regex must compile"))
}

/// Splits a sample's text into tokens.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Replaces a token with its corrected spelling.
pub trait SpellCorrector {
    fn correct(&self, token: &str) -> String;
}

/// Configurable tokenizer.
pub struct TextPreprocessor {
    config: TokenizerConfig,
    common_words: HashSet<String>,
    corrector: Option<Box<dyn SpellCorrector>>,
    missing_corrector_reported: AtomicBool,
}

impl Default for TextPreprocessor {
    fn default() -> Self {
        Self {
            config: TokenizerConfig::default(),
            common_words: HashSet::new(),
            corrector: None,
            missing_corrector_reported: AtomicBool::new(false),
        }
    }
}

impl TextPreprocessor {
    /// Build a preprocessor, loading the common-word list when configured.
    pub fn new(config: TokenizerConfig) -> SdrResult<Self> {
        let mut pre = Self {
            config,
            ..Default::default()
        };
        if let (Some(n), Some(path)) = (pre.config.ignore_common, pre.config.common_words_path.clone()) {
            let ranked = load_word_ranking(&path)?;
            pre.common_words = ranked.into_iter().take(n).collect();
            debug!(path = %path.display(), ignored = pre.common_words.len(), "loaded common words");
        } else if pre.config.ignore_common.is_some() {
            warn!("ignore_common set without a common-word list, no words will be dropped");
        }
        Ok(pre)
    }

    /// Use the `N` most frequent words of `counts` as the ignore list.
    pub fn with_word_counts<I, S>(mut self, counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let n = self.config.ignore_common.unwrap_or(0);
        let mut ranked: Vec<(String, u64)> = counts.into_iter().map(|(w, c)| (w.into(), c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        self.common_words = ranked.into_iter().take(n).map(|(w, _)| w).collect();
        self
    }

    pub fn with_spell_corrector(mut self, corrector: Box<dyn SpellCorrector>) -> Self {
        self.corrector = Some(corrector);
        self
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    fn clean(&self, text: &str) -> String {
        let mut cleaned = text.to_string();
        for s in &self.config.remove_strings {
            if !s.is_empty() {
                cleaned = cleaned.replace(s.as_str(), "");
            }
        }
        cleaned.replace('\'', "").to_lowercase()
    }
}

impl Tokenizer for TextPreprocessor {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let cleaned = self.clean(text);
        let corrector = if self.config.correct_spell {
            if self.corrector.is_none()
                && !self.missing_corrector_reported.swap(true, Ordering::Relaxed)
            {
                warn!("spelling correction requested but no corrector installed");
            }
            self.corrector.as_deref()
        } else {
            None
        };

        token_pattern()
            .find_iter(&cleaned)
            .map(|m| match corrector {
                Some(c) => c.correct(m.as_str()),
                None => m.as_str().to_string(),
            })
            .filter(|t| !t.is_empty() && !self.common_words.contains(t))
            .collect()
    }
}

/// Read a word list, most frequent first.
///
/// Each line is `word` or `word count`. When counts are present the list is
/// ordered by descending count, otherwise file order is the rank.
fn load_word_ranking(path: &Path) -> SdrResult<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| SdrError::io(path, e))?;
    let mut entries: Vec<(String, Option<u64>)> = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else { continue };
        let count = match parts.next() {
            Some(c) => Some(c.parse::<u64>().map_err(|e| {
                SdrError::InvalidInput(format!(
                    "{}:{}: bad word count '{}': {}",
                    path.display(),
                    line_no + 1,
                    c,
                    e
                ))
            })?),
            None => None,
        };
        entries.push((word.to_lowercase(), count));
    }
    if entries.iter().any(|(_, c)| c.is_some()) {
        entries.sort_by(|a, b| b.1.unwrap_or(0).cmp(&a.1.unwrap_or(0)));
    }
    Ok(entries.into_iter().map(|(w, _)| w).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TypoFixer;

    impl SpellCorrector for TypoFixer {
        fn correct(&self, token: &str) -> String {
            if token == "teh" {
                "the".to_string()
            } else {
                token.to_string()
            }
        }
    }

    #[test]
    fn test_default_tokenization() {
        let pre = TextPreprocessor::default();
        assert_eq!(
            pre.tokenize("The quick, brown FOX costs $5!"),
            vec!["the", "quick", "brown", "fox", "costs", "$"]
        );
    }

    #[test]
    fn test_apostrophes_are_joined() {
        let pre = TextPreprocessor::default();
        assert_eq!(pre.tokenize("Don't stop"), vec!["dont", "stop"]);
    }

    #[test]
    fn test_remove_strings() {
        let pre = TextPreprocessor::new(TokenizerConfig {
            remove_strings: vec!["[identifier deleted]".into()],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(pre.tokenize("call [identifier deleted] now"), vec!["call", "now"]);
    }

    #[test]
    fn test_ignore_common_from_counts() {
        let pre = TextPreprocessor::new(TokenizerConfig {
            ignore_common: Some(2),
            ..Default::default()
        })
        .unwrap()
        .with_word_counts(vec![("the", 100), ("a", 80), ("fox", 3)]);
        assert_eq!(pre.tokenize("the fox and a dog"), vec!["fox", "and", "dog"]);
    }

    #[test]
    fn test_ignore_common_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "fox 3\nthe 100\nof 90\n").unwrap();
        let pre = TextPreprocessor::new(TokenizerConfig {
            ignore_common: Some(2),
            common_words_path: Some(path),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(pre.tokenize("the tail of the fox"), vec!["tail", "fox"]);
    }

    #[test]
    fn test_bad_word_count_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "the many\n").unwrap();
        let result = TextPreprocessor::new(TokenizerConfig {
            ignore_common: Some(1),
            common_words_path: Some(path),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_spell_corrector_applies_when_enabled() {
        let config = TokenizerConfig {
            correct_spell: true,
            ..Default::default()
        };
        let pre = TextPreprocessor::new(config)
            .unwrap()
            .with_spell_corrector(Box::new(TypoFixer));
        assert_eq!(pre.tokenize("teh end"), vec!["the", "end"]);

        let pre = TextPreprocessor::default().with_spell_corrector(Box::new(TypoFixer));
        assert_eq!(pre.tokenize("teh end"), vec!["teh", "end"]);
    }
}
