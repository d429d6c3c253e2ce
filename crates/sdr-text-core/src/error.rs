//! Error types for encoding, classification and evaluation.
//!
//! Input errors (mismatched lengths, invalid fold counts, empty label sets)
//! are fatal for the operation that raised them. Configuration errors are
//! raised at setup time, before any sample is encoded. Encoding gaps are not
//! errors: encoders recover with a fallback pattern and log a warning.

use thiserror::Error;

/// Errors that can occur in the classification pipeline.
#[derive(Debug, Error)]
pub enum SdrError {
    /// Generic invalid input provided by the caller
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Two sequences that must be aligned have different lengths
    #[error("Length mismatch: {left_name} has {left} entries but {right_name} has {right}")]
    LengthMismatch {
        /// Name of the first sequence
        left_name: String,
        /// Length of the first sequence
        left: usize,
        /// Name of the second sequence
        right_name: String,
        /// Length of the second sequence
        right: usize,
    },

    /// Fold count is outside the usable range
    #[error("Invalid fold count k={k} for {samples} samples: {reason}")]
    InvalidFoldCount {
        /// Requested number of folds
        k: usize,
        /// Number of samples available
        samples: usize,
        /// Reason for invalidity
        reason: String,
    },

    /// Training-set size is outside `[0, N]`
    #[error("Invalid training size {size}: must be within [0, {samples}]")]
    InvalidTrainSize {
        /// Requested size
        size: usize,
        /// Number of samples available
        samples: usize,
    },

    /// A sample has no actual labels, so accuracy is undefined
    #[error("Sample {index} has an empty actual label set")]
    EmptyLabels {
        /// Position of the offending sample
        index: usize,
    },

    /// A label index does not belong to the vocabulary
    #[error("Unknown label {label}: vocabulary has {vocabulary_size} labels")]
    UnknownLabel {
        /// The offending label index
        label: usize,
        /// Size of the vocabulary
        vocabulary_size: usize,
    },

    /// Matrix or pattern dimensions do not agree
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// IO error with the path that caused it
    #[error("IO error on {path}: {message}")]
    Io {
        /// Path being read or written
        path: String,
        /// Underlying error message
        message: String,
    },
}

/// Result type for pipeline operations.
pub type SdrResult<T> = Result<T, SdrError>;

impl From<serde_json::Error> for SdrError {
    fn from(err: serde_json::Error) -> Self {
        SdrError::SerializationError(err.to_string())
    }
}

impl From<config::ConfigError> for SdrError {
    fn from(err: config::ConfigError) -> Self {
        SdrError::ConfigError(err.to_string())
    }
}

impl SdrError {
    /// Create a length mismatch error for two named sequences.
    pub fn length_mismatch(
        left_name: impl Into<String>,
        left: usize,
        right_name: impl Into<String>,
        right: usize,
    ) -> Self {
        SdrError::LengthMismatch {
            left_name: left_name.into(),
            left,
            right_name: right_name.into(),
            right,
        }
    }

    /// Create an invalid fold count error.
    pub fn invalid_folds(k: usize, samples: usize, reason: impl Into<String>) -> Self {
        SdrError::InvalidFoldCount {
            k,
            samples,
            reason: reason.into(),
        }
    }

    /// Create an IO error for a path.
    pub fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        SdrError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    /// Check if this error was caused by caller input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SdrError::InvalidInput(_)
                | SdrError::LengthMismatch { .. }
                | SdrError::InvalidFoldCount { .. }
                | SdrError::InvalidTrainSize { .. }
                | SdrError::EmptyLabels { .. }
                | SdrError::UnknownLabel { .. }
        )
    }

    /// Check if this error was raised while validating configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(self, SdrError::ConfigError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_display() {
        let err = SdrError::length_mismatch("predicted", 3, "actual", 2);
        let msg = err.to_string();
        assert!(msg.contains("predicted has 3"));
        assert!(msg.contains("actual has 2"));
    }

    #[test]
    fn test_invalid_folds_display() {
        let err = SdrError::invalid_folds(12, 9, "more folds than samples");
        let msg = err.to_string();
        assert!(msg.contains("k=12"));
        assert!(msg.contains("9 samples"));
        assert!(msg.contains("more folds"));
    }

    #[test]
    fn test_train_size_display() {
        let err = SdrError::InvalidTrainSize { size: 11, samples: 10 };
        assert!(err.to_string().contains("[0, 10]"));
    }

    #[test]
    fn test_empty_labels_display() {
        let err = SdrError::EmptyLabels { index: 4 };
        assert!(err.to_string().contains("Sample 4"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<String>("not json").unwrap_err();
        let err: SdrError = json_err.into();
        assert!(matches!(err, SdrError::SerializationError(_)));
    }

    #[test]
    fn test_error_classification() {
        assert!(SdrError::EmptyLabels { index: 0 }.is_input_error());
        assert!(SdrError::invalid_folds(0, 3, "zero").is_input_error());
        assert!(!SdrError::ConfigError("w > n".into()).is_input_error());
        assert!(SdrError::ConfigError("w > n".into()).is_config_error());
        assert!(!SdrError::DimensionMismatch { expected: 3, actual: 4 }.is_config_error());
    }

    #[test]
    fn test_io_helper() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = SdrError::io(std::path::Path::new("/tmp/x.json"), io);
        let msg = err.to_string();
        assert!(msg.contains("/tmp/x.json"));
        assert!(msg.contains("missing"));
    }
}
