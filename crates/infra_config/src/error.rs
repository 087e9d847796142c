//! Configuration error type.

use std::path::Path;
use thiserror::Error;

/// Errors from loading, saving or validating configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// IO error reading or writing a file
    #[error("IO error on {path}: {message}")]
    Io {
        /// File involved
        path: String,
        /// Underlying error text
        message: String,
    },

    /// Parse error in a TOML file
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialisation error when writing state
    #[error("Serialisation error: {0}")]
    Serialise(String),

    /// One or more validation failures
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl ConfigError {
    /// Create an IO error for `path`
    pub fn io(path: &Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_joins_errors() {
        let error = ConfigError::Validation(vec!["Error 1".to_string(), "Error 2".to_string()]);
        assert_eq!(error.to_string(), "Validation errors: Error 1; Error 2");
    }
}
