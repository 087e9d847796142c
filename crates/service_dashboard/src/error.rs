//! Error types for the dashboard binary.

use std::path::PathBuf;

use adapter_api::error::ApiError;
use infra_config::ConfigError;
use thiserror::Error;

/// Dashboard start-up and runtime error
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// API client could not be created
    #[error("API client error: {0}")]
    Api(#[from] ApiError),

    /// Log file could not be opened
    #[error("Could not open log file {path}: {source}")]
    LogFile {
        /// Configured log path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Logging could not be initialised
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// Terminal IO error
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl DashboardError {
    /// Create a logging setup error
    pub fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DashboardError::from(ConfigError::Validation(vec!["poll_interval_secs out of range".to_string()]));
        assert!(err.to_string().contains("poll_interval_secs"));
    }
}
