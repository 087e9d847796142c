//! Dashboard configuration management.
//!
//! Handles loading of the dashboard configuration from a TOML file with
//! environment variable override support. Precedence, lowest first:
//! built-in defaults, file, environment, command line (applied by the
//! binary), then validation of the merged result.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard.toml";

/// Environment variable names understood by [`DashboardConfig::with_env_override`]
pub mod env {
    /// API base URL
    pub const API_URL: &str = "CELL_API_URL";
    /// Static CSRF token
    pub const CSRF_TOKEN: &str = "CELL_CSRF_TOKEN";
    /// Poll interval for list views, seconds
    pub const POLL_SECS: &str = "CELL_POLL_SECS";
    /// Log level
    pub const LOG_LEVEL: &str = "CELL_LOG_LEVEL";
    /// Log file path
    pub const LOG_FILE: &str = "CELL_LOG_FILE";
}

/// Accepted range for poll intervals, seconds
pub const POLL_RANGE_SECS: std::ops::RangeInclusive<u64> = 5..=300;

/// Accepted range for the search debounce, milliseconds
pub const DEBOUNCE_RANGE_MS: std::ops::RangeInclusive<u64> = 50..=5_000;

/// Dashboard configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Base URL of the targeting API, without trailing slash
    pub api_base_url: String,

    /// Static CSRF token. When absent the client fetches one from the API.
    pub csrf_token: Option<String>,

    /// Per-request timeout
    pub request_timeout_secs: u64,

    /// Re-fetch interval for targets, ORBAT, BDA and assumptions
    pub poll_interval_secs: u64,

    /// Re-fetch interval for decision gates
    pub gate_poll_interval_secs: u64,

    /// Quiet period after the last keystroke before searching
    pub search_debounce_ms: u64,

    /// Shortest query (after trimming) that triggers a backend search
    pub search_min_chars: usize,

    /// Log level
    pub log_level: String,

    /// Log file; the terminal is owned by the UI
    pub log_file: PathBuf,

    /// Persisted UI preferences
    pub state_file: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            csrf_token: None,
            request_timeout_secs: 10,
            poll_interval_secs: 60,
            gate_poll_interval_secs: 30,
            search_debounce_ms: 300,
            search_min_chars: 2,
            log_level: "info".to_string(),
            log_file: PathBuf::from("targeting-dashboard.log"),
            state_file: PathBuf::from("config/ui_state.toml"),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// Load configuration from `path`, or defaults when the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!(path = %path.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides
    pub fn with_env_override(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(env::API_URL) {
            self.api_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(token) = lookup(env::CSRF_TOKEN) {
            self.csrf_token = Some(token).filter(|t| !t.is_empty());
        }

        if let Some(secs) = lookup(env::POLL_SECS) {
            match secs.parse() {
                Ok(value) => self.poll_interval_secs = value,
                Err(_) => tracing::warn!(value = %secs, "Ignoring non-numeric {}", env::POLL_SECS),
            }
        }

        if let Some(level) = lookup(env::LOG_LEVEL) {
            self.log_level = level;
        }

        if let Some(file) = lookup(env::LOG_FILE) {
            self.log_file = PathBuf::from(file);
        }

        self
    }

    /// Validate the configuration, collecting every problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, valid_log_levels
            ));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            errors.push(format!(
                "Invalid api_base_url '{}'. Must start with http:// or https://",
                self.api_base_url
            ));
        }

        if self.request_timeout_secs == 0 {
            errors.push("request_timeout_secs must be greater than 0".to_string());
        }

        for (name, value) in [
            ("poll_interval_secs", self.poll_interval_secs),
            ("gate_poll_interval_secs", self.gate_poll_interval_secs),
        ] {
            if !POLL_RANGE_SECS.contains(&value) {
                errors.push(format!(
                    "{} {} outside {}..={}",
                    name,
                    value,
                    POLL_RANGE_SECS.start(),
                    POLL_RANGE_SECS.end()
                ));
            }
        }

        if !DEBOUNCE_RANGE_MS.contains(&self.search_debounce_ms) {
            errors.push(format!(
                "search_debounce_ms {} outside {}..={}",
                self.search_debounce_ms,
                DEBOUNCE_RANGE_MS.start(),
                DEBOUNCE_RANGE_MS.end()
            ));
        }

        if self.search_min_chars == 0 {
            errors.push("search_min_chars must be at least 1".to_string());
        }

        if self.log_file.as_os_str().is_empty() {
            errors.push("log_file cannot be empty".to_string());
        }

        if self.state_file.as_os_str().is_empty() {
            errors.push("state_file cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from file (or defaults) with environment overrides and validate
    pub fn load_with_env_and_validate(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load_or_default(path)?.with_env_override();
        config.validate()?;
        Ok(config)
    }

    /// Request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// List poll interval as a duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Gate poll interval as a duration
    pub fn gate_poll_interval(&self) -> Duration {
        Duration::from_secs(self.gate_poll_interval_secs)
    }

    /// Search debounce as a duration
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_validates() {
        assert!(DashboardConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = DashboardConfig::from_toml(
            r#"
            api_base_url = "https://cell.example.mil/api/"
            poll_interval_secs = 45
            "#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://cell.example.mil/api");
        assert_eq!(config.poll_interval_secs, 45);
        assert_eq!(config.gate_poll_interval_secs, 30);
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let result = DashboardConfig::from_toml("pol_interval = 3");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_override() {
        let config = DashboardConfig::default().with_overrides_from(lookup_from(&[
            (env::API_URL, "https://override/api/"),
            (env::CSRF_TOKEN, "tok"),
            (env::POLL_SECS, "20"),
            (env::LOG_LEVEL, "debug"),
        ]));
        assert_eq!(config.api_base_url, "https://override/api");
        assert_eq!(config.csrf_token.as_deref(), Some("tok"));
        assert_eq!(config.poll_interval_secs, 20);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_env_override_ignores_bad_number() {
        let config = DashboardConfig::default().with_overrides_from(lookup_from(&[(env::POLL_SECS, "soon")]));
        assert_eq!(config.poll_interval_secs, 60);
    }

    #[test]
    fn test_empty_csrf_override_clears_token() {
        let mut config = DashboardConfig::default();
        config.csrf_token = Some("file-token".to_string());
        let config = config.with_overrides_from(lookup_from(&[(env::CSRF_TOKEN, "")]));
        assert_eq!(config.csrf_token, None);
    }

    #[test]
    fn test_validate_invalid_url() {
        let mut config = DashboardConfig::default();
        config.api_base_url = "cell-api:8000".to_string();

        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.contains("api_base_url")))
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_poll_interval_range() {
        let mut config = DashboardConfig::default();
        config.gate_poll_interval_secs = 1;

        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.contains("gate_poll_interval_secs")))
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_multiple_errors() {
        let mut config = DashboardConfig::default();
        config.log_level = "loud".to_string();
        config.request_timeout_secs = 0;
        config.search_debounce_ms = 10;
        config.search_min_chars = 0;

        match config.validate() {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 4),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_durations() {
        let config = DashboardConfig::default();
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.gate_poll_interval(), Duration::from_secs(30));
    }
}
