//! Persisted UI preferences.
//!
//! The only state the dashboard keeps between runs is the operator's
//! selected role. It is loaded at start-up and handed to the application
//! explicitly.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use targeting_core::types::Role;

use crate::error::ConfigError;

/// Preferences saved between runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiState {
    /// Role selected by the operator
    pub role: Role,
}

/// Reads and writes [`UiState`] at a fixed path
#[derive(Debug, Clone)]
pub struct UiStateStore {
    path: PathBuf,
}

impl UiStateStore {
    /// Create a store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load saved state.
    ///
    /// A missing or corrupt file yields the default state; corruption is
    /// logged rather than surfaced since preferences are disposable.
    pub fn load(&self) -> UiState {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return UiState::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Could not read UI state");
                return UiState::default();
            }
        };

        toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Discarding corrupt UI state");
            UiState::default()
        })
    }

    /// Save state, creating the parent directory if needed
    pub fn save(&self, state: &UiState) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        let content = toml::to_string(state).map_err(|e| ConfigError::Serialise(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| ConfigError::io(&self.path, e))
    }
}
