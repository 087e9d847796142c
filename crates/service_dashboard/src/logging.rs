//! Structured logging setup.
//!
//! The terminal belongs to the UI, so log output goes to the configured
//! file. `RUST_LOG` takes precedence over the configured level.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use infra_config::DashboardConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::DashboardError;

/// Build the level filter: `RUST_LOG` if set, otherwise `level`
pub fn filter(level: &str) -> Result<EnvFilter, DashboardError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level).map_err(|e| DashboardError::logging(e.to_string())),
    }
}

fn open_log_file(path: &Path) -> Result<std::fs::File, DashboardError> {
    let to_error = |source| DashboardError::LogFile {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_error)?;
    }
    OpenOptions::new().create(true).append(true).open(path).map_err(to_error)
}

/// Install the global subscriber writing to `config.log_file`
pub fn init(config: &DashboardConfig) -> Result<(), DashboardError> {
    let file = open_log_file(&config.log_file)?;

    tracing_subscriber::registry()
        .with(filter(&config.log_level)?)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .try_init()
        .map_err(|e| DashboardError::logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_log_file_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("dashboard.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_filter_accepts_configured_level() {
        assert!(filter("debug").is_ok());
    }
}
