//! File-based configuration loading.

use infra_config::{ConfigError, DashboardConfig};
use std::io::Write;

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = DashboardConfig::load_or_default(&dir.path().join("dashboard.toml")).unwrap();
    assert_eq!(config, DashboardConfig::default());
}

#[test]
fn test_full_file_loads() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
api_base_url = "https://cell.example.mil/api"
csrf_token = "static-token"
request_timeout_secs = 5
poll_interval_secs = 60
gate_poll_interval_secs = 30
search_debounce_ms = 250
search_min_chars = 3
log_level = "debug"
log_file = "/var/log/dashboard.log"
state_file = "/var/lib/dashboard/ui_state.toml"
"#
    )
    .unwrap();

    let config = DashboardConfig::load(file.path()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.csrf_token.as_deref(), Some("static-token"));
    assert_eq!(config.search_min_chars, 3);
}

#[test]
fn test_invalid_file_fails_validation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "search_debounce_ms = 0\napi_base_url = \"ftp://cell\"").unwrap();

    let config = DashboardConfig::load(file.path()).unwrap();
    match config.validate() {
        Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[test]
fn test_unreadable_toml_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "api_base_url = ").unwrap();

    assert!(matches!(
        DashboardConfig::load_or_default(file.path()),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_shipped_config_matches_defaults() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/dashboard.toml");
    let config = DashboardConfig::load(&path).unwrap();
    assert_eq!(config, DashboardConfig::default());
    assert!(config.validate().is_ok());
}
