//! Targeting Cell Dashboard entry point
//!
//! Configuration precedence, lowest first: defaults, `--config` file,
//! `CELL_*` environment variables, command-line flags.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use infra_config::{DashboardConfig, UiStateStore, DEFAULT_CONFIG_PATH};
use service_dashboard::prelude::*;
use service_dashboard::logging;
use targeting_core::types::Role;
use tracing::info;

/// Terminal dashboard for the targeting cell
#[derive(Debug, Parser)]
#[command(name = "targeting-dashboard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Targeting API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Poll interval for list views, seconds
    #[arg(long)]
    poll_secs: Option<u64>,

    /// Role for this session; also saved as the new default
    #[arg(short, long)]
    role: Option<Role>,
}

impl Cli {
    /// Apply command-line overrides on top of file and environment settings
    fn apply(&self, mut config: DashboardConfig) -> DashboardConfig {
        if let Some(url) = &self.api_url {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(secs) = self.poll_secs {
            config.poll_interval_secs = secs;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = cli.apply(DashboardConfig::load_or_default(&cli.config)?.with_env_override());
    config.validate()?;
    logging::init(&config)?;

    let store = UiStateStore::new(&config.state_file);
    let mut ui_state = store.load();
    if let Some(role) = cli.role {
        ui_state.role = role;
        store.save(&ui_state)?;
    }
    info!(config = %cli.config.display(), role = %ui_state.role, "Configuration loaded");

    let mut app = TuiApp::new(&config, AppState::new(ui_state.role), store)?;
    app.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "targeting-dashboard",
            "--api-url",
            "https://cell.example/api/",
            "--poll-secs",
            "15",
            "--role",
            "targeteer",
        ])
        .unwrap();
        let config = cli.apply(DashboardConfig::default());
        assert_eq!(config.api_base_url, "https://cell.example/api");
        assert_eq!(config.poll_interval_secs, 15);
        assert_eq!(config.log_level, "info");
        assert_eq!(cli.role, Some(Role::Targeteer));
    }

    #[test]
    fn test_defaults_leave_config_untouched() {
        let cli = Cli::try_parse_from(["targeting-dashboard"]).unwrap();
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(cli.apply(DashboardConfig::default()), DashboardConfig::default());
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!(Cli::try_parse_from(["targeting-dashboard", "--role", "general"]).is_err());
    }
}
