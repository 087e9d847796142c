//! # infra_config: Configuration for the Targeting Cell Dashboard
//!
//! - [`DashboardConfig`]: TOML file + environment overrides + validation
//! - [`UiStateStore`]: the operator's persisted role preference
//!
//! Nothing here is global. The binary loads both at boot and passes them
//! down.

pub mod config;
pub mod error;
pub mod ui_state;

pub use config::{DashboardConfig, DEFAULT_CONFIG_PATH};
pub use error::ConfigError;
pub use ui_state::{UiState, UiStateStore};
