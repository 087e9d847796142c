//! # Targeting Cell Dashboard
//!
//! Terminal dashboard for a targeting cell, rendered with ratatui over
//! crossterm.
//!
//! ### Screens
//! - **Gates**: ROE, CDE, weather and deconfliction traffic lights
//! - **Targets**: target list with F3EAD phase and JTB actions
//! - **ORBAT**: collapsible friendly and enemy order of battle
//! - **BDA**: assessment reports and field-by-field version comparison
//! - **Assumptions**: planning assumptions and their review status
//! - **ROE**: rules of engagement
//! - **Search**: quick search over pages and backend records
//!
//! Every view starts with sample data and switches to live data once its
//! feed delivers. A failed refresh keeps the last data and shows the error
//! inline.

pub mod app;
pub mod error;
pub mod event;
pub mod logging;
pub mod sample;
pub mod screens;
pub mod tui;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::app::{AppState, Command, Screen};
    pub use crate::error::DashboardError;
    pub use crate::event::{AppEvent, Loadable};
    pub use crate::tui::{CommandRunner, TuiApp};
}
