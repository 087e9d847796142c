//! # adapter_api: Targeting API Adapter
//!
//! ## Adapter Layer Role
//!
//! Everything that talks to the targeting backend lives here:
//! - [`client::ApiClient`]: JSON over HTTP with cookies and CSRF handling
//! - [`resources`]: per-endpoint wire records validated into core types
//! - [`feed`]: periodic refresh tasks feeding the UI event channel
//! - [`search_driver`]: debounced quick search that drops stale responses
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use adapter_api::client::ApiClient;
//!
//! # async fn run() -> Result<(), adapter_api::error::ApiError> {
//! let client = ApiClient::new("http://localhost:8000/api")?;
//! let targets = client.targeting().list().await?;
//! println!("{} targets", targets.len());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod client;
pub mod error;
pub mod feed;
pub mod resources;
pub mod search_driver;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::client::{ApiClient, CsrfSource};
    pub use crate::error::ApiError;
    pub use crate::feed::{spawn_feed, FeedUpdate};
    pub use crate::resources::assumptions::NewAssumption;
    pub use crate::resources::bda::BdaReportUpdate;
    pub use crate::resources::search::SearchBackend;
    pub use crate::search_driver::{spawn_search, SearchHandle, SearchOptions, SearchSource, SearchUpdate};
}
