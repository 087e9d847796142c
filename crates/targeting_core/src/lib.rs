//! # targeting_core: Domain Kernel for the Targeting Cell Dashboard
//!
//! ## Core Layer Role
//!
//! targeting_core is the bottom layer of the dashboard workspace. It holds
//! everything that can be expressed without I/O:
//! - Entity types received from the targeting API (`types`)
//! - Wire code ↔ enum ↔ display label translation (`types`)
//! - The order-of-battle tree with lazy expansion (`orbat`)
//! - Schema-driven comparison of two BDA report versions (`bda_diff`)
//! - Search result merging and stale-response tickets (`search`)
//!
//! ## Zero I/O Principle
//!
//! No networking, no filesystem, no async runtime. The adapter layer maps
//! wire records into these types; the service layer renders them.
//!
//! ## Usage Examples
//!
//! ```rust
//! use targeting_core::orbat::{ExpandedSet, OrbatTree};
//! use targeting_core::types::{Affiliation, Unit};
//!
//! let units = vec![
//!     Unit::new("a", "1st Brigade", None, Affiliation::Blue),
//!     Unit::new("b", "1-1 Battalion", Some("a"), Affiliation::Blue),
//! ];
//! let tree = OrbatTree::build(units);
//! let mut expanded = ExpandedSet::new();
//!
//! assert_eq!(tree.visible_rows(Affiliation::Blue, &expanded).len(), 1);
//! expanded.toggle("a");
//! let rows = tree.visible_rows(Affiliation::Blue, &expanded);
//! assert_eq!(rows[1].id, "b");
//! assert_eq!(rows[1].depth, 1);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod bda_diff;
pub mod orbat;
pub mod search;
pub mod types;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bda_diff::{compare_versions, DiffSchema, FieldChange, FieldDescriptor, VersionComparison};
    pub use crate::orbat::{AncestorWalk, ExpandedSet, OrbatTree, TreeRow};
    pub use crate::search::{merge_results, SearchSequence, SearchTicket, FALLBACK_CAP, MERGED_CAP};
    pub use crate::types::*;
}
