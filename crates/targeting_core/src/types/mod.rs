//! Entity types received from the targeting API.
//!
//! This module provides:
//! - `target`: Targets, lifecycle status, F3EAD phase, priority tiers
//! - `unit`: ORBAT units and affiliation
//! - `bda`: BDA reports, damage codes, version history entries
//! - `gate`: Decision gate status panels
//! - `assumption`: Planning assumptions and ROE rules
//! - `role`: Operator roles
//! - `error`: Translation errors
//!
//! Each enum exposes `code()` (wire form) and, where shown to the operator,
//! `label()`; parsing goes through `FromStr` and fails with [`CoreError`].

pub mod assumption;
pub mod bda;
pub mod error;
pub mod gate;
pub mod role;
pub mod target;
pub mod unit;

pub use assumption::{Assumption, AssumptionStatus, RoeRule, RoeRuleStatus};
pub use bda::{BdaReport, BdaVersion, FunctionalDamage, PhysicalDamage, Recommendation};
pub use error::CoreError;
pub use gate::{overall_status, DecisionGate, GateKind, GateStatus};
pub use role::Role;
pub use target::{GeoPoint, JtbDecision, KillChainPhase, PriorityTier, Target, TargetStatus};
pub use unit::{Affiliation, ReadinessBand, Unit};
