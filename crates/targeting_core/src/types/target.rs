//! Target records and their lifecycle enums.
//!
//! # Examples
//!
//! ```
//! use targeting_core::types::target::{KillChainPhase, TargetStatus};
//!
//! let status: TargetStatus = "NOMINATED".parse().unwrap();
//! assert_eq!(status.label(), "Nominated");
//! assert_eq!(KillChainPhase::Exploit.code(), "EXPLOIT");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CoreError;

/// Target lifecycle status as reported by the nomination workflow.
///
/// The backend owns the transitions; the client only displays the status
/// and forwards requested changes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetStatus {
    /// Detected, not yet put forward
    Identified,
    /// Submitted to the Joint Targeting Board
    Nominated,
    /// Approved by the JTB
    Approved,
    /// Rejected by the JTB
    Rejected,
    /// Strike executed
    Engaged,
    /// Battle damage assessment completed
    Assessed,
}

impl TargetStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [TargetStatus; 6] = [
        TargetStatus::Identified,
        TargetStatus::Nominated,
        TargetStatus::Approved,
        TargetStatus::Rejected,
        TargetStatus::Engaged,
        TargetStatus::Assessed,
    ];

    /// Wire code used by the API.
    pub fn code(&self) -> &'static str {
        match self {
            TargetStatus::Identified => "IDENTIFIED",
            TargetStatus::Nominated => "NOMINATED",
            TargetStatus::Approved => "APPROVED",
            TargetStatus::Rejected => "REJECTED",
            TargetStatus::Engaged => "ENGAGED",
            TargetStatus::Assessed => "ASSESSED",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            TargetStatus::Identified => "Identified",
            TargetStatus::Nominated => "Nominated",
            TargetStatus::Approved => "Approved",
            TargetStatus::Rejected => "Rejected",
            TargetStatus::Engaged => "Engaged",
            TargetStatus::Assessed => "Assessed",
        }
    }

    /// Whether the status is awaiting a JTB decision.
    pub fn awaits_decision(&self) -> bool {
        matches!(self, TargetStatus::Nominated)
    }
}

impl FromStr for TargetStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, CoreError> {
        TargetStatus::ALL
            .into_iter()
            .find(|status| status.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::unknown("target status", s))
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// F3EAD kill-chain phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KillChainPhase {
    /// Find
    Find,
    /// Fix
    Fix,
    /// Finish
    Finish,
    /// Exploit
    Exploit,
    /// Analyze
    Analyze,
    /// Disseminate
    Disseminate,
}

impl KillChainPhase {
    /// All phases in process order.
    pub const ALL: [KillChainPhase; 6] = [
        KillChainPhase::Find,
        KillChainPhase::Fix,
        KillChainPhase::Finish,
        KillChainPhase::Exploit,
        KillChainPhase::Analyze,
        KillChainPhase::Disseminate,
    ];

    /// Wire code used by the API.
    pub fn code(&self) -> &'static str {
        match self {
            KillChainPhase::Find => "FIND",
            KillChainPhase::Fix => "FIX",
            KillChainPhase::Finish => "FINISH",
            KillChainPhase::Exploit => "EXPLOIT",
            KillChainPhase::Analyze => "ANALYZE",
            KillChainPhase::Disseminate => "DISSEMINATE",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            KillChainPhase::Find => "Find",
            KillChainPhase::Fix => "Fix",
            KillChainPhase::Finish => "Finish",
            KillChainPhase::Exploit => "Exploit",
            KillChainPhase::Analyze => "Analyze",
            KillChainPhase::Disseminate => "Disseminate",
        }
    }

    /// Zero-based position in the F3EAD cycle.
    pub fn index(&self) -> usize {
        KillChainPhase::ALL
            .iter()
            .position(|phase| phase == self)
            .unwrap_or_default()
    }
}

impl FromStr for KillChainPhase {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, CoreError> {
        KillChainPhase::ALL
            .into_iter()
            .find(|phase| phase.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::unknown("kill chain phase", s))
    }
}

/// Priority tier, 1 being the most urgent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PriorityTier(u8);

impl PriorityTier {
    /// Lowest-urgency tier accepted.
    pub const LOWEST: u8 = 4;

    /// Create a tier, rejecting values outside 1..=4.
    pub fn new(tier: u8) -> Result<Self, CoreError> {
        if (1..=Self::LOWEST).contains(&tier) {
            Ok(Self(tier))
        } else {
            Err(CoreError::invalid(
                "priority",
                format!("tier {} outside 1..={}", tier, Self::LOWEST),
            ))
        }
    }

    /// Raw tier number.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Display label, e.g. `P1`.
    pub fn label(&self) -> String {
        format!("P{}", self.0)
    }
}

impl Default for PriorityTier {
    fn default() -> Self {
        Self(Self::LOWEST)
    }
}

/// Geographic position in decimal degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude, -90..=90
    pub lat: f64,
    /// Longitude, -180..=180
    pub lon: f64,
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat >= 0.0 { 'N' } else { 'S' };
        let ew = if self.lon >= 0.0 { 'E' } else { 'W' };
        write!(f, "{:.4}{} {:.4}{}", self.lat.abs(), ns, self.lon.abs(), ew)
    }
}

/// A target under management by the cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Backend identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Location
    pub location: GeoPoint,
    /// Category, e.g. "C2 Node"
    pub category: String,
    /// Priority tier
    pub priority: PriorityTier,
    /// Lifecycle status
    pub status: TargetStatus,
    /// Current F3EAD phase
    pub phase: KillChainPhase,
}

/// Decision recorded by the Joint Targeting Board for a nominated target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JtbDecision {
    /// Nomination approved
    Approve,
    /// Nomination rejected
    Reject,
    /// Returned for more information
    Defer,
}

impl JtbDecision {
    /// Wire code used by the API.
    pub fn code(&self) -> &'static str {
        match self {
            JtbDecision::Approve => "APPROVE",
            JtbDecision::Reject => "REJECT",
            JtbDecision::Defer => "DEFER",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_case_insensitive() {
        assert_eq!("engaged".parse::<TargetStatus>().unwrap(), TargetStatus::Engaged);
        assert_eq!(" Approved ".parse::<TargetStatus>().unwrap(), TargetStatus::Approved);
    }

    #[test]
    fn test_status_unknown_code() {
        let err = "DESTROYED".parse::<TargetStatus>().unwrap_err();
        assert_eq!(err, CoreError::unknown("target status", "DESTROYED"));
    }

    #[test]
    fn test_only_nominated_awaits_decision() {
        let waiting: Vec<_> = TargetStatus::ALL
            .into_iter()
            .filter(TargetStatus::awaits_decision)
            .collect();
        assert_eq!(waiting, vec![TargetStatus::Nominated]);
    }

    #[test]
    fn test_phase_index_follows_f3ead_order() {
        assert_eq!(KillChainPhase::Find.index(), 0);
        assert_eq!(KillChainPhase::Disseminate.index(), 5);
    }

    #[test]
    fn test_priority_bounds() {
        assert!(PriorityTier::new(0).is_err());
        assert!(PriorityTier::new(5).is_err());
        assert_eq!(PriorityTier::new(2).unwrap().label(), "P2");
    }

    #[test]
    fn test_geo_point_display() {
        let p = GeoPoint { lat: 34.5, lon: -69.25 };
        assert_eq!(p.to_string(), "34.5000N 69.2500W");
    }
}
