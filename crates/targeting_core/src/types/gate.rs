//! Decision gate read models (ROE, CDE, Weather, Deconfliction).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CoreError;

/// Which gate a status refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// Rules of Engagement
    Roe,
    /// Collateral Damage Estimate
    Cde,
    /// Weather
    Weather,
    /// Airspace / fires deconfliction
    Deconfliction,
}

impl GateKind {
    /// All gates in panel order.
    pub const ALL: [GateKind; 4] = [
        GateKind::Roe,
        GateKind::Cde,
        GateKind::Weather,
        GateKind::Deconfliction,
    ];

    /// Wire code.
    pub fn code(&self) -> &'static str {
        match self {
            GateKind::Roe => "ROE",
            GateKind::Cde => "CDE",
            GateKind::Weather => "WEATHER",
            GateKind::Deconfliction => "DECONFLICTION",
        }
    }

    /// Position in panel order.
    pub fn index(&self) -> usize {
        GateKind::ALL.iter().position(|k| k == self).unwrap_or_default()
    }

    /// Panel title.
    pub fn title(&self) -> &'static str {
        match self {
            GateKind::Roe => "Rules of Engagement",
            GateKind::Cde => "Collateral Damage",
            GateKind::Weather => "Weather",
            GateKind::Deconfliction => "Deconfliction",
        }
    }
}

impl FromStr for GateKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, CoreError> {
        GateKind::ALL
            .into_iter()
            .find(|kind| kind.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::unknown("decision gate", s))
    }
}

/// Traffic-light status of a gate. Ordered from best to worst.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GateStatus {
    /// Clear to proceed
    Green,
    /// Proceed with caution
    Yellow,
    /// Blocked
    Red,
}

impl GateStatus {
    /// Wire code.
    pub fn code(&self) -> &'static str {
        match self {
            GateStatus::Green => "GREEN",
            GateStatus::Yellow => "YELLOW",
            GateStatus::Red => "RED",
        }
    }
}

impl FromStr for GateStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GREEN" => Ok(GateStatus::Green),
            "YELLOW" | "AMBER" => Ok(GateStatus::Yellow),
            "RED" => Ok(GateStatus::Red),
            _ => Err(CoreError::unknown("gate status", s)),
        }
    }
}

/// Current status of one decision gate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionGate {
    /// Gate
    pub kind: GateKind,
    /// Traffic light
    pub status: GateStatus,
    /// Display value, e.g. "CAT II" or "Ceiling 1200ft"
    pub value: String,
    /// Classification marking shown with the panel
    pub classification: String,
}

/// Worst status across a set of gates, `None` when the set is empty.
pub fn overall_status(gates: &[DecisionGate]) -> Option<GateStatus> {
    gates.iter().map(|g| g.status).max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(kind: GateKind, status: GateStatus) -> DecisionGate {
        DecisionGate {
            kind,
            status,
            value: String::new(),
            classification: "UNCLASSIFIED".to_string(),
        }
    }

    #[test]
    fn test_overall_status_is_worst() {
        let gates = vec![
            gate(GateKind::Roe, GateStatus::Green),
            gate(GateKind::Weather, GateStatus::Yellow),
            gate(GateKind::Cde, GateStatus::Green),
        ];
        assert_eq!(overall_status(&gates), Some(GateStatus::Yellow));
        assert_eq!(overall_status(&[]), None);
    }

    #[test]
    fn test_amber_alias() {
        assert_eq!("amber".parse::<GateStatus>().unwrap(), GateStatus::Yellow);
    }
}
