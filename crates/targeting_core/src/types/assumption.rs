//! Planning assumptions and ROE rules.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::CoreError;

/// Validity status of a planning assumption.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssumptionStatus {
    /// Still holds
    Valid,
    /// Indicators suggest it may not hold
    AtRisk,
    /// No longer holds
    Invalidated,
}

impl AssumptionStatus {
    /// Wire code.
    pub fn code(&self) -> &'static str {
        match self {
            AssumptionStatus::Valid => "VALID",
            AssumptionStatus::AtRisk => "AT_RISK",
            AssumptionStatus::Invalidated => "INVALIDATED",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            AssumptionStatus::Valid => "Valid",
            AssumptionStatus::AtRisk => "At Risk",
            AssumptionStatus::Invalidated => "Invalidated",
        }
    }

    /// Next status in the review cycle used by the dashboard's quick toggle.
    pub fn next(&self) -> Self {
        match self {
            AssumptionStatus::Valid => AssumptionStatus::AtRisk,
            AssumptionStatus::AtRisk => AssumptionStatus::Invalidated,
            AssumptionStatus::Invalidated => AssumptionStatus::Valid,
        }
    }
}

impl FromStr for AssumptionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "VALID" => Ok(AssumptionStatus::Valid),
            "AT_RISK" | "AT RISK" => Ok(AssumptionStatus::AtRisk),
            "INVALIDATED" | "INVALID" => Ok(AssumptionStatus::Invalidated),
            _ => Err(CoreError::unknown("assumption status", s)),
        }
    }
}

/// A planning assumption tracked by the cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assumption {
    /// Identifier
    pub id: String,
    /// Short statement
    pub title: String,
    /// Category, e.g. "Enemy", "Logistics"
    pub category: String,
    /// Validity
    pub status: AssumptionStatus,
    /// Confidence, 0..=100
    pub confidence: u8,
    /// Responsible staff section
    pub owner: String,
    /// Last review, if ever reviewed
    pub last_reviewed: Option<DateTime<Utc>>,
}

/// Whether a rule of engagement currently applies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoeRuleStatus {
    /// In force
    Active,
    /// Temporarily suspended
    Suspended,
}

impl RoeRuleStatus {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            RoeRuleStatus::Active => "Active",
            RoeRuleStatus::Suspended => "Suspended",
        }
    }
}

impl FromStr for RoeRuleStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(RoeRuleStatus::Active),
            "SUSPENDED" => Ok(RoeRuleStatus::Suspended),
            _ => Err(CoreError::unknown("roe status", s)),
        }
    }
}

/// A rule of engagement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoeRule {
    /// Identifier
    pub id: String,
    /// Serial, e.g. "ROE 421"
    pub code: String,
    /// Short title
    pub title: String,
    /// Full text
    pub description: String,
    /// In force or suspended
    pub status: RoeRuleStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_cycle_returns_to_start() {
        let start = AssumptionStatus::Valid;
        assert_eq!(start.next().next().next(), start);
    }

    #[test]
    fn test_status_aliases() {
        assert_eq!("at risk".parse::<AssumptionStatus>().unwrap(), AssumptionStatus::AtRisk);
        assert_eq!("invalid".parse::<AssumptionStatus>().unwrap(), AssumptionStatus::Invalidated);
    }
}
