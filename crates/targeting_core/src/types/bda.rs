//! Battle damage assessment reports and their version history.
//!
//! Damage is reported with short wire codes; this module owns the
//! code ↔ label translation used by every BDA view.
//!
//! # Examples
//!
//! ```
//! use targeting_core::types::bda::PhysicalDamage;
//!
//! let damage: PhysicalDamage = "SD".parse().unwrap();
//! assert_eq!(damage.label(), "Severe Damage");
//! ```

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::CoreError;

/// Physical damage category.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysicalDamage {
    /// No observable damage
    None,
    /// Light damage
    Light,
    /// Moderate damage
    Moderate,
    /// Severe damage
    Severe,
    /// Destroyed
    Destroyed,
}

impl PhysicalDamage {
    /// All categories, least to most severe.
    pub const ALL: [PhysicalDamage; 5] = [
        PhysicalDamage::None,
        PhysicalDamage::Light,
        PhysicalDamage::Moderate,
        PhysicalDamage::Severe,
        PhysicalDamage::Destroyed,
    ];

    /// Wire code.
    pub fn code(&self) -> &'static str {
        match self {
            PhysicalDamage::None => "ND",
            PhysicalDamage::Light => "LD",
            PhysicalDamage::Moderate => "MD",
            PhysicalDamage::Severe => "SD",
            PhysicalDamage::Destroyed => "DES",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            PhysicalDamage::None => "No Damage",
            PhysicalDamage::Light => "Light Damage",
            PhysicalDamage::Moderate => "Moderate Damage",
            PhysicalDamage::Severe => "Severe Damage",
            PhysicalDamage::Destroyed => "Destroyed",
        }
    }
}

impl FromStr for PhysicalDamage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, CoreError> {
        PhysicalDamage::ALL
            .into_iter()
            .find(|d| d.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::unknown("physical damage", s))
    }
}

/// Functional damage category.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionalDamage {
    /// Fully functional
    NoFunctionalDamage,
    /// Reduced capability
    PartialFunctionalDamage,
    /// Unable to perform its function
    CompleteFunctionalDamage,
    /// Cannot be determined yet
    Unknown,
}

impl FunctionalDamage {
    /// All categories.
    pub const ALL: [FunctionalDamage; 4] = [
        FunctionalDamage::NoFunctionalDamage,
        FunctionalDamage::PartialFunctionalDamage,
        FunctionalDamage::CompleteFunctionalDamage,
        FunctionalDamage::Unknown,
    ];

    /// Wire code.
    pub fn code(&self) -> &'static str {
        match self {
            FunctionalDamage::NoFunctionalDamage => "NFD",
            FunctionalDamage::PartialFunctionalDamage => "PFD",
            FunctionalDamage::CompleteFunctionalDamage => "CFD",
            FunctionalDamage::Unknown => "UNK",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            FunctionalDamage::NoFunctionalDamage => "No Functional Damage",
            FunctionalDamage::PartialFunctionalDamage => "Partial Functional Damage",
            FunctionalDamage::CompleteFunctionalDamage => "Complete Functional Damage",
            FunctionalDamage::Unknown => "Unknown",
        }
    }
}

impl FromStr for FunctionalDamage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, CoreError> {
        FunctionalDamage::ALL
            .into_iter()
            .find(|d| d.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::unknown("functional damage", s))
    }
}

/// Analyst recommendation following an assessment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    /// Objective met
    NoFurtherAction,
    /// Strike again
    Reattack,
    /// Collect more imagery first
    FurtherCollection,
}

impl Recommendation {
    /// Wire code.
    pub fn code(&self) -> &'static str {
        match self {
            Recommendation::NoFurtherAction => "NO_FURTHER_ACTION",
            Recommendation::Reattack => "REATTACK",
            Recommendation::FurtherCollection => "FURTHER_COLLECTION",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::NoFurtherAction => "No Further Action",
            Recommendation::Reattack => "Re-attack",
            Recommendation::FurtherCollection => "Further Collection",
        }
    }
}

impl FromStr for Recommendation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NO_FURTHER_ACTION" => Ok(Recommendation::NoFurtherAction),
            "REATTACK" | "RE_ATTACK" => Ok(Recommendation::Reattack),
            "FURTHER_COLLECTION" => Ok(Recommendation::FurtherCollection),
            _ => Err(CoreError::unknown("recommendation", s)),
        }
    }
}

/// A battle damage assessment report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BdaReport {
    /// Report identifier
    pub id: String,
    /// Assessed target
    pub target_id: String,
    /// Physical damage
    pub physical_damage: PhysicalDamage,
    /// Functional damage
    pub functional_damage: FunctionalDamage,
    /// Analyst confidence, 0..=100
    pub confidence: u8,
    /// Recommendation
    pub recommendation: Recommendation,
    /// Responsible analyst
    pub analyst: String,
    /// Free-text summary
    pub summary: String,
    /// Latest version number
    pub version: u32,
    /// Last update
    pub updated_at: DateTime<Utc>,
}

/// One entry in a report's append-only history.
///
/// `data` is the raw snapshot as stored by the backend; comparisons work on
/// the JSON so that fields the client does not model are still visible.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BdaVersion {
    /// Version number, strictly increasing
    pub version: u32,
    /// When this version was recorded
    pub created_at: DateTime<Utc>,
    /// Snapshot of the report at this version
    pub data: serde_json::Value,
}
