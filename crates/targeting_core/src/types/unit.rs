//! Order-of-battle unit records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CoreError;

/// Force affiliation of a unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Affiliation {
    /// Friendly forces
    Blue,
    /// Opposing forces
    Red,
}

impl Affiliation {
    /// Wire code used by the API.
    pub fn code(&self) -> &'static str {
        match self {
            Affiliation::Blue => "BLUE",
            Affiliation::Red => "RED",
        }
    }

    /// The other affiliation.
    pub fn opposite(&self) -> Self {
        match self {
            Affiliation::Blue => Affiliation::Red,
            Affiliation::Red => Affiliation::Blue,
        }
    }
}

impl FromStr for Affiliation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BLUE" | "FRIENDLY" => Ok(Affiliation::Blue),
            "RED" | "HOSTILE" => Ok(Affiliation::Red),
            _ => Err(CoreError::unknown("affiliation", s)),
        }
    }
}

impl fmt::Display for Affiliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Affiliation::Blue => f.write_str("Blue"),
            Affiliation::Red => f.write_str("Red"),
        }
    }
}

/// A unit in the order of battle.
///
/// `parent_id` is the only tree edge. Well-formedness of the resulting
/// forest is checked by [`crate::orbat::OrbatTree`], not here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Backend identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Parent unit, `None` for a root
    pub parent_id: Option<String>,
    /// Force affiliation
    pub affiliation: Affiliation,
    /// Echelon, e.g. "BDE", "BN"
    pub echelon: String,
    /// Readiness score, 0..=100
    pub readiness: u8,
    /// Mission capabilities
    pub capabilities: Vec<String>,
    /// Employment caveats
    pub caveats: Vec<String>,
    /// Hard restrictions
    pub restrictions: Vec<String>,
}

impl Unit {
    /// Create a unit with empty capability lists and full readiness.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        parent_id: Option<&str>,
        affiliation: Affiliation,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: parent_id.map(str::to_string),
            affiliation,
            echelon: String::new(),
            readiness: 100,
            capabilities: Vec::new(),
            caveats: Vec::new(),
            restrictions: Vec::new(),
        }
    }

    /// Whether this unit has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Readiness band for display.
    pub fn readiness_band(&self) -> ReadinessBand {
        match self.readiness {
            85..=u8::MAX => ReadinessBand::FullyMissionCapable,
            60..=84 => ReadinessBand::MissionCapable,
            40..=59 => ReadinessBand::Degraded,
            _ => ReadinessBand::NotMissionCapable,
        }
    }
}

/// Coarse readiness classification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReadinessBand {
    /// 85 and above
    FullyMissionCapable,
    /// 60 to 84
    MissionCapable,
    /// 40 to 59
    Degraded,
    /// Below 40
    NotMissionCapable,
}

impl ReadinessBand {
    /// Short display label.
    pub fn label(&self) -> &'static str {
        match self {
            ReadinessBand::FullyMissionCapable => "FMC",
            ReadinessBand::MissionCapable => "MC",
            ReadinessBand::Degraded => "DEG",
            ReadinessBand::NotMissionCapable => "NMC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affiliation_aliases() {
        assert_eq!("friendly".parse::<Affiliation>().unwrap(), Affiliation::Blue);
        assert_eq!("RED".parse::<Affiliation>().unwrap(), Affiliation::Red);
        assert!("green".parse::<Affiliation>().is_err());
    }

    #[test]
    fn test_readiness_bands() {
        let mut unit = Unit::new("u1", "Recon", None, Affiliation::Blue);
        assert_eq!(unit.readiness_band(), ReadinessBand::FullyMissionCapable);
        unit.readiness = 60;
        assert_eq!(unit.readiness_band(), ReadinessBand::MissionCapable);
        unit.readiness = 45;
        assert_eq!(unit.readiness_band(), ReadinessBand::Degraded);
        unit.readiness = 10;
        assert_eq!(unit.readiness_band().label(), "NMC");
    }
}
