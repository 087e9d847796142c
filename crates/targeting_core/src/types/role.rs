//! Dashboard user roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CoreError;

/// Role the operator is working in. Controls which actions the dashboard
/// offers; authorisation itself is enforced by the backend.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Approves nominations
    Commander,
    /// Builds and nominates targets
    Targeteer,
    /// Writes BDA reports
    Analyst,
    /// Read-only
    #[default]
    Observer,
}

impl Role {
    /// All roles.
    pub const ALL: [Role; 4] = [Role::Commander, Role::Targeteer, Role::Analyst, Role::Observer];

    /// Whether the role may record JTB decisions.
    pub fn can_decide(&self) -> bool {
        matches!(self, Role::Commander)
    }

    /// Whether the role may change target or assumption status.
    pub fn can_edit(&self) -> bool {
        !matches!(self, Role::Observer)
    }

    /// Next role, for cycling in the UI.
    pub fn next(&self) -> Self {
        match self {
            Role::Commander => Role::Targeteer,
            Role::Targeteer => Role::Analyst,
            Role::Analyst => Role::Observer,
            Role::Observer => Role::Commander,
        }
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "commander" => Ok(Role::Commander),
            "targeteer" => Ok(Role::Targeteer),
            "analyst" => Ok(Role::Analyst),
            "observer" => Ok(Role::Observer),
            _ => Err(CoreError::unknown("role", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Commander => "Commander",
            Role::Targeteer => "Targeteer",
            Role::Analyst => "Analyst",
            Role::Observer => "Observer",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissions() {
        assert!(Role::Commander.can_decide());
        assert!(!Role::Analyst.can_decide());
        assert!(Role::Analyst.can_edit());
        assert!(!Role::Observer.can_edit());
    }

    #[test]
    fn test_default_is_read_only() {
        assert_eq!(Role::default(), Role::Observer);
    }
}
