//! Order-of-battle units.

use serde::Deserialize;
use targeting_core::orbat::OrbatTree;
use targeting_core::types::Unit;
use tracing::warn;
use validator::Validate;

use super::{collect_valid, ListEnvelope, StringList};
use crate::client::ApiClient;
use crate::error::ApiError;

const ENTITY: &str = "unit";

/// Unit as sent by the API
#[derive(Debug, Deserialize, Validate)]
pub struct UnitRecord {
    #[validate(length(min = 1))]
    id: String,
    name: String,
    #[serde(default)]
    parent_id: Option<String>,
    affiliation: String,
    #[serde(default)]
    echelon: String,
    #[validate(range(max = 100))]
    #[serde(default)]
    readiness: u8,
    #[serde(default)]
    capabilities: StringList,
    #[serde(default)]
    caveats: StringList,
    #[serde(default)]
    restrictions: StringList,
}

impl TryFrom<UnitRecord> for Unit {
    type Error = ApiError;

    fn try_from(record: UnitRecord) -> Result<Self, ApiError> {
        Ok(Unit {
            affiliation: record
                .affiliation
                .parse()
                .map_err(|e| ApiError::from_core(ENTITY, e))?,
            // Some producers send "" for a root.
            parent_id: record.parent_id.filter(|p| !p.is_empty()),
            id: record.id,
            name: record.name,
            echelon: record.echelon,
            readiness: record.readiness,
            capabilities: record.capabilities.into_vec(),
            caveats: record.caveats.into_vec(),
            restrictions: record.restrictions.into_vec(),
        })
    }
}

/// ORBAT endpoints
#[derive(Debug, Clone, Copy)]
pub struct OrbatApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    /// ORBAT endpoints
    pub fn orbat(&self) -> OrbatApi<'_> {
        OrbatApi { client: self }
    }
}

impl OrbatApi<'_> {
    /// List all units
    pub async fn list_units(&self) -> Result<Vec<Unit>, ApiError> {
        let envelope: ListEnvelope = self.client.get(&["orbat", "units"]).await?;
        Ok(collect_valid::<UnitRecord, _>(ENTITY, envelope.into_items()))
    }

    /// Fetch all units and index them, logging any structural problems
    pub async fn tree(&self) -> Result<OrbatTree, ApiError> {
        let tree = OrbatTree::build(self.list_units().await?);
        report_integrity(&tree);
        Ok(tree)
    }
}

/// Log orphans, cycles and duplicate ids found in a fetched ORBAT.
pub fn report_integrity(tree: &OrbatTree) {
    for unit in tree.orphans() {
        warn!(unit = %unit.id, parent = ?unit.parent_id, "ORBAT unit references a missing parent");
    }
    let cyclic: Vec<&str> = tree.cycle_members().map(|u| u.id.as_str()).collect();
    if !cyclic.is_empty() {
        warn!(units = ?cyclic, "ORBAT parent chain contains a cycle");
    }
    for id in tree.duplicates() {
        warn!(unit = %id, "ORBAT unit id appears more than once");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::validated;
    use targeting_core::types::Affiliation;

    #[test]
    fn test_joined_capabilities_are_split() {
        let record: UnitRecord = serde_json::from_value(serde_json::json!({
            "id": "1BDE",
            "name": "1st Brigade",
            "parent_id": "",
            "affiliation": "blue",
            "readiness": 82,
            "capabilities": "ISR, Fires ,",
            "caveats": ["No night ops"]
        }))
        .unwrap();

        let unit: Unit = validated(ENTITY, record).unwrap();
        assert_eq!(unit.affiliation, Affiliation::Blue);
        assert!(unit.is_root());
        assert_eq!(unit.capabilities, vec!["ISR", "Fires"]);
        assert_eq!(unit.caveats, vec!["No night ops"]);
        assert!(unit.restrictions.is_empty());
    }

    #[test]
    fn test_readiness_over_100_rejected() {
        let record: UnitRecord = serde_json::from_value(serde_json::json!({
            "id": "x",
            "name": "X",
            "affiliation": "RED",
            "readiness": 140
        }))
        .unwrap();
        let result: Result<Unit, _> = validated(ENTITY, record);
        assert!(result.is_err());
    }
}
