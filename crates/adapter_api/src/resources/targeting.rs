//! Targets: listing, status changes and JTB decisions.

use serde::{Deserialize, Serialize};
use targeting_core::types::{GeoPoint, JtbDecision, PriorityTier, Target, TargetStatus};
use validator::Validate;

use super::{collect_valid, validated, ListEnvelope};
use crate::client::ApiClient;
use crate::error::ApiError;

const ENTITY: &str = "target";

/// Target as sent by the API
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TargetRecord {
    /// Identifier
    #[validate(length(min = 1))]
    pub id: String,
    /// Display name
    pub name: String,
    /// Latitude
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    /// Longitude
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    /// Category
    #[serde(default)]
    pub category: String,
    /// Priority tier
    #[validate(range(min = 1, max = 4))]
    pub priority: u8,
    /// Status code
    pub status: String,
    /// F3EAD phase code
    pub kill_chain_phase: String,
}

impl TryFrom<TargetRecord> for Target {
    type Error = ApiError;

    fn try_from(record: TargetRecord) -> Result<Self, ApiError> {
        let core = |e| ApiError::from_core(ENTITY, e);
        Ok(Target {
            location: GeoPoint {
                lat: record.latitude,
                lon: record.longitude,
            },
            priority: PriorityTier::new(record.priority).map_err(core)?,
            status: record.status.parse().map_err(core)?,
            phase: record.kill_chain_phase.parse().map_err(core)?,
            id: record.id,
            name: record.name,
            category: record.category,
        })
    }
}

#[derive(Debug, Serialize)]
struct StatusUpdate<'a> {
    status: &'a str,
}

#[derive(Debug, Serialize)]
struct JtbDecisionBody<'a> {
    decision: &'a str,
    rationale: &'a str,
}

/// Target endpoints
#[derive(Debug, Clone, Copy)]
pub struct TargetingApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    /// Target endpoints
    pub fn targeting(&self) -> TargetingApi<'_> {
        TargetingApi { client: self }
    }
}

impl TargetingApi<'_> {
    /// List all targets
    pub async fn list(&self) -> Result<Vec<Target>, ApiError> {
        let envelope: ListEnvelope = self.client.get(&["targets"]).await?;
        Ok(collect_valid::<TargetRecord, _>(ENTITY, envelope.into_items()))
    }

    /// Fetch one target
    pub async fn get(&self, id: &str) -> Result<Target, ApiError> {
        let record: TargetRecord = self.client.get(&["targets", id]).await?;
        validated(ENTITY, record)
    }

    /// Request a status change
    pub async fn update_status(&self, id: &str, status: TargetStatus) -> Result<Target, ApiError> {
        let body = StatusUpdate { status: status.code() };
        let record: TargetRecord = self.client.patch(&["targets", id], &body).await?;
        validated(ENTITY, record)
    }

    /// Record a Joint Targeting Board decision on a nominated target
    pub async fn record_jtb_decision(
        &self,
        id: &str,
        decision: JtbDecision,
        rationale: &str,
    ) -> Result<Target, ApiError> {
        let body = JtbDecisionBody {
            decision: decision.code(),
            rationale,
        };
        let record: TargetRecord = self.client.post(&["targets", id, "jtb-decision"], &body).await?;
        validated(ENTITY, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use targeting_core::types::KillChainPhase;

    fn record() -> TargetRecord {
        serde_json::from_value(serde_json::json!({
            "id": "T-100",
            "name": "Bridge 4",
            "latitude": 34.1,
            "longitude": 66.2,
            "category": "Infrastructure",
            "priority": 2,
            "status": "NOMINATED",
            "kill_chain_phase": "FIX"
        }))
        .unwrap()
    }

    #[test]
    fn test_record_maps_to_target() {
        let target: Target = validated(ENTITY, record()).unwrap();
        assert_eq!(target.status, TargetStatus::Nominated);
        assert_eq!(target.phase, KillChainPhase::Fix);
        assert_eq!(target.priority.value(), 2);
        assert_eq!(target.location.lon, 66.2);
    }

    #[test]
    fn test_out_of_range_latitude_rejected() {
        let mut bad = record();
        bad.latitude = 91.0;
        let result: Result<Target, _> = validated(ENTITY, bad);
        assert!(matches!(result, Err(ApiError::Schema { entity: "target", .. })));
    }

    #[test]
    fn test_unknown_status_rejected() {
        let mut bad = record();
        bad.status = "VAPORISED".to_string();
        let result: Result<Target, _> = validated(ENTITY, bad);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("VAPORISED"));
    }
}
