//! Rules of engagement and decision gate status.

use serde::Deserialize;
use targeting_core::types::{DecisionGate, RoeRule};
use validator::Validate;

use super::{collect_valid, ListEnvelope};
use crate::client::ApiClient;
use crate::error::ApiError;

#[derive(Debug, Deserialize, Validate)]
struct RoeRuleRecord {
    #[validate(length(min = 1))]
    id: String,
    code: String,
    title: String,
    #[serde(default)]
    description: String,
    status: String,
}

impl TryFrom<RoeRuleRecord> for RoeRule {
    type Error = ApiError;

    fn try_from(record: RoeRuleRecord) -> Result<Self, ApiError> {
        Ok(RoeRule {
            status: record
                .status
                .parse()
                .map_err(|e| ApiError::from_core("roe rule", e))?,
            id: record.id,
            code: record.code,
            title: record.title,
            description: record.description,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
struct GateRecord {
    gate: String,
    status: String,
    #[serde(default)]
    value: String,
    #[serde(default = "default_classification")]
    classification: String,
}

fn default_classification() -> String {
    "UNCLASSIFIED".to_string()
}

impl TryFrom<GateRecord> for DecisionGate {
    type Error = ApiError;

    fn try_from(record: GateRecord) -> Result<Self, ApiError> {
        let core = |e| ApiError::from_core("decision gate", e);
        Ok(DecisionGate {
            kind: record.gate.parse().map_err(core)?,
            status: record.status.parse().map_err(core)?,
            value: record.value,
            classification: record.classification,
        })
    }
}

/// ROE and decision gate endpoints
#[derive(Debug, Clone, Copy)]
pub struct RoeApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    /// ROE and decision gate endpoints
    pub fn roe(&self) -> RoeApi<'_> {
        RoeApi { client: self }
    }
}

impl RoeApi<'_> {
    /// List rules of engagement
    pub async fn list_rules(&self) -> Result<Vec<RoeRule>, ApiError> {
        let envelope: ListEnvelope = self.client.get(&["roe", "rules"]).await?;
        Ok(collect_valid::<RoeRuleRecord, _>("roe rule", envelope.into_items()))
    }

    /// Current status of every decision gate
    pub async fn decision_gates(&self) -> Result<Vec<DecisionGate>, ApiError> {
        let envelope: ListEnvelope = self.client.get(&["decision-gates"]).await?;
        let mut gates: Vec<DecisionGate> =
            collect_valid::<GateRecord, _>("decision gate", envelope.into_items());
        gates.sort_by_key(|g| g.kind.index());
        Ok(gates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::validated;
    use targeting_core::types::{GateKind, GateStatus};

    #[test]
    fn test_gate_record_defaults_classification() {
        let record: GateRecord =
            serde_json::from_value(serde_json::json!({"gate": "cde", "status": "AMBER", "value": "CAT II"})).unwrap();
        let gate: DecisionGate = validated("decision gate", record).unwrap();
        assert_eq!(gate.kind, GateKind::Cde);
        assert_eq!(gate.status, GateStatus::Yellow);
        assert_eq!(gate.classification, "UNCLASSIFIED");
    }
}
