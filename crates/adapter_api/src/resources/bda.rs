//! Battle damage assessment reports and their version history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use targeting_core::types::{BdaReport, BdaVersion, FunctionalDamage, PhysicalDamage, Recommendation};
use validator::Validate;

use super::{collect_valid, validated, ListEnvelope};
use crate::client::ApiClient;
use crate::error::ApiError;

const ENTITY: &str = "bda report";
const VERSION_ENTITY: &str = "bda version";

/// Report as sent by the API
#[derive(Debug, Deserialize, Validate)]
pub struct BdaReportRecord {
    #[validate(length(min = 1))]
    id: String,
    target_id: String,
    physical_damage: String,
    functional_damage: String,
    #[validate(range(max = 100))]
    confidence_level: u8,
    recommendation: String,
    #[serde(default)]
    analyst: String,
    #[serde(default)]
    summary: String,
    #[validate(range(min = 1))]
    version: u32,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BdaReportRecord> for BdaReport {
    type Error = ApiError;

    fn try_from(record: BdaReportRecord) -> Result<Self, ApiError> {
        let core = |e| ApiError::from_core(ENTITY, e);
        Ok(BdaReport {
            physical_damage: record.physical_damage.parse().map_err(core)?,
            functional_damage: record.functional_damage.parse().map_err(core)?,
            recommendation: record.recommendation.parse().map_err(core)?,
            id: record.id,
            target_id: record.target_id,
            confidence: record.confidence_level,
            analyst: record.analyst,
            summary: record.summary,
            version: record.version,
            updated_at: record.updated_at,
        })
    }
}

/// History entry as sent by the API.
///
/// `report_data_json` is stored by the backend as serialised text; some
/// deployments inline it as an object. Both are accepted.
#[derive(Debug, Deserialize, Validate)]
pub struct BdaVersionRecord {
    #[validate(range(min = 1))]
    version: u32,
    created_at: DateTime<Utc>,
    report_data_json: Value,
}

impl TryFrom<BdaVersionRecord> for BdaVersion {
    type Error = ApiError;

    fn try_from(record: BdaVersionRecord) -> Result<Self, ApiError> {
        let data = match record.report_data_json {
            Value::String(text) => serde_json::from_str(&text).map_err(|e| {
                ApiError::schema(VERSION_ENTITY, format!("version {}: {}", record.version, e))
            })?,
            other => other,
        };
        if !data.is_object() {
            return Err(ApiError::schema(
                VERSION_ENTITY,
                format!("version {} snapshot is not an object", record.version),
            ));
        }
        Ok(BdaVersion {
            version: record.version,
            created_at: record.created_at,
            data,
        })
    }
}

/// Fields an analyst may change on a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BdaReportUpdate {
    /// Physical damage code
    pub physical_damage: &'static str,
    /// Functional damage code
    pub functional_damage: &'static str,
    /// Confidence, 0..=100
    pub confidence_level: u8,
    /// Recommendation code
    pub recommendation: &'static str,
    /// Summary text
    pub summary: String,
}

impl BdaReportUpdate {
    /// Build an update from domain values
    pub fn new(
        physical: PhysicalDamage,
        functional: FunctionalDamage,
        confidence: u8,
        recommendation: Recommendation,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            physical_damage: physical.code(),
            functional_damage: functional.code(),
            confidence_level: confidence.min(100),
            recommendation: recommendation.code(),
            summary: summary.into(),
        }
    }
}

impl From<&BdaReport> for BdaReportUpdate {
    fn from(report: &BdaReport) -> Self {
        Self::new(
            report.physical_damage,
            report.functional_damage,
            report.confidence,
            report.recommendation,
            report.summary.clone(),
        )
    }
}

/// BDA endpoints
#[derive(Debug, Clone, Copy)]
pub struct BdaApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    /// BDA endpoints
    pub fn bda(&self) -> BdaApi<'_> {
        BdaApi { client: self }
    }
}

impl BdaApi<'_> {
    /// List reports
    pub async fn list_reports(&self) -> Result<Vec<BdaReport>, ApiError> {
        let envelope: ListEnvelope = self.client.get(&["bda", "reports"]).await?;
        Ok(collect_valid::<BdaReportRecord, _>(ENTITY, envelope.into_items()))
    }

    /// Fetch one report
    pub async fn get_report(&self, id: &str) -> Result<BdaReport, ApiError> {
        let record: BdaReportRecord = self.client.get(&["bda", "reports", id]).await?;
        validated(ENTITY, record)
    }

    /// Version history, oldest first
    pub async fn history(&self, id: &str) -> Result<Vec<BdaVersion>, ApiError> {
        let envelope: ListEnvelope = self.client.get(&["bda", "reports", id, "history"]).await?;
        let mut versions: Vec<BdaVersion> =
            collect_valid::<BdaVersionRecord, _>(VERSION_ENTITY, envelope.into_items());
        versions.sort_by_key(|v| v.version);
        Ok(versions)
    }

    /// Replace the editable fields of a report
    pub async fn update_report(&self, id: &str, update: &BdaReportUpdate) -> Result<BdaReport, ApiError> {
        let record: BdaReportRecord = self.client.put(&["bda", "reports", id], update).await?;
        validated(ENTITY, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stringified_snapshot_is_parsed() {
        let record: BdaVersionRecord = serde_json::from_value(json!({
            "version": 2,
            "created_at": "2024-03-01T12:00:00Z",
            "report_data_json": "{\"physical_damage\":\"SD\"}"
        }))
        .unwrap();
        let version: BdaVersion = validated(VERSION_ENTITY, record).unwrap();
        assert_eq!(version.data["physical_damage"], "SD");
    }

    #[test]
    fn test_inline_snapshot_is_accepted() {
        let record: BdaVersionRecord = serde_json::from_value(json!({
            "version": 1,
            "created_at": "2024-03-01T12:00:00Z",
            "report_data_json": {"confidence": 40}
        }))
        .unwrap();
        let version: BdaVersion = validated(VERSION_ENTITY, record).unwrap();
        assert_eq!(version.data["confidence"], 40);
    }

    #[test]
    fn test_non_object_snapshot_rejected() {
        let record: BdaVersionRecord = serde_json::from_value(json!({
            "version": 1,
            "created_at": "2024-03-01T12:00:00Z",
            "report_data_json": "[1,2]"
        }))
        .unwrap();
        let result: Result<BdaVersion, _> = validated(VERSION_ENTITY, record);
        assert!(result.is_err());
    }

    #[test]
    fn test_report_maps_damage_codes() {
        let record: BdaReportRecord = serde_json::from_value(json!({
            "id": "BDA-7",
            "target_id": "T-100",
            "physical_damage": "DES",
            "functional_damage": "CFD",
            "confidence_level": 90,
            "recommendation": "NO_FURTHER_ACTION",
            "version": 3,
            "updated_at": "2024-03-02T08:30:00Z"
        }))
        .unwrap();
        let report: BdaReport = validated(ENTITY, record).unwrap();
        assert_eq!(report.physical_damage, PhysicalDamage::Destroyed);
        assert_eq!(BdaReportUpdate::from(&report).physical_damage, "DES");
    }
}
