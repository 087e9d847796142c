//! Planning assumptions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use targeting_core::types::{Assumption, AssumptionStatus};
use validator::Validate;

use super::{collect_valid, validated, ListEnvelope};
use crate::client::ApiClient;
use crate::error::ApiError;

const ENTITY: &str = "assumption";

#[derive(Debug, Deserialize, Validate)]
struct AssumptionRecord {
    #[validate(length(min = 1))]
    id: String,
    #[validate(length(min = 1))]
    title: String,
    #[serde(default)]
    category: String,
    status: String,
    #[validate(range(max = 100))]
    #[serde(default)]
    confidence: u8,
    #[serde(default)]
    owner: String,
    #[serde(default)]
    last_reviewed_at: Option<DateTime<Utc>>,
}

impl TryFrom<AssumptionRecord> for Assumption {
    type Error = ApiError;

    fn try_from(record: AssumptionRecord) -> Result<Self, ApiError> {
        Ok(Assumption {
            status: record
                .status
                .parse()
                .map_err(|e| ApiError::from_core(ENTITY, e))?,
            id: record.id,
            title: record.title,
            category: record.category,
            confidence: record.confidence,
            owner: record.owner,
            last_reviewed: record.last_reviewed_at,
        })
    }
}

/// A new assumption to register
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewAssumption {
    /// Short statement
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Category
    pub category: String,
    /// Confidence, 0..=100
    #[validate(range(max = 100))]
    pub confidence: u8,
    /// Responsible staff section
    pub owner: String,
}

#[derive(Debug, Serialize)]
struct StatusUpdate<'a> {
    status: &'a str,
}

/// Assumption endpoints
#[derive(Debug, Clone, Copy)]
pub struct AssumptionsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    /// Assumption endpoints
    pub fn assumptions(&self) -> AssumptionsApi<'_> {
        AssumptionsApi { client: self }
    }
}

impl AssumptionsApi<'_> {
    /// List assumptions
    pub async fn list(&self) -> Result<Vec<Assumption>, ApiError> {
        let envelope: ListEnvelope = self.client.get(&["assumptions"]).await?;
        Ok(collect_valid::<AssumptionRecord, _>(ENTITY, envelope.into_items()))
    }

    /// Register a new assumption. The draft is validated before sending.
    pub async fn create(&self, draft: &NewAssumption) -> Result<Assumption, ApiError> {
        draft
            .validate()
            .map_err(|e| ApiError::schema(ENTITY, e.to_string()))?;
        let record: AssumptionRecord = self.client.post(&["assumptions"], draft).await?;
        validated(ENTITY, record)
    }

    /// Change an assumption's status
    pub async fn update_status(&self, id: &str, status: AssumptionStatus) -> Result<Assumption, ApiError> {
        let body = StatusUpdate { status: status.code() };
        let record: AssumptionRecord = self.client.patch(&["assumptions", id], &body).await?;
        validated(ENTITY, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_validation() {
        let draft = NewAssumption {
            title: String::new(),
            category: "Enemy".to_string(),
            confidence: 120,
            owner: "J2".to_string(),
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }
}
