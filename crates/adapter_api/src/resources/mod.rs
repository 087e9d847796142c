//! Per-resource API modules.
//!
//! Each module owns the wire records of one REST resource (snake_case JSON,
//! validated with `validator`) and maps them into `targeting_core` types.
//! Codes are translated through the core enums, so an unknown status or
//! damage code is rejected at the boundary instead of reaching a view.
//!
//! List endpoints skip records that fail to decode or validate and log
//! each one; single-record endpoints fail with [`ApiError::Schema`].

pub mod assumptions;
pub mod bda;
pub mod orbat;
pub mod roe;
pub mod search;
pub mod targeting;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;
use validator::Validate;

use crate::error::ApiError;

/// List responses arrive either bare or wrapped in `{"items": [...]}`.
///
/// Items stay as raw JSON so one malformed record cannot fail the list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListEnvelope {
    Bare(Vec<Value>),
    Wrapped { items: Vec<Value> },
}

impl ListEnvelope {
    pub(crate) fn into_items(self) -> Vec<Value> {
        match self {
            ListEnvelope::Bare(items) | ListEnvelope::Wrapped { items } => items,
        }
    }
}

/// Validate a wire record and convert it.
pub(crate) fn validated<R, T>(entity: &'static str, record: R) -> Result<T, ApiError>
where
    R: Validate + TryInto<T, Error = ApiError>,
{
    record
        .validate()
        .map_err(|e| ApiError::schema(entity, e.to_string()))?;
    record.try_into()
}

/// Decode, validate and convert one raw list item.
fn decoded<R, T>(entity: &'static str, raw: Value) -> Result<T, ApiError>
where
    R: DeserializeOwned + Validate + TryInto<T, Error = ApiError>,
{
    let record: R = serde_json::from_value(raw).map_err(|e| ApiError::schema(entity, e.to_string()))?;
    validated(entity, record)
}

/// Convert every valid record, dropping and logging the rest.
pub(crate) fn collect_valid<R, T>(entity: &'static str, raw: Vec<Value>) -> Vec<T>
where
    R: DeserializeOwned + Validate + TryInto<T, Error = ApiError>,
{
    let total = raw.len();
    let items: Vec<T> = raw
        .into_iter()
        .filter_map(|item| match decoded::<R, T>(entity, item) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(entity, error = %e, "Dropping invalid record");
                None
            }
        })
        .collect();
    if items.len() < total {
        warn!(entity, kept = items.len(), total, "Some records failed validation");
    }
    items
}

/// Split a comma-separated or list-valued field.
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
pub(crate) enum StringList {
    #[default]
    Empty,
    List(Vec<String>),
    Joined(String),
}

impl StringList {
    pub(crate) fn into_vec(self) -> Vec<String> {
        match self {
            StringList::Empty => Vec::new(),
            StringList::List(items) => items,
            StringList::Joined(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use targeting::TargetRecord;
    use targeting_core::types::Target;

    fn target(id: &str) -> Value {
        json!({
            "id": id,
            "name": "Radar site",
            "latitude": 34.5,
            "longitude": 69.1,
            "priority": 2,
            "status": "IDENTIFIED",
            "kill_chain_phase": "FIND"
        })
    }

    #[test]
    fn test_envelope_accepts_bare_and_wrapped() {
        let bare: ListEnvelope = serde_json::from_value(json!([target("T-1")])).unwrap();
        let wrapped: ListEnvelope = serde_json::from_value(json!({ "items": [target("T-1")] })).unwrap();
        assert_eq!(bare.into_items().len(), 1);
        assert_eq!(wrapped.into_items().len(), 1);
    }

    #[test]
    fn test_shape_invalid_items_do_not_fail_the_list() {
        let mut overflow = target("T-2");
        overflow["priority"] = json!(300);
        let mut nameless = target("T-3");
        nameless["name"] = Value::Null;
        let raw = vec![target("T-1"), overflow, nameless, json!("not an object"), target("T-4")];

        let envelope: ListEnvelope = serde_json::from_value(json!({ "items": raw })).unwrap();
        let targets = collect_valid::<TargetRecord, Target>("target", envelope.into_items());

        let ids: Vec<&str> = targets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["T-1", "T-4"]);
    }
}
