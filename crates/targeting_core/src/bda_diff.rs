//! Field-by-field comparison of two BDA report versions.
//!
//! Which fields are compared, in what order, under what label and with
//! which comparison is described by a [`DiffSchema`]. The comparison routine
//! itself knows nothing about BDA reports; [`DiffSchema::bda_default`] is
//! just the schema the review screen uses.
//!
//! Value semantics:
//! - a missing field and an explicit `null` are the same "no value"
//! - "no value" differs from every present value
//! - present values are compared structurally unless the descriptor
//!   supplies its own comparator
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use targeting_core::bda_diff::{compare_versions, DiffSchema};
//!
//! let old = json!({"physical_damage": "MD", "confidence": 60});
//! let new = json!({"physical_damage": "SD", "confidence": 60});
//! let result = compare_versions(&DiffSchema::bda_default(), &old, &new);
//!
//! assert_eq!(result.changed_fields, 1);
//! let change = result.changes.iter().find(|c| c.changed).unwrap();
//! assert_eq!(change.new_display, "Severe Damage");
//! ```

use serde_json::Value;

use crate::types::{BdaVersion, FunctionalDamage, PhysicalDamage, Recommendation, TargetStatus};

/// Renders a present value for display.
pub type ValueFormatter = fn(&Value) -> String;

/// Decides whether two present values are equal.
pub type ValueComparator = fn(&Value, &Value) -> bool;

/// Display text for "no value".
pub const EMPTY_DISPLAY: &str = "-";

/// One comparable field.
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    /// Field key. Dots address nested objects, e.g. `"weather.ceiling"`.
    pub key: String,
    /// Display label
    pub label: String,
    formatter: Option<ValueFormatter>,
    comparator: Option<ValueComparator>,
}

impl FieldDescriptor {
    /// Create a descriptor using structural equality and default formatting.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            formatter: None,
            comparator: None,
        }
    }

    /// Use a custom formatter.
    pub fn with_formatter(mut self, formatter: ValueFormatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Use a custom comparator.
    pub fn with_comparator(mut self, comparator: ValueComparator) -> Self {
        self.comparator = Some(comparator);
        self
    }

    fn display(&self, value: Option<&Value>) -> String {
        match value {
            None => EMPTY_DISPLAY.to_string(),
            Some(v) => match self.formatter {
                Some(format) => format(v),
                None => format_value(v),
            },
        }
    }

    fn equal(&self, old: Option<&Value>, new: Option<&Value>) -> bool {
        match (old, new) {
            (None, None) => true,
            (Some(a), Some(b)) => match self.comparator {
                Some(compare) => compare(a, b),
                None => a == b,
            },
            _ => false,
        }
    }
}

/// Ordered list of comparable fields.
#[derive(Clone, Debug, Default)]
pub struct DiffSchema {
    fields: Vec<FieldDescriptor>,
}

impl DiffSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Fields in comparison order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// The twelve standard BDA report fields.
    pub fn bda_default() -> Self {
        Self::new()
            .field(
                FieldDescriptor::new("physical_damage", "Physical Damage")
                    .with_formatter(format_physical_damage),
            )
            .field(
                FieldDescriptor::new("functional_damage", "Functional Damage")
                    .with_formatter(format_functional_damage),
            )
            .field(FieldDescriptor::new("confidence", "Confidence").with_formatter(format_percent))
            .field(
                FieldDescriptor::new("recommendation", "Recommendation")
                    .with_formatter(format_recommendation),
            )
            .field(
                FieldDescriptor::new("target_status", "Target Status")
                    .with_formatter(format_target_status),
            )
            .field(FieldDescriptor::new("assessment_type", "Assessment Type"))
            .field(FieldDescriptor::new("collateral_damage", "Collateral Damage"))
            .field(FieldDescriptor::new("secondary_effects", "Secondary Effects"))
            .field(FieldDescriptor::new("estimated_repair_days", "Est. Repair (days)"))
            .field(FieldDescriptor::new("imagery_source", "Imagery Source"))
            .field(FieldDescriptor::new("analyst", "Analyst"))
            .field(FieldDescriptor::new("summary", "Summary").with_comparator(text_equal_ignoring_whitespace))
    }
}

/// Result for one field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldChange {
    /// Field key
    pub field: String,
    /// Display label
    pub label: String,
    /// Value in the older snapshot, `None` when missing or null
    pub old_value: Option<Value>,
    /// Value in the newer snapshot, `None` when missing or null
    pub new_value: Option<Value>,
    /// Formatted older value
    pub old_display: String,
    /// Formatted newer value
    pub new_display: String,
    /// Whether the field differs
    pub changed: bool,
}

/// Result of comparing two snapshots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VersionComparison {
    /// Older version number, when known
    pub old_version: Option<u32>,
    /// Newer version number, when known
    pub new_version: Option<u32>,
    /// One entry per schema field, in schema order
    pub changes: Vec<FieldChange>,
    /// Number of entries with `changed == true`
    pub changed_fields: usize,
}

impl VersionComparison {
    /// Only the fields that differ.
    pub fn changed(&self) -> impl Iterator<Item = &FieldChange> {
        self.changes.iter().filter(|c| c.changed)
    }
}

/// Look up `key` in a snapshot, treating `null` as absent.
fn lookup<'a>(snapshot: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.')
        .try_fold(snapshot, |value, part| value.get(part))
        .filter(|v| !v.is_null())
}

/// Compare two snapshots field by field.
pub fn compare_versions(schema: &DiffSchema, old: &Value, new: &Value) -> VersionComparison {
    let changes: Vec<FieldChange> = schema
        .fields()
        .iter()
        .map(|descriptor| {
            let old_value = lookup(old, &descriptor.key);
            let new_value = lookup(new, &descriptor.key);
            FieldChange {
                field: descriptor.key.clone(),
                label: descriptor.label.clone(),
                old_display: descriptor.display(old_value),
                new_display: descriptor.display(new_value),
                changed: !descriptor.equal(old_value, new_value),
                old_value: old_value.cloned(),
                new_value: new_value.cloned(),
            }
        })
        .collect();

    let changed_fields = changes.iter().filter(|c| c.changed).count();
    VersionComparison {
        old_version: None,
        new_version: None,
        changes,
        changed_fields,
    }
}

/// Compare two history entries with the standard BDA schema.
pub fn compare_bda_versions(old: &BdaVersion, new: &BdaVersion) -> VersionComparison {
    VersionComparison {
        old_version: Some(old.version),
        new_version: Some(new.version),
        ..compare_versions(&DiffSchema::bda_default(), &old.data, &new.data)
    }
}

/// Default rendering of a JSON value.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => EMPTY_DISPLAY.to_string(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

fn format_with_label<T, E>(value: &Value, parse: impl Fn(&str) -> Result<T, E>, label: impl Fn(&T) -> &'static str) -> String {
    match value.as_str().map(&parse) {
        Some(Ok(parsed)) => label(&parsed).to_string(),
        _ => format_value(value),
    }
}

fn format_physical_damage(value: &Value) -> String {
    format_with_label(value, str::parse::<PhysicalDamage>, PhysicalDamage::label)
}

fn format_functional_damage(value: &Value) -> String {
    format_with_label(value, str::parse::<FunctionalDamage>, FunctionalDamage::label)
}

fn format_recommendation(value: &Value) -> String {
    format_with_label(value, str::parse::<Recommendation>, Recommendation::label)
}

fn format_target_status(value: &Value) -> String {
    format_with_label(value, str::parse::<TargetStatus>, TargetStatus::label)
}

fn format_percent(value: &Value) -> String {
    match value.as_f64() {
        Some(n) => format!("{:.0}%", n),
        None => format_value(value),
    }
}

/// Text comparison that ignores leading, trailing and repeated whitespace.
pub fn text_equal_ignoring_whitespace(a: &Value, b: &Value) -> bool {
    match (a.as_str(), b.as_str()) {
        (Some(x), Some(y)) => x.split_whitespace().eq(y.split_whitespace()),
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "physical_damage": "MD",
            "functional_damage": "PFD",
            "confidence": 70,
            "recommendation": "REATTACK",
            "target_status": "ENGAGED",
            "assessment_type": "Phase 1",
            "collateral_damage": false,
            "secondary_effects": ["fire"],
            "estimated_repair_days": 14,
            "imagery_source": "UAS",
            "analyst": "J2 Cell",
            "summary": "Roof partially collapsed."
        })
    }

    #[test]
    fn test_identical_snapshots_have_no_changes() {
        let result = compare_versions(&DiffSchema::bda_default(), &sample(), &sample());
        assert_eq!(result.changed_fields, 0);
        assert_eq!(result.changes.len(), 12);
    }

    #[test]
    fn test_single_field_change_reports_source_values() {
        let old = sample();
        let mut new = sample();
        new["estimated_repair_days"] = json!(30);

        let result = compare_versions(&DiffSchema::bda_default(), &old, &new);
        assert_eq!(result.changed_fields, 1);
        let change = result.changed().next().unwrap();
        assert_eq!(change.field, "estimated_repair_days");
        assert_eq!(change.old_value, Some(json!(14)));
        assert_eq!(change.new_value, Some(json!(30)));
    }

    #[test]
    fn test_null_and_missing_are_equal() {
        let schema = DiffSchema::new().field(FieldDescriptor::new("analyst", "Analyst"));
        let result = compare_versions(&schema, &json!({"analyst": null}), &json!({}));
        assert_eq!(result.changed_fields, 0);
        assert_eq!(result.changes[0].old_display, EMPTY_DISPLAY);
    }

    #[test]
    fn test_null_differs_from_value() {
        let schema = DiffSchema::new().field(FieldDescriptor::new("analyst", "Analyst"));
        let result = compare_versions(&schema, &json!({"analyst": null}), &json!({"analyst": "J2"}));
        assert_eq!(result.changed_fields, 1);
    }

    #[test]
    fn test_equal_arrays_are_not_changed() {
        let schema = DiffSchema::new().field(FieldDescriptor::new("secondary_effects", "Effects"));
        let result = compare_versions(
            &schema,
            &json!({"secondary_effects": ["fire", "smoke"]}),
            &json!({"secondary_effects": ["fire", "smoke"]}),
        );
        assert_eq!(result.changed_fields, 0);
    }

    #[test]
    fn test_fields_outside_schema_are_ignored() {
        let old = sample();
        let mut new = sample();
        new["internal_note"] = json!("not compared");
        assert_eq!(compare_versions(&DiffSchema::bda_default(), &old, &new).changed_fields, 0);
    }

    #[test]
    fn test_nested_key_lookup() {
        let schema = DiffSchema::new().field(FieldDescriptor::new("weather.ceiling", "Ceiling"));
        let result = compare_versions(
            &schema,
            &json!({"weather": {"ceiling": 1200}}),
            &json!({"weather": {"ceiling": 800}}),
        );
        assert_eq!(result.changed_fields, 1);
        assert_eq!(result.changes[0].new_display, "800");
    }

    #[test]
    fn test_summary_ignores_whitespace() {
        let old = sample();
        let mut new = sample();
        new["summary"] = json!("  Roof   partially collapsed. ");
        assert_eq!(compare_versions(&DiffSchema::bda_default(), &old, &new).changed_fields, 0);
    }

    #[test]
    fn test_labels_are_translated() {
        let result = compare_versions(&DiffSchema::bda_default(), &sample(), &sample());
        let physical = &result.changes[0];
        assert_eq!(physical.old_display, "Moderate Damage");
        let confidence = &result.changes[2];
        assert_eq!(confidence.new_display, "70%");
    }

    #[test]
    fn test_unknown_code_falls_back_to_raw_text() {
        let schema = DiffSchema::new().field(
            FieldDescriptor::new("physical_damage", "Physical").with_formatter(format_physical_damage),
        );
        let result = compare_versions(&schema, &json!({"physical_damage": "??"}), &json!({}));
        assert_eq!(result.changes[0].old_display, "??");
    }

    #[test]
    fn test_compare_history_entries_carries_versions() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let v1 = BdaVersion { version: 1, created_at: at, data: sample() };
        let mut data = sample();
        data["physical_damage"] = json!("DES");
        let v2 = BdaVersion { version: 2, created_at: at, data };

        let result = compare_bda_versions(&v1, &v2);
        assert_eq!(result.old_version, Some(1));
        assert_eq!(result.new_version, Some(2));
        assert_eq!(result.changed_fields, 1);
    }
}
