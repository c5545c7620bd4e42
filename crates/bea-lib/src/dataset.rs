use crate::artifacts::BidsInfo;
use crate::error::AnnotationError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One cell of a native event table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventValue {
    Number(f64),
    Text(String),
}

impl EventValue {
    /// Canonical string form used when comparing values across records.
    /// Whole numbers print without a fractional part, so `1.0` and `1`
    /// collapse to the same level key.
    pub fn canonical(&self) -> String {
        match self {
            EventValue::Number(n) if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            EventValue::Number(n) => n.to_string(),
            EventValue::Text(s) => s.clone(),
        }
    }
}

pub type EventRecord = HashMap<String, EventValue>;

/// A loaded recording: its native event schema, the event records, and the
/// annotation state the commit step maintains on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Ordered native event-field names.
    pub fields: Vec<String>,
    pub events: Vec<EventRecord>,
    /// Prior annotation pair attached by an earlier commit, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bids_info: Option<BidsInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<String>,
    #[serde(default = "default_saved")]
    pub saved: bool,
}

fn default_saved() -> bool {
    true
}

impl Dataset {
    pub fn new(fields: Vec<String>, events: Vec<EventRecord>) -> Self {
        Self {
            fields,
            events,
            bids_info: None,
            history: Vec::new(),
            saved: true,
        }
    }
}

fn dedup_preserving_order(fields: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(fields.len());
    for field in fields {
        if !out.contains(field) {
            out.push(field.clone());
        }
    }
    out
}

/// Reconcile the native schemas of several datasets. Disagreement is
/// recovered locally: warn and keep the schema with the most fields.
pub fn resolve_schema(datasets: &[Dataset]) -> Vec<String> {
    let mut schema: Vec<String> = Vec::new();
    let mut mismatch = false;
    for dataset in datasets {
        let fields = dedup_preserving_order(&dataset.fields);
        if schema.is_empty() {
            schema = fields;
        } else if fields != schema {
            mismatch = true;
            if fields.len() > schema.len() {
                schema = fields;
            }
        }
    }
    if mismatch {
        log::warn!(
            "{}; keeping the schema with the most fields",
            AnnotationError::InconsistentSchema
        );
    }
    schema
}

/// Pick the prior annotation pair to resume from. When only some datasets
/// carry one, report the discrepancy and use the first carrier.
pub fn resolve_prior_info(datasets: &[Dataset]) -> Option<&BidsInfo> {
    let carriers: Vec<&BidsInfo> = datasets
        .iter()
        .filter_map(|dataset| dataset.bids_info.as_ref())
        .collect();
    if !carriers.is_empty() && carriers.len() < datasets.len() {
        log::warn!(
            "only {} of {} datasets carry prior BIDS event info; using the first",
            carriers.len(),
            datasets.len()
        );
    }
    carriers.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset_with_fields(fields: &[&str]) -> Dataset {
        Dataset::new(fields.iter().map(|f| f.to_string()).collect(), Vec::new())
    }

    #[test]
    fn canonical_collapses_whole_numbers() {
        assert_eq!(EventValue::Number(1.0).canonical(), "1");
        assert_eq!(EventValue::Number(2.5).canonical(), "2.5");
        assert_eq!(EventValue::Text("go".into()).canonical(), "go");
    }

    #[test]
    fn richest_schema_wins_on_disagreement() {
        let a = dataset_with_fields(&["type", "latency"]);
        let b = dataset_with_fields(&["type", "latency", "duration"]);
        let schema = resolve_schema(&[a, b]);
        assert_eq!(schema, vec!["type", "latency", "duration"]);
    }

    #[test]
    fn schema_is_deduplicated() {
        let a = dataset_with_fields(&["type", "latency", "type"]);
        assert_eq!(resolve_schema(&[a]), vec!["type", "latency"]);
    }

    #[test]
    fn first_prior_info_carrier_wins() {
        let mut a = dataset_with_fields(&["type"]);
        let b = dataset_with_fields(&["type"]);
        let mut info = BidsInfo::default();
        info.field_map.push(crate::artifacts::FieldMapRow {
            bids_field: crate::fields::BidsField::Value,
            native_field: "type".into(),
        });
        a.bids_info = Some(info.clone());
        let datasets = [a, b];
        assert_eq!(resolve_prior_info(&datasets), Some(&info));
    }
}
