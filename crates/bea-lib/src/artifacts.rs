use crate::fields::BidsField;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder the annotation UI shows for fields without categorical
/// levels; a levels map holding only this key is treated as empty.
pub const LEVELS_NA_SENTINEL: &str = "n/a";

/// One entry of the description dictionary, keyed the way BIDS sidecar
/// JSON expects. Empty attributes are omitted from the output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDescription {
    #[serde(rename = "LongName", default, skip_serializing_if = "String::is_empty")]
    pub long_name: String,
    #[serde(rename = "Description", default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "Units", default, skip_serializing_if = "String::is_empty")]
    pub units: String,
    #[serde(rename = "Levels", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub levels: BTreeMap<String, String>,
    #[serde(rename = "TermURL", default, skip_serializing_if = "String::is_empty")]
    pub term_url: String,
}

impl FieldDescription {
    pub fn is_empty(&self) -> bool {
        self.long_name.is_empty()
            && self.description.is_empty()
            && self.units.is_empty()
            && self.levels.is_empty()
            && self.term_url.is_empty()
    }
}

/// Returns true when the levels map is the "not applicable" placeholder.
pub fn levels_is_na(levels: &BTreeMap<String, String>) -> bool {
    levels.len() == 1 && levels.contains_key(LEVELS_NA_SENTINEL)
}

/// One row of the field-mapping table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapRow {
    pub bids_field: BidsField,
    pub native_field: String,
}

/// The export pair produced on commit and consumed when resuming editing:
/// a description dictionary plus the ordered field-mapping table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BidsInfo {
    pub descriptions: BTreeMap<BidsField, FieldDescription>,
    pub field_map: Vec<FieldMapRow>,
}
