use crate::artifacts::{levels_is_na, BidsInfo, FieldDescription, FieldMapRow};
use crate::dataset::Dataset;
use crate::error::{AnnotationError, Result};
use crate::fields::BidsField;
use crate::levels::canonical_level_key;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// History line appended to a dataset when a registry is committed to it.
pub const HISTORY_COMMAND: &str = "[dataset, descDict, mapTable] = editEventInfo(dataset)";

/// Synthetic native names for the two fields derived from event latency.
pub const ONSET_NATIVE: &str = "latency in seconds";
pub const SAMPLE_NATIVE: &str = "latency in samples";

const DURATION_DESCRIPTION: &str = "Duration of the event (measured from onset) in seconds";
const SAMPLE_DESCRIPTION: &str = "Onset of the event according to the sampling scheme";
const TRIAL_TYPE_DESCRIPTION: &str =
    "Primary categorisation of each trial to identify them as instances of the experimental conditions";

/// Annotation state of one BIDS field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldAnnotation {
    /// Corresponding column of the native event table; empty when unmapped.
    pub native_field: String,
    pub long_name: String,
    pub description: String,
    pub units: String,
    pub term_url: String,
    /// Canonical categorical value -> free-text description.
    pub levels: BTreeMap<String, String>,
}

impl FieldAnnotation {
    pub fn is_mapped(&self) -> bool {
        !self.native_field.is_empty()
    }

    fn from_description(native_field: &str, desc: Option<&FieldDescription>) -> Self {
        let desc = desc.cloned().unwrap_or_default();
        Self {
            native_field: native_field.to_string(),
            long_name: desc.long_name,
            description: desc.description,
            units: desc.units,
            term_url: desc.term_url,
            levels: desc.levels,
        }
    }
}

/// Attribute selector for free-text edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAttr {
    LongName,
    Description,
    TermUrl,
}

/// Event Metadata Registry: exactly one `FieldAnnotation` per BIDS field,
/// mutated in place by the editing session and converted to the export
/// pair on commit. Native fields are one-to-one with BIDS fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Registry {
    entries: BTreeMap<BidsField, FieldAnnotation>,
}

impl<'de> Deserialize<'de> for Registry {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // back-fill so deserialized registries keep the every-field invariant
        let mut entries = BTreeMap::<BidsField, FieldAnnotation>::deserialize(deserializer)?;
        for field in BidsField::ALL {
            entries.entry(field).or_default();
        }
        Ok(Registry { entries })
    }
}

impl Registry {
    /// Build a registry from the native schema, resuming from a prior
    /// annotation pair when one is given. Fields the prior pair does not
    /// cover start out default-empty; without prior info the built-in
    /// defaults apply (HED maps to `usertags` only when the schema has it).
    pub fn initialize(schema: &[String], prior: Option<&BidsInfo>) -> Registry {
        let mut entries = BTreeMap::new();
        match prior {
            Some(info) => {
                for row in &info.field_map {
                    let desc = info.descriptions.get(&row.bids_field);
                    entries.insert(
                        row.bids_field,
                        FieldAnnotation::from_description(&row.native_field, desc),
                    );
                }
                for field in BidsField::ALL {
                    entries.entry(field).or_default();
                }
            }
            None => {
                for field in BidsField::ALL {
                    entries.insert(field, default_annotation(field, schema));
                }
            }
        }
        Registry { entries }
    }

    pub fn get(&self, field: BidsField) -> &FieldAnnotation {
        // initialize() puts every BIDS field in the map
        self.entries
            .get(&field)
            .expect("registry holds every BIDS field")
    }

    fn entry_mut(&mut self, field: BidsField) -> &mut FieldAnnotation {
        self.entries.entry(field).or_default()
    }

    /// Map a BIDS field onto a native event field. A non-empty native
    /// field already used by a different entry is rejected and the
    /// registry is left untouched.
    pub fn set_native_mapping(&mut self, field: BidsField, native_field: &str) -> Result<()> {
        if !native_field.is_empty() {
            if let Some((&other, _)) = self
                .entries
                .iter()
                .find(|(f, entry)| **f != field && entry.native_field == native_field)
            {
                return Err(AnnotationError::DuplicateMapping {
                    native: native_field.to_string(),
                    mapped_to: other,
                });
            }
        }
        self.entry_mut(field).native_field = native_field.to_string();
        Ok(())
    }

    /// Edit one of the free-text attributes. Requires the field to be
    /// mapped first.
    pub fn set_text(&mut self, field: BidsField, attr: TextAttr, value: &str) -> Result<()> {
        let entry = self.entry_mut(field);
        if !entry.is_mapped() {
            return Err(AnnotationError::UnmappedField(field));
        }
        match attr {
            TextAttr::LongName => entry.long_name = value.to_string(),
            TextAttr::Description => entry.description = value.to_string(),
            TextAttr::TermUrl => entry.term_url = value.to_string(),
        }
        Ok(())
    }

    /// Store the concatenation of a unit prefix and unit name; either part
    /// may be empty. Requires the field to be mapped first.
    pub fn set_units(&mut self, field: BidsField, prefix: &str, name: &str) -> Result<()> {
        let entry = self.entry_mut(field);
        if !entry.is_mapped() {
            return Err(AnnotationError::UnmappedField(field));
        }
        entry.units = format!("{prefix}{name}");
        Ok(())
    }

    /// Insert or overwrite the description of one categorical level. The
    /// raw value is canonicalized first. Refused for continuous fields and
    /// HED, which never mutate their (empty) levels map.
    pub fn set_level_description(
        &mut self,
        field: BidsField,
        raw_value: &str,
        description: &str,
    ) -> Result<()> {
        if !field.supports_levels() {
            return Err(AnnotationError::UnsupportedLevelEdit(field));
        }
        let key = canonical_level_key(raw_value);
        self.entry_mut(field).levels.insert(key, description.to_string());
        Ok(())
    }

    /// Comma-joined canonical level keys, for "levels specified so far"
    /// displays.
    pub fn levels_summary(&self, field: BidsField) -> String {
        self.get(field)
            .levels
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Convert the registry into the export pair. Only mapped fields are
    /// emitted, in stable field order; empty attributes and placeholder
    /// levels are omitted. The fixed duration/sample/trial_type texts are
    /// filled in only where the user left the description empty.
    pub fn to_export_artifacts(&self) -> BidsInfo {
        let mut info = BidsInfo::default();
        for field in BidsField::ALL {
            let entry = self.get(field);
            if !entry.is_mapped() {
                continue;
            }
            info.field_map.push(FieldMapRow {
                bids_field: field,
                native_field: entry.native_field.clone(),
            });
            let mut desc = FieldDescription {
                long_name: entry.long_name.clone(),
                description: entry.description.clone(),
                units: entry.units.clone(),
                levels: entry.levels.clone(),
                term_url: entry.term_url.clone(),
            };
            if levels_is_na(&desc.levels) {
                desc.levels.clear();
            }
            if desc.description.is_empty() {
                if let Some(text) = fixed_description(field) {
                    desc.description = text.to_string();
                }
            }
            info.descriptions.insert(field, desc);
        }
        info
    }

    /// Apply the registry to a dataset: attach the export pair, mark the
    /// dataset unsaved, and record the reconstruction command.
    pub fn commit(&self, dataset: &mut Dataset) -> BidsInfo {
        let info = self.to_export_artifacts();
        dataset.bids_info = Some(info.clone());
        dataset.saved = false;
        dataset.history.push(HISTORY_COMMAND.to_string());
        info
    }
}

fn fixed_description(field: BidsField) -> Option<&'static str> {
    match field {
        BidsField::Duration => Some(DURATION_DESCRIPTION),
        BidsField::Sample => Some(SAMPLE_DESCRIPTION),
        BidsField::TrialType => Some(TRIAL_TYPE_DESCRIPTION),
        _ => None,
    }
}

fn default_annotation(field: BidsField, schema: &[String]) -> FieldAnnotation {
    match field {
        BidsField::Onset => FieldAnnotation {
            native_field: ONSET_NATIVE.to_string(),
            long_name: "Event onset".to_string(),
            description: "Onset of the event in seconds".to_string(),
            units: "second".to_string(),
            ..Default::default()
        },
        BidsField::Sample => FieldAnnotation {
            native_field: SAMPLE_NATIVE.to_string(),
            long_name: "Event sample".to_string(),
            description: SAMPLE_DESCRIPTION.to_string(),
            units: "sample".to_string(),
            ..Default::default()
        },
        BidsField::Duration => FieldAnnotation {
            native_field: "duration".to_string(),
            long_name: "Event duration".to_string(),
            description: DURATION_DESCRIPTION.to_string(),
            units: "second".to_string(),
            ..Default::default()
        },
        BidsField::Value => FieldAnnotation {
            native_field: "type".to_string(),
            long_name: "Event marker".to_string(),
            description: "Marker value associated with the event".to_string(),
            ..Default::default()
        },
        BidsField::Hed => {
            let native = if schema.iter().any(|f| f == "usertags") {
                "usertags"
            } else {
                ""
            };
            FieldAnnotation {
                native_field: native.to_string(),
                ..Default::default()
            }
        }
        BidsField::TrialType | BidsField::StimFile | BidsField::ResponseTime => {
            FieldAnnotation::default()
        }
    }
}
