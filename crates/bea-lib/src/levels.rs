use crate::dataset::Dataset;
use crate::error::{AnnotationError, Result};
use std::collections::HashSet;

/// Distinct-value count above which callers should warn before offering
/// per-value level editing.
pub const LEVEL_WARN_THRESHOLD: usize = 20;

/// Canonical key for a categorical value. Finite numeric values get a
/// fixed `x` prefix so the key cannot collide with identifier syntax;
/// anything else has its spaces replaced with underscores. No trimming is
/// applied, so `"12 "` stays textual and becomes `"12_"`. Spellings like
/// `"nan"` or `"inf"` parse as floats but are not numbers in an event
/// table, so they stay textual too.
pub fn canonical_level_key(raw: &str) -> String {
    let is_numeric = raw.parse::<f64>().map_or(false, |n| n.is_finite());
    if is_numeric {
        format!("x{raw}")
    } else {
        raw.replace(' ', "_")
    }
}

/// Distinct values of one native field across all datasets, in first-seen
/// order. The field must exist on every dataset's event records.
pub fn collect_unique_values(datasets: &[Dataset], native_field: &str) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for dataset in datasets {
        if !dataset.fields.iter().any(|field| field == native_field) {
            return Err(AnnotationError::MissingField(native_field.to_string()));
        }
        for record in &dataset.events {
            let value = record
                .get(native_field)
                .ok_or_else(|| AnnotationError::MissingField(native_field.to_string()))?;
            let canonical = value.canonical();
            if seen.insert(canonical.clone()) {
                out.push(canonical);
            }
        }
    }
    Ok(out)
}
