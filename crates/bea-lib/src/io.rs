use crate::artifacts::BidsInfo;
use crate::dataset::{Dataset, EventRecord, EventValue};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Load a tab-separated native event table into a `Dataset`. Cells that
/// parse as numbers become numeric values; everything else stays text.
pub fn read_events_tsv(path: &Path) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let headers = reader.headers()?.clone();
    let fields: Vec<String> = headers.iter().map(|header| header.to_string()).collect();
    let mut events = Vec::new();
    for result in reader.records() {
        let record = result.context("reading events record")?;
        let mut row = EventRecord::new();
        for (idx, field) in fields.iter().enumerate() {
            let Some(cell) = record.get(idx) else {
                continue;
            };
            let value = match cell.parse::<f64>() {
                Ok(number) => EventValue::Number(number),
                Err(_) => EventValue::Text(cell.to_string()),
            };
            row.insert(field.clone(), value);
        }
        events.push(row);
    }
    Ok(Dataset::new(fields, events))
}

/// Read a previously exported annotation pair from its JSON sidecar.
pub fn read_bids_info(path: &Path) -> Result<BidsInfo> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Write the full annotation pair as a JSON sidecar.
pub fn write_bids_info(path: &Path, info: &BidsInfo) -> Result<()> {
    let json = serde_json::to_string_pretty(info)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

/// Write the description dictionary alone, in BIDS sidecar key casing.
pub fn write_description_json(path: &Path, info: &BidsInfo) -> Result<()> {
    let json = serde_json::to_string_pretty(&info.descriptions)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

/// Write the field-mapping table as a two-column TSV.
pub fn write_field_map_tsv(path: &Path, info: &BidsInfo) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("writing {}", path.display()))?;
    writer.write_record(["bids_field", "native_field"])?;
    for row in &info.field_map {
        writer.write_record([row.bids_field.as_str(), row.native_field.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_tab_separated_events() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "type\tlatency\tduration").unwrap();
        writeln!(file, "1\t0.5\t0").unwrap();
        writeln!(file, "go trial\t1.5\t0").unwrap();
        let dataset = read_events_tsv(file.path()).unwrap();
        assert_eq!(dataset.fields, vec!["type", "latency", "duration"]);
        assert_eq!(dataset.events.len(), 2);
        assert_eq!(dataset.events[0]["type"], EventValue::Number(1.0));
        assert_eq!(
            dataset.events[1]["type"],
            EventValue::Text("go trial".into())
        );
    }

    #[test]
    fn bids_info_sidecar_round_trips() {
        use crate::artifacts::FieldMapRow;
        use crate::fields::BidsField;

        let mut info = BidsInfo::default();
        info.field_map.push(FieldMapRow {
            bids_field: BidsField::Value,
            native_field: "type".into(),
        });
        let file = tempfile::NamedTempFile::new().unwrap();
        write_bids_info(file.path(), &info).unwrap();
        let back = read_bids_info(file.path()).unwrap();
        assert_eq!(back, info);
    }

    #[test]
    fn field_map_tsv_lists_rows_in_order() {
        use crate::artifacts::FieldMapRow;
        use crate::fields::BidsField;

        let mut info = BidsInfo::default();
        for (field, native) in [
            (BidsField::Onset, "latency in seconds"),
            (BidsField::Value, "type"),
        ] {
            info.field_map.push(FieldMapRow {
                bids_field: field,
                native_field: native.into(),
            });
        }
        let file = tempfile::NamedTempFile::new().unwrap();
        write_field_map_tsv(file.path(), &info).unwrap();
        let text = fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "bids_field\tnative_field");
        assert_eq!(lines[1], "onset\tlatency in seconds");
        assert_eq!(lines[2], "value\ttype");
    }
}
