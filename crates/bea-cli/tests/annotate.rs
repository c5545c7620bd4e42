use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::{error::Error, fs, path::PathBuf};

#[test]
fn inspect_reports_builtin_defaults() -> Result<(), Box<dyn Error>> {
    let events = sample_path("test_data/sample_events.tsv");

    let mut cmd = cargo_bin_cmd!("bea");
    cmd.args(["inspect", &events]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let registry: Value = serde_json::from_slice(&output)?;

    assert_eq!(registry["value"]["native_field"], "type");
    assert_eq!(registry["onset"]["native_field"], "latency in seconds");
    assert_eq!(registry["sample"]["native_field"], "latency in samples");
    assert_eq!(registry["duration"]["native_field"], "duration");
    assert_eq!(registry["HED"]["native_field"], "usertags");
    assert_eq!(registry["trial_type"]["native_field"], "");
    assert_eq!(registry["stim_file"]["native_field"], "");
    assert_eq!(registry["response_time"]["native_field"], "");
    Ok(())
}

#[test]
fn inspect_resumes_from_prior_sidecar() -> Result<(), Box<dyn Error>> {
    let events = sample_path("test_data/sample_events.tsv");
    let prior = sample_path("test_data/prior_bids_info.json");

    let mut cmd = cargo_bin_cmd!("bea");
    cmd.args(["inspect", &events, "--prior", &prior]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let registry: Value = serde_json::from_slice(&output)?;

    assert_eq!(registry["trial_type"]["native_field"], "condition");
    assert_eq!(registry["trial_type"]["levels"]["x1"], "square stimulus");
    assert_eq!(registry["value"]["long_name"], "Event marker");
    // fields absent from the prior pair are back-filled default-empty
    assert_eq!(registry["onset"]["native_field"], "");
    Ok(())
}

#[test]
fn levels_lists_distinct_values_in_first_seen_order() -> Result<(), Box<dyn Error>> {
    let events = sample_path("test_data/sample_events.tsv");

    let mut cmd = cargo_bin_cmd!("bea");
    cmd.args(["levels", &events, "--field", "type"]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let values: Vec<String> = serde_json::from_slice(&output)?;

    assert_eq!(values, vec!["1", "2", "square"]);
    Ok(())
}

#[test]
fn levels_warns_above_the_display_threshold() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let events = dir.path().join("many_events.tsv");
    let mut table = String::from("type\tlatency\n");
    for i in 0..25 {
        table.push_str(&format!("cond{i}\t{i}.5\n"));
    }
    fs::write(&events, table)?;

    let mut cmd = cargo_bin_cmd!("bea");
    cmd.env("RUST_LOG", "warn");
    cmd.args(["levels", events.to_str().expect("utf8 path"), "--field", "type"]);
    let output = cmd.assert().success().get_output().clone();

    let values: Vec<String> = serde_json::from_slice(&output.stdout)?;
    assert_eq!(values.len(), 25);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("25 distinct values"),
        "expected threshold warning on stderr, got: {stderr}"
    );
    Ok(())
}

#[test]
fn levels_stays_quiet_below_the_display_threshold() -> Result<(), Box<dyn Error>> {
    let events = sample_path("test_data/sample_events.tsv");

    let mut cmd = cargo_bin_cmd!("bea");
    cmd.env("RUST_LOG", "warn");
    cmd.args(["levels", &events, "--field", "type"]);
    let output = cmd.assert().success().get_output().clone();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("distinct values"),
        "no warning expected for a small value set, got: {stderr}"
    );
    Ok(())
}

#[test]
fn levels_fails_for_a_missing_field() -> Result<(), Box<dyn Error>> {
    let events = sample_path("test_data/sample_events.tsv");

    let mut cmd = cargo_bin_cmd!("bea");
    cmd.args(["levels", &events, "--field", "condition"]);
    cmd.assert().failure();
    Ok(())
}

#[test]
fn export_writes_both_artifacts() -> Result<(), Box<dyn Error>> {
    let events = sample_path("test_data/sample_events.tsv");
    let dir = tempfile::tempdir()?;
    let out_desc = dir.path().join("events.json");
    let out_map = dir.path().join("field_map.tsv");

    let mut cmd = cargo_bin_cmd!("bea");
    cmd.args([
        "export",
        &events,
        "--map",
        "trial_type=condition",
        "--out-desc",
        out_desc.to_str().expect("utf8 path"),
        "--out-map",
        out_map.to_str().expect("utf8 path"),
    ]);
    cmd.assert().success();

    let map_text = fs::read_to_string(&out_map)?;
    assert!(map_text.lines().any(|line| line == "trial_type\tcondition"));
    assert!(map_text.lines().any(|line| line == "value\ttype"));

    let descriptions: Value = serde_json::from_str(&fs::read_to_string(&out_desc)?)?;
    assert_eq!(
        descriptions["value"]["Description"],
        "Marker value associated with the event"
    );
    // unmapped fields never reach the artifacts
    assert!(descriptions.get("stim_file").is_none());
    Ok(())
}

#[test]
fn export_rejects_duplicate_native_fields() -> Result<(), Box<dyn Error>> {
    let events = sample_path("test_data/sample_events.tsv");
    let dir = tempfile::tempdir()?;
    let out_desc = dir.path().join("events.json");
    let out_map = dir.path().join("field_map.tsv");

    let mut cmd = cargo_bin_cmd!("bea");
    cmd.args([
        "export",
        &events,
        "--map",
        "trial_type=type",
        "--out-desc",
        out_desc.to_str().expect("utf8 path"),
        "--out-map",
        out_map.to_str().expect("utf8 path"),
    ]);
    cmd.assert().failure();
    Ok(())
}

fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .expect("crates dir")
        .parent()
        .expect("workspace root")
        .to_path_buf()
}

fn sample_path(relative: &str) -> String {
    workspace_root()
        .join(relative)
        .to_string_lossy()
        .to_string()
}
