//! End-to-end tests driving the `jsonbyket` binary

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const RULES: &str = r#"{
    "rules": {
        "name": {"t": "string", "r": true},
        "port": {"t": "number", "int": true, "min": 1, "max": 65535},
        "timeout": {"t": "time", "unit": "s"}
    }
}"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn jsonbyket(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jsonbyket"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("JSONBYKET_CONFIG")
        .env_remove("JSONBYKET_LOG_FORMAT")
        .output()
        .unwrap()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_convert_prints_json() {
    let dir = TempDir::new().unwrap();
    let data = write(&dir, "data.json", r#"{"name": "api", "port": "8080", "timeout": "2min"}"#);
    let rules = write(&dir, "rules.json", RULES);

    let output = jsonbyket(&["convert", path_str(&data), "-r", path_str(&rules), "-o", "json"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value, json!({"name": "api", "port": 8080, "timeout": 120.0}));
}

#[test]
fn test_convert_accepts_yaml_and_saves_to_file() {
    let dir = TempDir::new().unwrap();
    let data = write(&dir, "data.yaml", "name: api\nport: 70000\n");
    let rules = write(&dir, "rules.json", RULES);
    let saved = dir.path().join("out.json");

    let output = jsonbyket(&[
        "convert",
        path_str(&data),
        "--rules",
        path_str(&rules),
        "--save-to",
        path_str(&saved),
        "--quiet",
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let value: Value = serde_json::from_str(&fs::read_to_string(&saved).unwrap()).unwrap();
    assert_eq!(value["port"], json!(65535));
    assert_eq!(value["timeout"], json!(0.0));
}

#[test]
fn test_missing_required_property_exits_with_fatal_code() {
    let dir = TempDir::new().unwrap();
    let data = write(&dir, "data.json", r#"{"port": 80}"#);
    let rules = write(&dir, "rules.json", RULES);

    let output = jsonbyket(&["convert", path_str(&data), "-r", path_str(&rules)]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("name"), "{}", stderr);
}

#[test]
fn test_traceback_routes_failure_through_cli_error() {
    let dir = TempDir::new().unwrap();
    let data = write(&dir, "data.json", r#"{"port": 80}"#);
    let rules = write(&dir, "rules.json", RULES);

    let output = jsonbyket(&[
        "--no-color",
        "convert",
        path_str(&data),
        "-r",
        path_str(&rules),
        "--traceback",
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error: "));
}

#[test]
fn test_check_reports_success_and_failure() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "good.json", r#"{"name": "api"}"#);
    let bad = write(&dir, "bad.json", r#"{"name": "api", "port": "eighty"}"#);
    let rules = write(&dir, "rules.json", RULES);

    let ok = jsonbyket(&["check", path_str(&good), "-r", path_str(&rules), "-o", "json"]);
    assert!(ok.status.success(), "{}", String::from_utf8_lossy(&ok.stderr));
    let report: Value = serde_json::from_slice(&ok.stdout).unwrap();
    assert_eq!(report["warnings"], json!([]));

    let failed = jsonbyket(&["check", path_str(&bad), "-r", path_str(&rules)]);
    assert_eq!(failed.status.code(), Some(2));
}

#[test]
fn test_unknown_data_type_is_a_schema_error() {
    let dir = TempDir::new().unwrap();
    let data = write(&dir, "data.json", r#"{"name": "api"}"#);
    let rules = write(&dir, "rules.json", r#"{"rules": {"name": {"t": "colour"}}}"#);

    let output = jsonbyket(&["convert", path_str(&data), "-r", path_str(&rules)]);

    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_missing_data_file() {
    let dir = TempDir::new().unwrap();
    let rules = write(&dir, "rules.json", RULES);
    let missing = dir.path().join("missing.json");

    let output = jsonbyket(&["convert", path_str(&missing), "-r", path_str(&rules)]);

    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_types_lists_registries() {
    let output = jsonbyket(&["types", "-o", "json"]);

    assert!(output.status.success());
    let registries: Value = serde_json::from_slice(&output.stdout).unwrap();
    let data_types = registries["dataTypes"].as_array().unwrap();
    assert!(data_types.contains(&json!("keyvaluepair")));
    assert_eq!(registries["varTypes"], json!(["env", "rand"]));
    assert!(registries["transforms"].as_array().unwrap().contains(&json!("trim")));
}

#[test]
fn test_config_file_globals_apply() {
    let dir = TempDir::new().unwrap();
    let data = write(&dir, "data.json", r#"{"name": "api"}"#);
    let rules = write(&dir, "rules.json", RULES);
    let config = write(&dir, "config.yaml", "globals:\n  removeHidden: false\n");

    let output = jsonbyket(&[
        "--config",
        path_str(&config),
        "convert",
        path_str(&data),
        "-r",
        path_str(&rules),
        "-o",
        "json",
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["_uid"], json!("ROOT"));
}
