// crates/slack-function-testgen/tests/cli.rs
// ============================================================================
// Module: CLI Tests
// Description: End-to-end runs of the slack-function-testgen binary.
// Purpose: Ensure generate, check, and types behave against real directories.
// Dependencies: slack-function-testgen, slack-schema-types, tempfile
// ============================================================================

//! Command-line tests for the Slack function test generator.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::fs;
use std::path::Path;
use std::process::Command;
use std::process::Output;

use slack_function_testgen::FunctionCatalog;
use slack_function_testgen::generate;
use slack_schema_types::OAUTH_TYPE;

const CATALOG: &str = r#"[
  {
    "callback_id": "add_pin",
    "input_parameters": [
      {"name": "channel_id", "type": "slack#/types/channel_id", "is_required": true},
      {"name": "message", "type": "string", "is_required": false}
    ]
  },
  {
    "callback_id": "create_channel",
    "input_parameters": [{"name": "channel_name", "type": "string", "is_required": true}],
    "output_parameters": [{"name": "channel_id", "type": "slack#/types/channel_id"}]
  }
]"#;

fn run(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_slack-function-testgen"))
        .args(args)
        .current_dir(cwd)
        .env_remove("SLACK_TESTGEN_CONFIG")
        .output()
        .unwrap()
}

fn with_inputs(command: &str) -> Vec<&str> {
    vec![command, "--functions", "functions.json", "--out-dir", "out"]
}

fn write_catalog(dir: &Path) {
    fs::write(dir.join("functions.json"), CATALOG).unwrap();
}

#[test]
fn generate_writes_one_file_per_record() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());

    let output = run(&["generate", "--functions", "functions.json", "--out-dir", "out"], dir.path());
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let catalog = FunctionCatalog::from_json(CATALOG).unwrap();
    for record in catalog.records() {
        let written = fs::read_to_string(dir.path().join("out").join(record.test_file_name())).unwrap();
        assert_eq!(written, generate(record).unwrap());
    }
    let leftovers: Vec<_> = fs::read_dir(dir.path().join("out"))
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn check_reports_drift_and_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let generated = run(&with_inputs("generate"), dir.path());
    assert!(generated.status.success());
    let clean = run(&with_inputs("check"), dir.path());
    assert!(clean.status.success(), "{}", String::from_utf8_lossy(&clean.stderr));

    fs::write(dir.path().join("out/add_pin_test.ts"), "// edited").unwrap();
    fs::remove_file(dir.path().join("out/create_channel_test.ts")).unwrap();
    let drifted = run(&with_inputs("check"), dir.path());
    assert!(!drifted.status.success());
    let stderr = String::from_utf8_lossy(&drifted.stderr);
    assert!(stderr.contains("output drift: 2 stale or missing"), "{stderr}");
    assert!(stderr.contains("add_pin_test.ts"), "{stderr}");
    assert!(stderr.contains("create_channel_test.ts"), "{stderr}");
}

#[test]
fn config_and_audit_log_are_honored() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    fs::write(dir.path().join("slack-testgen.toml"), "[generator]\ntest_runner = \"it\"\n").unwrap();

    let output = run(
        &["generate", "--functions", "functions.json", "--out-dir", "out", "--audit-log", "audit.jsonl"],
        dir.path(),
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let source = fs::read_to_string(dir.path().join("out/add_pin_test.ts")).unwrap();
    assert!(source.contains("\nit(\"AddPin generates valid FunctionManifest\""));

    let audit = fs::read_to_string(dir.path().join("audit.jsonl")).unwrap();
    let events: Vec<serde_json::Value> =
        audit.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    let renders = events.iter().filter(|event| event["event"] == "testgen_render").count();
    let writes = events.iter().filter(|event| event["event"] == "testgen_output").count();
    assert_eq!(renders, 2);
    assert_eq!(writes, 2);
}

#[test]
fn invalid_config_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    fs::write(dir.path().join("bad.toml"), "[generator]\ntest_runner = \"not a runner\"\n").unwrap();

    let output = run(
        &["generate", "--functions", "functions.json", "--out-dir", "out", "--config", "bad.toml"],
        dir.path(),
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("config error"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn malformed_record_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("functions.json"), r#"[{"callback_id": "bad-id"}]"#).unwrap();

    let output = run(&["generate", "--functions", "functions.json", "--out-dir", "out"], dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("malformed record"));
}

#[test]
fn malformed_record_later_in_catalog_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("functions.json"),
        r#"[{"callback_id": "add_pin"}, {"callback_id": "bad-id"}]"#,
    )
    .unwrap();

    let output = run(&with_inputs("generate"), dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("bad-id"));
    assert!(!dir.path().join("out/add_pin_test.ts").exists());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn types_writes_custom_type_modules() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&["types", "--out-dir", "custom"], dir.path());
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let written = fs::read_to_string(dir.path().join("custom").join(OAUTH_TYPE.module_file_name())).unwrap();
    assert_eq!(written, OAUTH_TYPE.render_typescript().unwrap());
}
