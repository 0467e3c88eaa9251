use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Command isolated from any per-user config and API settings.
fn cli(temp: &TempDir) -> Command {
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "").expect("write empty config");
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_needs-assessment"));
    cmd.env_remove("NEEDS_API_URL")
        .env_remove("NEEDS_API_TOKEN")
        .env("NEEDS_CONFIG", &config)
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn plan_lists_mandatory_and_general_steps() {
    let temp = TempDir::new().expect("tempdir");
    cli(&temp)
        .arg("plan")
        .arg("--catalog")
        .arg(fixture("catalog.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Informacje ogólne [mandatory]"))
        .stdout(predicate::str::contains("Oświetlenie [optional]"))
        .stdout(predicate::str::contains("Generator [equipment]").not())
        .stdout(predicate::str::contains("selectable:"));
}

#[test]
fn plan_json_includes_selected_equipment_and_accessory() {
    let temp = TempDir::new().expect("tempdir");
    let output = cli(&temp)
        .arg("plan")
        .arg("--catalog")
        .arg(fixture("catalog.json"))
        .args(["--select", "Generator", "--json"])
        .output()
        .expect("run plan");
    assert!(output.status.success());

    let plan: Value = serde_json::from_slice(&output.stdout).expect("plan json");
    let steps = plan["steps"].as_array().expect("steps array");
    let accessory = steps
        .iter()
        .find(|step| step["category"] == "Generator - wyposażenie")
        .expect("accessory step planned");
    assert_eq!(accessory["kind"], "accessory");
    assert_eq!(accessory["base"], "Generator");
    assert!(steps.iter().any(|step| step["category"] == "Generator"));

    let lighting = steps
        .iter()
        .find(|step| step["category"] == "Oświetlenie")
        .expect("general step planned");
    assert_eq!(lighting["questions"].as_array().map(Vec::len), Some(1));
}

#[test]
fn check_accepts_complete_answers() {
    let temp = TempDir::new().expect("tempdir");
    cli(&temp)
        .arg("check")
        .arg("--catalog")
        .arg(fixture("catalog.json"))
        .arg("--answers")
        .arg(fixture("answers.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("ready to submit"));
}

#[test]
fn check_reports_first_blocked_step() {
    let temp = TempDir::new().expect("tempdir");
    cli(&temp)
        .arg("check")
        .arg("--catalog")
        .arg(fixture("catalog.json"))
        .arg("--answers")
        .arg(fixture("incomplete.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Miejsce i termin"));
}

#[test]
fn client_flow_needs_identity_but_staff_does_not() {
    let temp = TempDir::new().expect("tempdir");
    cli(&temp)
        .arg("check")
        .arg("--catalog")
        .arg(fixture("catalog.json"))
        .arg("--answers")
        .arg(fixture("anonymous.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("contact"));

    cli(&temp)
        .arg("check")
        .arg("--catalog")
        .arg(fixture("catalog.json"))
        .arg("--answers")
        .arg(fixture("anonymous.json"))
        .args(["--flow", "staff"])
        .assert()
        .success();
}

#[test]
fn dry_run_prints_flattened_payload() {
    let temp = TempDir::new().expect("tempdir");
    let output = cli(&temp)
        .arg("submit")
        .arg("--catalog")
        .arg(fixture("catalog.json"))
        .arg("--answers")
        .arg(fixture("answers.json"))
        .arg("--dry-run")
        .output()
        .expect("run submit");
    assert!(output.status.success());

    let payload: Value = serde_json::from_slice(&output.stdout).expect("payload json");
    assert_eq!(payload["companyName"], "Budimex");
    assert_eq!(payload["email"], "biuro@budimex.example");
    assert_eq!(payload["responses"]["3"], "100 kVA");
    assert_eq!(payload["responses"]["4"], "true");
    assert_eq!(payload["attachments"], Value::Array(Vec::new()));
    assert!(payload.get("phone").is_none());
}

#[test]
fn config_show_prints_defaults() {
    let temp = TempDir::new().expect("tempdir");
    cli(&temp)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[storage]"))
        .stdout(predicate::str::contains("public_mount = \"/objects/uploads\""));
}

#[test]
fn api_url_override_reaches_config() {
    let temp = TempDir::new().expect("tempdir");
    cli(&temp)
        .args(["--api-url", "https://wynajem.example/", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://wynajem.example/"));
}
