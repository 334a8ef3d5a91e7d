// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;

fn parse_commands_from_help(text: &str) -> Vec<String> {
    let mut commands = Vec::new();
    let mut in_commands = false;
    for line in text.lines() {
        let trimmed = line.trim_end();
        if trimmed == "Commands:" {
            in_commands = true;
            continue;
        }
        if in_commands {
            if trimmed.is_empty() {
                break;
            }
            let entry = trimmed.trim_start();
            let name = entry.split_whitespace().next().unwrap_or("");
            if !name.is_empty() && name != "help" {
                commands.push(name.to_string());
            }
        }
    }
    commands.sort();
    commands
}

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/solutions.json")
}

fn nbs(db: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_nbs"));
    cmd.env_remove(nbs_core::ENV_NBS_DATABASE_URL)
        .env_remove(nbs_core::ENV_NBS_LOG_LEVEL)
        .arg("--db")
        .arg(format!("sqlite://{}", db.display()));
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout json")
}

fn stderr_error(output: &std::process::Output) -> Value {
    let text = String::from_utf8_lossy(&output.stderr);
    let last = text.lines().rev().find(|l| !l.trim().is_empty()).expect("stderr line");
    serde_json::from_str(last).expect("stderr json")
}

#[test]
fn help_command_surface_is_stable() {
    let output = Command::new(env!("CARGO_BIN_EXE_nbs"))
        .arg("--help")
        .output()
        .expect("run help");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf8 help");
    let expected = include_str!("snapshots/help.commands.txt")
        .lines()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    assert_eq!(parse_commands_from_help(&text), expected);
}

#[test]
fn init_db_reports_schema_version() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("nested").join("nbs.sqlite");
    let output = nbs(&db).arg("init-db").output().expect("run init-db");
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["schema_version"], 1);
    assert!(db.exists());
}

#[test]
fn import_is_idempotent_and_query_filters() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("nbs.sqlite");

    let output = nbs(&db)
        .arg("import")
        .arg(fixture_path())
        .output()
        .expect("run import");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout_json(&output)["created"].as_array().map(Vec::len), Some(2));

    let output = nbs(&db)
        .arg("import")
        .arg(fixture_path())
        .output()
        .expect("run import again");
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["skipped"].as_array().map(Vec::len), Some(2));

    let output = nbs(&db)
        .args(["query", "--bbox", "-73.970,40.780,-73.960,40.786", "--target", "Heat:50"])
        .output()
        .expect("run query");
    assert!(output.status.success());
    let hits = stdout_json(&output);
    assert_eq!(hits.as_array().map(Vec::len), Some(1));
    assert_eq!(hits[0]["name"], "Shade Trees");

    let output = nbs(&db)
        .args(["get", "--name", "Bioswales"])
        .output()
        .expect("run get");
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["location"], "Greenpoint, NYC");
}

#[test]
fn oversized_region_exits_with_validation_code_and_machine_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("nbs.sqlite");
    let output = nbs(&db)
        .args(["--json", "query", "--bbox", "-74.1,40.7,-73.9,40.8"])
        .output()
        .expect("run query");
    assert_eq!(output.status.code(), Some(3));
    let err = stderr_error(&output);
    assert_eq!(err["code"], "region_too_large");

    let output = nbs(&db)
        .args(["query", "--bbox", "-74.1,40.7,-73.9,40.8", "--max-area", "1e9"])
        .output()
        .expect("run query with raised bound");
    assert!(output.status.success());
}

#[test]
fn seed_targets_lists_the_vocabulary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("nbs.sqlite");
    let output = nbs(&db).arg("seed-targets").output().expect("run seed");
    assert!(output.status.success());
    let targets = stdout_json(&output);
    assert_eq!(targets.as_array().map(Vec::len), Some(5));
    assert_eq!(targets[0]["type"], "Pluvial flooding");

    let output = nbs(&db).arg("targets").output().expect("run targets");
    assert_eq!(stdout_json(&output), targets);
}

#[test]
fn missing_solution_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("nbs.sqlite");
    let output = nbs(&db)
        .args(["--json", "get", "7"])
        .output()
        .expect("run get");
    assert_eq!(output.status.code(), Some(3));
    let err = stderr_error(&output);
    assert_eq!(err["code"], "not_found");
}

#[test]
fn openapi_writes_the_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("openapi.json");
    let output = Command::new(env!("CARGO_BIN_EXE_nbs"))
        .arg("openapi")
        .arg("--out")
        .arg(&out)
        .output()
        .expect("run openapi");
    assert!(output.status.success());
    let doc: Value =
        serde_json::from_str(&std::fs::read_to_string(out).expect("read")).expect("json");
    assert!(doc["paths"]["/api/targets/targets"].is_object());
}
