//! Integration tests for the clinote CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to a test fixture
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

fn clinote() -> Command {
    Command::cargo_bin("clinote").unwrap()
}

#[test]
fn test_process_dense_note() {
    let mut cmd = clinote();
    cmd.arg("process").arg("-i").arg(fixture_path("dense-note.txt"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("hypertension"))
        .stdout(predicate::str::contains("\n- aspirin 81 mg daily\n"))
        .stdout(predicate::str::contains("\n- metoprolol 25 mg BID\n"))
        .stdout(predicate::str::contains("~").not());
}

#[test]
fn test_short_note_passes_through() {
    let mut cmd = clinote();
    cmd.arg("process").arg("-i").arg(fixture_path("short-note.txt"));

    cmd.assert()
        .success()
        .stdout("Plan: follow up in two weeks\n");
}

#[test]
fn test_json_output() {
    let mut cmd = clinote();
    cmd.arg("process")
        .arg("-i")
        .arg(fixture_path("short-note.txt"))
        .arg("-f")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"original\""))
        .stdout(predicate::str::contains("\"formatted\""))
        .stdout(predicate::str::contains("\"metadata\""))
        .stdout(predicate::str::contains("short-note.txt"));
}

#[test]
fn test_markdown_output() {
    let mut cmd = clinote();
    cmd.arg("process")
        .arg("-i")
        .arg(fixture_path("dense-note.txt"))
        .arg("-f")
        .arg("markdown");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("```text"))
        .stdout(predicate::str::contains("*Sections:"))
        .stdout(predicate::str::contains("*Total notes: 1"));
}

#[test]
fn test_config_file_sets_default_format() {
    let mut cmd = clinote();
    cmd.arg("process")
        .arg("-i")
        .arg(fixture_path("short-note.txt"))
        .arg("-c")
        .arg(fixture_path("clinote.toml"));

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value[0]["formatted"], "Plan: follow up in two weeks");
}

#[test]
fn test_legacy_encoding_fallback() {
    let mut cmd = clinote();
    cmd.arg("process").arg("-i").arg(fixture_path("legacy-1252.txt"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("38.2°C"))
        .stdout(predicate::str::contains("- penicillin"))
        .stdout(predicate::str::contains("\r").not());
}

#[test]
fn test_output_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let output_file = temp_dir.path().join("formatted.txt");

    let mut cmd = clinote();
    cmd.arg("process")
        .arg("-i")
        .arg(fixture_path("dense-note.txt"))
        .arg("-o")
        .arg(&output_file);

    cmd.assert().success().stdout(predicate::str::is_empty());

    let content = fs::read_to_string(&output_file).unwrap();
    assert!(content.contains("- atorvastatin 40 mg nightly"));
}

#[test]
fn test_glob_pattern_prints_headers() {
    let mut cmd = clinote();
    cmd.arg("process").arg("-i").arg(fixture_path("*-note.txt"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("==> tests/fixtures/dense-note.txt <=="))
        .stdout(predicate::str::contains("==> tests/fixtures/short-note.txt <=="));
}

#[test]
fn test_invalid_file() {
    let mut cmd = clinote();
    cmd.arg("process").arg("-i").arg("nonexistent.txt");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No files found"));
}

#[test]
fn test_failing_backend_falls_back() {
    let mut cmd = clinote();
    cmd.arg("process")
        .arg("-i")
        .arg(fixture_path("short-note.txt"))
        .arg("--backend-command")
        .arg("clinote-no-such-backend-binary")
        .arg("-f")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"backend\": \"fallback\""))
        .stdout(predicate::str::contains("follow up in two weeks"));
}

#[cfg(unix)]
#[test]
fn test_hung_backend_times_out_and_falls_back() {
    let started = std::time::Instant::now();
    clinote()
        .arg("process")
        .arg("-i")
        .arg(fixture_path("short-note.txt"))
        .arg("--backend-command")
        .arg("sleep 30")
        .arg("--backend-timeout")
        .arg("200")
        .arg("-f")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"backend\": \"fallback\""))
        .stdout(predicate::str::contains("follow up in two weeks"));
    assert!(started.elapsed() < std::time::Duration::from_secs(10));
}

#[test]
fn test_batch_mirrors_tree() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let nested = input.path().join("ward-a");
    fs::create_dir_all(&nested).unwrap();
    fs::copy(fixture_path("dense-note.txt"), nested.join("n1.txt")).unwrap();
    fs::copy(fixture_path("short-note.txt"), input.path().join("n2.txt")).unwrap();

    let mut cmd = clinote();
    cmd.arg("batch")
        .arg(input.path())
        .arg(output.path())
        .arg("-j")
        .arg("2")
        .arg("--strict");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Formatted 2 of 2 notes"));

    let n1 = fs::read_to_string(output.path().join("ward-a/n1.txt")).unwrap();
    assert!(n1.contains("- aspirin 81 mg daily"));
    let n2 = fs::read_to_string(output.path().join("n2.txt")).unwrap();
    assert_eq!(n2, "Plan: follow up in two weeks\n");
}

#[test]
fn test_validate_builtin_export() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = temp_dir.path().join("catalog.toml");

    clinote()
        .arg("export-catalog")
        .arg("-o")
        .arg(&catalog)
        .assert()
        .success();

    clinote()
        .arg("validate")
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("Catalog is valid"))
        .stdout(predicate::str::contains("section-header"));
}

#[test]
fn test_validate_broken_catalog() {
    clinote()
        .arg("validate")
        .arg("--catalog")
        .arg(fixture_path("broken-catalog.toml"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("Catalog is invalid"));
}

#[test]
fn test_list_rules_by_category() {
    clinote()
        .arg("list")
        .arg("rules")
        .arg("--category")
        .arg("word-split-fix")
        .assert()
        .success()
        .stdout(predicate::str::contains("word_split."))
        .stdout(predicate::str::contains("section-header").not());
}

#[test]
fn test_list_sections() {
    clinote()
        .arg("list")
        .arg("sections")
        .assert()
        .success()
        .stdout(predicate::str::contains("physical_exam"))
        .stdout(predicate::str::contains("examination"));
}

#[test]
fn test_help_output() {
    clinote()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("export-catalog"));
}
