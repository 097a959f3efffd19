use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

const SAMPLE: &str = r#"[
  {"metadata":{"model":"X100","modem_version":"1.0"},
   "context":{"plmn":{"country":"Alpha"},"rat":"LTE"},
   "error":{"error_message":"RLC timeout"}},
  {"metadata":{"model":"X100","modem_version":"1.0"},
   "context":{"plmn":{"country":"Alpha"},"rat":"LTE"},
   "error":{"error_message":"RLC timeout"}},
  {"metadata":{"model":"Y200","modem_version":"2.0"},
   "context":{"plmn":{"country":"Beta"},"rat":"5G"},
   "error":{"error_message":"MAC stall"}}
]"#;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("errdash").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("errdash"));
}

#[test]
fn render_writes_all_charts_offline() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("records.json");
    std::fs::write(&input, SAMPLE).unwrap();
    let out_dir = dir.path().join("charts");

    let mut cmd = Command::cargo_bin("errdash").unwrap();
    cmd.args([
        "render",
        "--input",
        input.to_str().unwrap(),
        "--out-dir",
        out_dir.to_str().unwrap(),
        "--no-fetch",
    ]);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Showing 3 of 3 records"));

    for name in ["correlation.svg", "map.svg", "pie.svg", "wordcloud.svg"] {
        assert!(out_dir.join(name).exists(), "{name} missing");
    }
}

#[test]
fn render_applies_filters_and_saves_subset() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("records.json");
    std::fs::write(&input, SAMPLE).unwrap();
    let out = dir.path().join("subset.json");

    let mut cmd = Command::cargo_bin("errdash").unwrap();
    cmd.args([
        "render",
        "--input",
        input.to_str().unwrap(),
        "--out-dir",
        dir.path().join("charts").to_str().unwrap(),
        "--no-fetch",
        "--country",
        "Alpha",
        "--out",
        out.to_str().unwrap(),
    ]);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Showing 2 of 3 records"))
        .stderr(predicate::str::contains("Saved 2 records"));

    let saved = std::fs::read_to_string(&out).unwrap();
    assert!(saved.contains("Alpha"));
    assert!(!saved.contains("Beta"));
}

#[test]
fn stats_prints_breakdown() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("records.json");
    std::fs::write(&input, SAMPLE).unwrap();

    let mut cmd = Command::cargo_bin("errdash").unwrap();
    cmd.args(["stats", "--input", input.to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("records: 3"))
        .stdout(predicate::str::contains("rat: LTE 2(ea) 66.7%"))
        .stdout(predicate::str::contains("messages: 2 distinct"));
}

#[test]
fn missing_input_fails_cleanly() {
    let mut cmd = Command::cargo_bin("errdash").unwrap();
    cmd.args(["stats", "--input", "/nonexistent/records.json"]);
    cmd.assert().failure();
}
