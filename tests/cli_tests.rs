//! CLI-level tests driving the reelcut binary

use assert_cmd::Command;
use predicates::prelude::*;

fn write_config(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("pipeline.yaml");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn plan_prints_segment_plan_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        &dir,
        r#"
operations:
  - kind: sliding_window
    input: talk.mp4
    window_length: 3.0
    slide_step: 2.0
    output_dir: clips
  - kind: trim
    input: talk.mp4
    intervals:
      - ["00:01", "end"]
    output: out.mp4
"#,
    );

    Command::cargo_bin("reelcut")
        .unwrap()
        .args(["plan", "--config"])
        .arg(&config)
        .args(["--engine", "mock", "--assume-duration", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"sliding_window\""))
        .stdout(predicate::str::contains("\"kind\": \"trim\""))
        .stdout(predicate::str::contains("\"media_duration\": 10.0"));
}

#[test]
fn plan_fails_on_invalid_interval() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        &dir,
        r#"
operations:
  - kind: trim
    input: talk.mp4
    intervals:
      - ["01:00", "00:30"]
    output: out.mp4
"#,
    );

    Command::cargo_bin("reelcut")
        .unwrap()
        .args(["plan", "--config"])
        .arg(&config)
        .args(["--engine", "mock", "--assume-duration", "120"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid time range"));
}

#[test]
fn run_fails_on_missing_config() {
    Command::cargo_bin("reelcut")
        .unwrap()
        .args(["run", "--config", "does-not-exist.yaml", "--engine", "mock"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn run_fails_on_unknown_operation_kind() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        &dir,
        r#"
operations:
  - kind: explode
    input: talk.mp4
"#,
    );

    Command::cargo_bin("reelcut")
        .unwrap()
        .args(["run", "--config"])
        .arg(&config)
        .args(["--engine", "mock"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn run_executes_pipeline_against_mock_engine() {
    let dir = tempfile::tempdir().unwrap();
    let srt = dir.path().join("talk.srt");
    std::fs::write(&srt, "1\n00:00:01,000 --> 00:00:02,000\nHi\n").unwrap();
    let out = dir.path().join("fast.srt");

    let config = write_config(
        &dir,
        &format!(
            r#"
operations:
  - kind: retime_subtitles
    input: {}
    factor: 2.0
    output: {}
"#,
            srt.display(),
            out.display()
        ),
    );

    Command::cargo_bin("reelcut")
        .unwrap()
        .args(["run", "--config"])
        .arg(&config)
        .args(["--engine", "mock"])
        .assert()
        .success();

    let result = std::fs::read_to_string(&out).unwrap();
    assert!(result.contains("00:00:00,500 --> 00:00:01,000"));
}
