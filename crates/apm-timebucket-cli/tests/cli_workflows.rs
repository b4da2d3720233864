//! Integration tests for the `apmtb` binary.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("apmtb"));
    cmd.env_remove("APMTB_STEP");
    cmd
}

#[test]
fn convert_prints_month_and_second_buckets() {
    cli()
        .args([
            "convert", "--start", "2017-01", "--end", "2017-02", "--step", "month",
        ])
        .assert()
        .success()
        .stdout(contains("month buckets: 201701 .. 201702"))
        .stdout(contains("second buckets: 20170100000000 .. 20170299999999"));
}

#[test]
fn convert_single_hour_spans_whole_hour() {
    cli()
        .args([
            "convert",
            "--start",
            "2017-01-01 01",
            "--end",
            "2017-01-01 01",
            "--step",
            "HOUR",
        ])
        .assert()
        .success()
        .stdout(contains("second buckets: 20170101010000 .. 20170101019999"));
}

#[test]
fn convert_json_output_is_machine_readable() -> TestResult {
    let output = cli()
        .args([
            "convert",
            "--start",
            "2017-01-01 0101",
            "--end",
            "2017-01-01 0101",
            "--step",
            "minute",
            "--format",
            "json",
        ])
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["start_second_bucket"], 20170101010100_i64);
    assert_eq!(value["end_second_bucket"], 20170101010199_i64);
    assert_eq!(value["duration"]["step"], "MINUTE");
    Ok(())
}

#[test]
fn step_falls_back_to_environment() {
    cli()
        .env("APMTB_STEP", "day")
        .args(["convert", "--start", "2017-01-01", "--end", "2017-01-01"])
        .assert()
        .success()
        .stdout(contains("second buckets: 20170101000000 .. 20170101999999"));
}

#[test]
fn missing_step_is_an_error() {
    cli()
        .args(["convert", "--start", "2017-01", "--end", "2017-01"])
        .assert()
        .failure()
        .stderr(contains("No step given"));
}

#[test]
fn malformed_boundary_fails_with_format_error() {
    cli()
        .args([
            "convert", "--start", "2017-13", "--end", "2017-13", "--step", "month",
        ])
        .assert()
        .failure()
        .stderr(contains("month out of range"));
}

#[test]
fn inverted_range_is_rejected() {
    cli()
        .args([
            "convert", "--start", "2017-03", "--end", "2017-01", "--step", "month",
        ])
        .assert()
        .failure()
        .stderr(contains("is after end bucket"));
}

#[test]
fn convert_reads_duration_file() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("duration.json");
    std::fs::write(
        &path,
        r#"{"start": "2017-01", "end": "2017-03", "step": "MONTH"}"#,
    )?;

    cli()
        .args(["convert", "--duration", path.to_string_lossy().as_ref()])
        .assert()
        .success()
        .stdout(contains("month buckets: 201701 .. 201703"))
        .stdout(contains("second buckets: 20170100000000 .. 20170399999999"));
    Ok(())
}

#[test]
fn invalid_duration_file_is_reported() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("duration.json");
    std::fs::write(&path, r#"{"start": "2017-01", "step": "WEEK"}"#)?;

    cli()
        .args(["convert", "--duration", path.to_string_lossy().as_ref()])
        .assert()
        .failure()
        .stderr(contains("is not a valid duration"));

    let missing = tmp.path().join("missing.json");
    cli()
        .args(["convert", "--duration", missing.to_string_lossy().as_ref()])
        .assert()
        .failure()
        .stderr(contains("not found or not readable"));
    Ok(())
}

#[test]
fn points_lists_one_row_per_month() {
    cli()
        .args([
            "points", "--start", "2016-01", "--end", "2016-03", "--step", "month",
        ])
        .assert()
        .success()
        .stdout(contains("201601"))
        .stdout(contains("201602"))
        .stdout(contains("2505600"))
        .stdout(contains("201603"));
}

#[test]
fn points_json_carries_unit_lengths() -> TestResult {
    let output = cli()
        .args([
            "points",
            "--start",
            "2017-01-01 22",
            "--end",
            "2017-01-02 01",
            "--step",
            "hour",
            "--format",
            "json",
        ])
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let points = value["points"].as_array().unwrap();
    assert_eq!(points.len(), 4);
    assert_eq!(points[0]["point"], 2017010122_i64);
    assert_eq!(points[3]["point"], 2017010201_i64);
    assert!(points.iter().all(|p| p["minutes_between"] == 60));
    Ok(())
}

#[test]
fn points_rejects_inverted_range() {
    cli()
        .args([
            "points",
            "--start",
            "2017-01-03",
            "--end",
            "2017-01-01",
            "--step",
            "day",
        ])
        .assert()
        .failure()
        .stderr(contains("Cannot list points"));
}

#[test]
fn points_refuses_oversized_range() {
    cli()
        .args([
            "points",
            "--start",
            "1000-01-01 000000",
            "--end",
            "9999-12-31 235959",
            "--step",
            "second",
        ])
        .assert()
        .failure()
        .stderr(contains("Cannot list points"))
        .stderr(contains("use a coarser step"));
}
