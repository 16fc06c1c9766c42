//! Course planner tests for the keel binary.
//!
//! These tests drive the portfolio commands end to end and verify the
//! ranking contract over JSON input and output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("keel"))
}

/// Midterm 30 @ 90, Final 50 pending, Projects 20 @ 95
fn half_done_request(name: &str, target: f64) -> String {
    format!(
        r#"{{"courses":[{{"name":"{}","target_grade":{},"assessments":[
            {{"name":"Midterm","weight":30,"grade":90}},
            {{"name":"Final","weight":50,"grade":null}},
            {{"name":"Projects","weight":20,"grade":95}}
        ]}}]}}"#,
        name, target
    )
}

#[test]
fn test_portfolio_add_assess_rank_flow() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("course")
        .arg("add")
        .arg("Data Structures")
        .args(["--target", "85"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added course 'Data Structures'"));

    cli()
        .args(["course", "assess", "Data Structures", "Midterm"])
        .args(["--weight", "30", "--grade", "90"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded 'Midterm'"));

    cli()
        .args(["course", "assess", "Data Structures", "Final"])
        .args(["--weight", "50"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added pending 'Final'"));

    cli()
        .args(["course", "assess", "Data Structures", "Projects"])
        .args(["--weight", "20", "--grade", "95"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .args(["course", "rank"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Data Structures [OnTrack]"))
        .stdout(predicate::str::contains("Current: 92.0% over 50%"))
        .stdout(predicate::str::contains(
            "Needs 78.0% on the remaining 50% to reach 85%",
        ));
}

#[test]
fn test_duplicate_course_add_fails() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .args(["course", "add", "Calculus"])
        .args(["--target", "85"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .args(["course", "add", "calculus"])
        .args(["--target", "90"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_add_rejects_bad_target() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["course", "add", "Calculus"])
        .args(["--target", "120"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_assess_unknown_course_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["course", "assess", "Ghost Course", "Midterm"])
        .args(["--weight", "30", "--grade", "90"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ghost Course"));
}

#[test]
fn test_invalid_assessment_does_not_corrupt_portfolio() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .args(["course", "add", "Physics"])
        .args(["--target", "80"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    // Non-positive weight is rejected and the edit must not be saved
    cli()
        .args(["course", "assess", "Physics", "Broken"])
        .args(["--weight", "0", "--grade", "90"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Broken"));

    let portfolio = fs::read_to_string(data_dir.join("courses.json")).unwrap();
    assert!(!portfolio.contains("Broken"));
}

#[test]
fn test_remove_course() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .args(["course", "add", "Calculus"])
        .args(["--target", "85"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .args(["course", "remove", "calculus"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed course 'Calculus'"));

    cli()
        .args(["course", "rank"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No courses to rank"));
}

#[test]
fn test_rank_empty_portfolio() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["course", "rank"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No courses to rank"));
}

#[test]
fn test_rank_json_reachable_target() {
    let temp_dir = setup_test_dir();
    let input_path = temp_dir.path().join("request.json");
    fs::write(&input_path, half_done_request("Data Structures", 85.0)).unwrap();

    let output = cli()
        .args(["course", "rank", "--json"])
        .arg("--input")
        .arg(&input_path)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .env("RUST_LOG", "error")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let results: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(results[0]["course"], "Data Structures");
    assert_eq!(results[0]["priority"], 1);
    assert_eq!(results[0]["risk"], "OnTrack");
    assert_eq!(results[0]["required_average"].as_f64().unwrap(), 78.0);
}

#[test]
fn test_rank_json_impossible_target() {
    let temp_dir = setup_test_dir();
    let input_path = temp_dir.path().join("request.json");
    fs::write(&input_path, half_done_request("Data Structures", 99.0)).unwrap();

    let output = cli()
        .args(["course", "rank", "--json"])
        .arg("--input")
        .arg(&input_path)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .env("RUST_LOG", "error")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let results: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(results[0]["risk"], "Unrealistic");
    assert_eq!(results[0]["required_average"].as_f64().unwrap(), 106.0);
}

#[test]
fn test_rank_orders_batch_by_urgency() {
    let temp_dir = setup_test_dir();
    let input_path = temp_dir.path().join("request.json");

    let request = r#"{"courses":[
        {"name":"Done Deal","target_grade":70,"assessments":[
            {"name":"Everything","weight":100,"grade":90}]},
        {"name":"Long Shot","target_grade":99,"assessments":[
            {"name":"Midterm","weight":30,"grade":90},
            {"name":"Final","weight":50,"grade":null},
            {"name":"Projects","weight":20,"grade":95}]},
        {"name":"Chemistry","target_grade":70,"assessments":[
            {"name":"Midterm","weight":50,"grade":55},
            {"name":"Final","weight":50,"grade":null}]}
    ]}"#;
    fs::write(&input_path, request).unwrap();

    let output = cli()
        .args(["course", "rank", "--json"])
        .arg("--input")
        .arg(&input_path)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .env("RUST_LOG", "error")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let results: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let order: Vec<&str> = results
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["course"].as_str().unwrap())
        .collect();
    assert_eq!(order, vec!["Long Shot", "Chemistry", "Done Deal"]);

    // Settled course reports no required average
    assert!(results[2]["required_average"].is_null());
    assert_eq!(results[2]["risk"], "Achieved");
}

#[test]
fn test_rank_reads_request_from_stdin() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["course", "rank", "--input", "-"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .write_stdin(half_done_request("Piped In", 85.0))
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Piped In [OnTrack]"));
}

#[test]
fn test_rank_rejects_invalid_batch() {
    let temp_dir = setup_test_dir();
    let input_path = temp_dir.path().join("request.json");

    let request = r#"{"courses":[
        {"name":"Fine","target_grade":85,"assessments":[
            {"name":"Midterm","weight":30,"grade":90}]},
        {"name":"Broken","target_grade":85,"assessments":[
            {"name":"Quiz","weight":-5,"grade":null}]}
    ]}"#;
    fs::write(&input_path, request).unwrap();

    cli()
        .args(["course", "rank"])
        .arg("--input")
        .arg(&input_path)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Quiz"));
}

#[test]
fn test_repeated_edits_accumulate() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .args(["course", "add", "Marathon"])
        .args(["--target", "75"])
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    // Five separate processes each append one assessment
    for i in 1..=5 {
        cli()
            .args(["course", "assess", "Marathon", &format!("Quiz {}", i)])
            .args(["--weight", "10", "--grade", "80"])
            .arg("--data-dir")
            .arg(&data_dir)
            .assert()
            .success();
    }

    let portfolio = fs::read_to_string(data_dir.join("courses.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&portfolio).unwrap();
    assert_eq!(parsed["courses"][0]["assessments"].as_array().unwrap().len(), 5);
}
