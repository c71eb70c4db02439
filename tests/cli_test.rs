use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("rent-vs-own").unwrap()
}

fn write_scenario(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn project_json(args: &[&str]) -> serde_json::Value {
    let output = cmd()
        .arg("project")
        .arg("--json")
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_project_default_table() {
    cmd()
        .arg("project")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rent vs Own Projection"))
        .stdout(predicate::str::contains("Monthly payment"))
        .stdout(predicate::str::contains("Summary"))
        .stdout(predicate::str::contains("Break-even"));
}

#[test]
fn test_project_json_uses_starter_scenario() {
    let json = project_json(&[]);
    assert_eq!(json["rows"].as_array().unwrap().len(), 10);
    assert_eq!(json["downPayment"].as_f64().unwrap(), 100_000.0);
    assert_eq!(json["closingCosts"].as_f64().unwrap(), 10_000.0);
    assert_eq!(json["totals"]["year"].as_u64().unwrap(), 10);
    assert!(json.get("schedule").is_none());
}

#[test]
fn test_project_clamps_analysis_years() {
    let json = project_json(&["--analysis-years", "100"]);
    assert_eq!(json["rows"].as_array().unwrap().len(), 40);

    let json = project_json(&["--analysis-years", "0"]);
    assert_eq!(json["rows"].as_array().unwrap().len(), 1);
}

#[test]
fn test_project_with_schedule() {
    let json = project_json(&["--schedule", "--analysis-years", "2"]);
    let schedule = json["schedule"].as_array().unwrap();
    assert_eq!(schedule.len(), 24);
    assert_eq!(schedule[0]["month"].as_u64().unwrap(), 1);
    assert_eq!(schedule[23]["year"].as_u64().unwrap(), 2);

    cmd()
        .args(["project", "--schedule", "--analysis-years", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Amortization Schedule"));
}

#[test]
fn test_project_toml_scenario_with_override() {
    let dir = TempDir::new().unwrap();
    let path = write_scenario(
        &dir,
        "scenario.toml",
        "home_price = 300000\ndown_percent = 100\nmonthly_rent = 1500\nanalysis_years = 5\n",
    );

    let json = project_json(&[
        "--scenario",
        path.to_str().unwrap(),
        "--monthly-rent",
        "1800",
    ]);
    assert_eq!(json["rows"].as_array().unwrap().len(), 5);
    assert_eq!(json["loanAmount"].as_f64().unwrap(), 0.0);
    assert_eq!(json["monthlyPayment"].as_f64().unwrap(), 0.0);
    // Rent growth is absent from the file, so it defaults to 0.
    assert_eq!(json["rows"][0]["rentPaid"].as_f64().unwrap(), 21_600.0);
}

#[test]
fn test_project_json_scenario() {
    let dir = TempDir::new().unwrap();
    let path = write_scenario(
        &dir,
        "scenario.json",
        r#"{ "homePrice": "250,000", "interestRate": "5%", "analysisYears": 3 }"#,
    );

    let json = project_json(&["--scenario", path.to_str().unwrap()]);
    assert_eq!(json["rows"].as_array().unwrap().len(), 3);
    assert_eq!(json["loanAmount"].as_f64().unwrap(), 250_000.0);
}

#[test]
fn test_unsupported_scenario_format() {
    let dir = TempDir::new().unwrap();
    let path = write_scenario(&dir, "scenario.yaml", "home_price: 1\n");

    cmd()
        .args(["project", "--scenario", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported scenario format"));
}

#[test]
fn test_missing_scenario_file() {
    cmd()
        .args(["project", "--scenario", "/nonexistent/scenario.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn test_solve_monthly_rent() {
    cmd()
        .args(["solve", "--goal", "monthly-rent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Break-even monthly rent over 10 years"))
        .stdout(predicate::str::contains("Solved"));
}

#[test]
fn test_solve_json_reports_iterations() {
    let output = cmd()
        .args(["solve", "--goal", "home-price", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["goalType"].as_str().unwrap(), "home-price");
    assert!(json["iterations"].is_array());
    assert!(json["message"].is_string());
}

#[test]
fn test_solve_rejects_inverted_bounds() {
    cmd()
        .args(["solve", "--goal", "monthly-rent", "--min", "5000", "--max", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_solve_rejects_excessive_iterations() {
    cmd()
        .args([
            "solve",
            "--goal",
            "monthly-rent",
            "--max-iterations",
            "4294967295",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_iterations"));
}

#[test]
fn test_solve_invalid_goal() {
    cmd()
        .args(["solve", "--goal", "mortgage-rate"])
        .assert()
        .failure();
}

#[test]
fn test_sweep_rate_field_json() {
    let output = cmd()
        .args([
            "sweep",
            "--field",
            "interest-rate",
            "--from",
            "4",
            "--to",
            "7",
            "--step",
            "1",
            "--json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let points = json.as_array().unwrap();
    assert_eq!(points.len(), 4);
    assert!((points[0]["value"].as_f64().unwrap() - 0.04).abs() < 1e-12);
    assert!(points[3]["totals"]["rentVsOwn"].is_number());
}

#[test]
fn test_sweep_table() {
    cmd()
        .args([
            "sweep",
            "--field",
            "monthly-rent",
            "--from",
            "1500",
            "--to",
            "3000",
            "--step",
            "500",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sensitivity Sweep"))
        .stdout(predicate::str::contains("$2,500"));
}

#[test]
fn test_sweep_rejects_zero_step() {
    cmd()
        .args([
            "sweep", "--field", "home-price", "--from", "1", "--to", "2", "--step", "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("step"));
}

#[test]
fn test_no_subcommand() {
    cmd().assert().failure();
}
