//! End-to-end tests of the algo-ta-audit binary.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("algo-ta-audit-cli-{name}-{}", std::process::id()));
    fs::remove_dir_all(&dir).ok();
    dir
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_algo-ta-audit"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

// =============================================================================
// list
// =============================================================================

#[test]
fn test_list_prints_the_catalogue() {
    let output = run_cli(&["list"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.lines().any(|l| l.starts_with("*sma")));
    assert!(text.contains("supertrend"));
    assert!(text.lines().count() > 100);
}

#[test]
fn test_list_by_category() {
    let output = run_cli(&["list", "--category", "volume"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("obv"));
    assert!(!text.contains("macd"));
}

#[test]
fn test_list_unknown_category_fails() {
    let output = run_cli(&["list", "--category", "astrology"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("astrology"));
}

// =============================================================================
// validate / bench / audit
// =============================================================================

#[test]
fn test_validate_synthetic_passes() {
    let output = run_cli(&["validate", "--rows", "2000", "--no-write"]);
    assert!(output.status.success(), "{}", stdout(&output));
    let text = stdout(&output);
    assert!(text.starts_with("# algo-ta audit: PASS"));
    assert!(text.contains("| rsi |"));
    assert!(!text.contains("## Performance"));
}

#[test]
fn test_bench_writes_reports() {
    let dir = scratch_dir("bench");
    let output = run_cli(&[
        "bench",
        "-i",
        "sma,ema",
        "--sizes",
        "500,1k",
        "-o",
        dir.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", stdout(&output));

    let timings = fs::read_to_string(dir.join("performance.csv")).unwrap();
    // header plus two kernels at two sizes
    assert_eq!(timings.lines().count(), 5);
    assert!(timings.contains("ema,trend,1000,"));
    assert!(dir.join("audit.json").exists());
    assert!(dir.join("summary.md").exists());
    assert!(!dir.join("accuracy.csv").exists());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_audit_on_csv_data() {
    let dir = scratch_dir("csv");
    let bars = fixtures_dir().join("bars.csv");
    let output = run_cli(&[
        "audit",
        "--data",
        bars.to_str().unwrap(),
        "--rows",
        "100",
        "--sizes",
        "50,120",
        "-i",
        "sma,atr,obv",
        "-o",
        dir.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", stdout(&output));
    let text = stdout(&output);
    assert!(text.contains("bars.csv"));

    let accuracy = fs::read_to_string(dir.join("accuracy.csv")).unwrap();
    assert_eq!(accuracy.lines().count(), 4);
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(dir.join("audit.json")).unwrap()).unwrap();
    assert_eq!(json["performance"]["records"].as_array().unwrap().len(), 6);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_csv_shorter_than_requested_size_is_reported() {
    let bars = fixtures_dir().join("bars.csv");
    let output = run_cli(&[
        "bench",
        "--data",
        bars.to_str().unwrap(),
        "--sizes",
        "100,5000",
        "-i",
        "sma",
        "--no-write",
    ]);
    assert!(!output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("# algo-ta audit: FAIL"));
    assert!(text.contains("| sma | 100 |"));
    assert!(text.contains("5000 rows, Load"));
}

#[test]
fn test_config_file_and_flags() {
    let dir = scratch_dir("config");
    fs::create_dir_all(&dir).unwrap();
    let config = dir.join("audit.json");
    fs::write(&config, r#"{ "filter": ["wma"], "validation_rows": 300, "tolerance": 1e-6 }"#).unwrap();

    let output = run_cli(&["validate", "--config", config.to_str().unwrap(), "--no-write"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("300 rows"));
    assert!(text.contains("| wma |"));
    assert!(!text.contains("| sma |"));

    fs::remove_dir_all(&dir).ok();
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_unknown_indicator_is_rejected() {
    let output = run_cli(&["validate", "-i", "not_a_kernel", "--no-write"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("not_a_kernel"));
}

#[test]
fn test_invalid_size_is_rejected() {
    let output = run_cli(&["bench", "--sizes", "0"]);
    assert!(!output.status.success());
}

#[test]
fn test_missing_data_file_is_rejected() {
    let output = run_cli(&["validate", "--data", "/no/such/bars.csv", "--no-write"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("bars.csv"));
}
