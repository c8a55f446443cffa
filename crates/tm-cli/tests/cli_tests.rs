//! End-to-end tests running the `tm` binary

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn tm_bin() -> String {
    env!("CARGO_BIN_EXE_tm").to_string()
}

/// Run `tm` with `args` in project `dir`; returns (stdout, stderr, exit code).
fn run_tm(dir: &Path, args: &[&str]) -> (String, String, Option<i32>) {
    let output = Command::new(tm_bin())
        .args(args)
        .arg("--project-dir")
        .arg(dir)
        .env_remove("TM_TARGET")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute tm with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code(),
    )
}

fn copy_dir(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), target).unwrap();
        }
    }
}

/// Copy a fixture into a temp dir so the `dev` target's DuckDB file lands there.
fn fixture_copy(name: &str) -> TempDir {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    copy_dir(&Path::new("tests/fixtures").join(name), tmp.path());
    tmp
}

fn status_json(dir: &Path) -> serde_json::Value {
    let (stdout, stderr, code) = run_tm(dir, &["status", "--target", "dev", "--output", "json"]);
    assert_eq!(code, Some(0), "status failed: {stderr}");
    serde_json::from_str(&stdout).unwrap()
}

#[test]
fn test_up_status_down_cycle() {
    let tmp = fixture_copy("sample_project");
    let dir = tmp.path();

    let (stdout, stderr, code) = run_tm(dir, &["up", "--target", "dev"]);
    assert_eq!(code, Some(0), "up failed: {stderr}");
    assert!(stdout.contains("Applied 3 migration(s): 1, 2, 3"));
    assert!(dir.join("dev.duckdb").exists());

    let (stdout, _, code) = run_tm(dir, &["up", "--target", "dev"]);
    assert_eq!(code, Some(0));
    assert!(stdout.contains("Already up to date"));

    let status = status_json(dir);
    assert_eq!(status["current"], 3);
    assert_eq!(status["previous"], 2);
    assert_eq!(status["applied"].as_array().unwrap().len(), 3);
    assert_eq!(status["applied"][0]["version_id"], 3);
    assert!(status["pending"].as_array().unwrap().is_empty());

    let (stdout, stderr, code) = run_tm(dir, &["down", "--target", "dev"]);
    assert_eq!(code, Some(0), "down failed: {stderr}");
    assert!(stdout.contains("Reverted version 3"));
    assert!(stdout.contains("Current version: 2"));

    let status = status_json(dir);
    assert_eq!(status["current"], 2);
    assert_eq!(status["pending"], serde_json::json!([3]));
}

#[test]
fn test_status_table_output() {
    let tmp = fixture_copy("sample_project");

    let (stdout, stderr, code) = run_tm(tmp.path(), &["status", "--target", "dev"]);

    assert_eq!(code, Some(0), "status failed: {stderr}");
    assert!(stdout.contains("Current version:  none"));
    assert!(stdout.contains("No versions applied"));
    assert!(stdout.contains("Pending (3 of 3): 1, 2, 3"));
}

#[test]
fn test_target_from_environment() {
    let tmp = fixture_copy("sample_project");

    let output = Command::new(tm_bin())
        .args(["up", "--project-dir"])
        .arg(tmp.path())
        .env("TM_TARGET", "dev")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(tmp.path().join("dev.duckdb").exists());
}

#[test]
fn test_unknown_target_fails() {
    let tmp = fixture_copy("sample_project");

    let (_, stderr, code) = run_tm(tmp.path(), &["up", "--target", "nope"]);

    assert_eq!(code, Some(1));
    assert!(stderr.contains("Target 'nope' not found"));
}

#[test]
fn test_failed_up_exits_with_error() {
    let (stdout, stderr, code) = run_tm(Path::new("tests/fixtures/failing_project"), &["up"]);

    assert_eq!(code, Some(1));
    assert!(!stdout.contains("Applied"));
    assert!(stderr.contains("Migration failed"));
    assert!(stderr.contains("[M003]"));
}

#[test]
fn test_failed_rollback_exits_with_status_2() {
    let (stdout, stderr, code) = run_tm(
        Path::new("tests/fixtures/rollback_failure_project"),
        &["up"],
    );

    assert_eq!(code, Some(2), "stderr: {stderr}");
    assert!(!stdout.contains("Applied"));
    assert!(stderr.contains("[M005]"));
    assert!(stderr.contains("Halting"));
}

#[test]
fn test_up_down_up_keeps_reapplied_version_current() {
    let tmp = fixture_copy("sample_project");
    let dir = tmp.path();

    for args in [&["up"][..], &["down"][..], &["up"][..]] {
        let mut args = args.to_vec();
        args.extend(["--target", "dev"]);
        let (_, stderr, code) = run_tm(dir, &args);
        assert_eq!(code, Some(0), "{args:?} failed: {stderr}");
    }

    let status = status_json(dir);
    assert_eq!(status["current"], 3);
    assert_eq!(status["previous"], 2);

    let (stdout, stderr, code) = run_tm(dir, &["up", "--target", "dev"]);
    assert_eq!(code, Some(0), "up failed: {stderr}");
    assert!(stdout.contains("Already up to date"));
}

#[test]
fn test_validate_sample_project() {
    let (stdout, stderr, code) = run_tm(Path::new("tests/fixtures/sample_project"), &["validate"]);

    assert_eq!(code, Some(0), "validate failed: {stderr}");
    assert!(stdout.contains("3 migration(s) OK, versions 1 to 3"));
}

#[test]
fn test_validate_rejects_duplicate_versions() {
    let tmp = fixture_copy("sample_project");
    fs::write(
        tmp.path().join("migrations/0004_again.yml"),
        "version: 2\nup: [\"SELECT 1\"]\n",
    )
    .unwrap();

    let (_, stderr, code) = run_tm(tmp.path(), &["validate"]);

    assert_eq!(code, Some(1));
    assert!(stderr.contains("[E006]"));
}

#[test]
fn test_new_scaffolds_next_version() {
    let tmp = fixture_copy("sample_project");

    let (stdout, stderr, code) = run_tm(tmp.path(), &["new", "Add order status"]);

    assert_eq!(code, Some(0), "new failed: {stderr}");
    let created = tmp.path().join("migrations/0004_add_order_status.yml");
    assert!(created.exists());
    assert!(stdout.contains("0004_add_order_status.yml"));

    let (stdout, _, code) = run_tm(tmp.path(), &["validate"]);
    assert_eq!(code, Some(0));
    assert!(stdout.contains("4 migration(s) OK, versions 1 to 4"));
}

#[test]
fn test_explicit_config_path() {
    let tmp = fixture_copy("sample_project");
    let config = tmp.path().join("tidemark.yml");
    fs::rename(&config, tmp.path().join("alt.yml")).unwrap();

    let (_, _, code) = run_tm(tmp.path(), &["validate"]);
    assert_eq!(code, Some(1));

    let alt = tmp.path().join("alt.yml").display().to_string();
    let (stdout, stderr, code) = run_tm(tmp.path(), &["validate", "--config", &alt]);
    assert_eq!(code, Some(0), "validate failed: {stderr}");
    assert!(stdout.contains("Validating project: sample_project"));
}
