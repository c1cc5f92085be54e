//! CLI integration tests
//!
//! Every test points `--config` at a temp file so the user's own override
//! file is never read or written.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn fraudguard() -> Command {
    Command::cargo_bin("fraudguard")
        .expect("Failed to locate fraudguard binary - ensure it's built before running tests")
}

fn override_file(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.json");
    std::fs::write(&path, content).unwrap();
    path
}

fn with_config(path: &Path) -> Command {
    let mut cmd = fraudguard();
    cmd.arg("--config").arg(path);
    cmd
}

#[test]
fn test_cli_help() {
    fraudguard()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fraudguard"))
        .stdout(predicate::str::contains("queue"));
}

#[test]
fn test_cli_version() {
    fraudguard()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fraudguard"));
}

#[test]
fn test_cli_queue_help() {
    fraudguard()
        .args(["queue", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("restart"));
}

#[test]
fn test_config_get_static_url() {
    let dir = TempDir::new().unwrap();
    let config = override_file(&dir, "{}");

    with_config(&config)
        .args(["config", "get", "production.urls.api_url"])
        .assert()
        .success()
        .stdout("https://api.fraudguard.io/v2\n");
}

#[test]
fn test_config_get_object_prints_json() {
    let dir = TempDir::new().unwrap();
    let config = override_file(&dir, "{}");

    with_config(&config)
        .args(["config", "get", "queue"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"batch_size\": 25"));
}

#[test]
fn test_config_get_missing_key_fails() {
    let dir = TempDir::new().unwrap();
    let config = override_file(&dir, "{}");

    with_config(&config)
        .args(["config", "get", "no.such.key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Key not found: no.such.key"));
}

#[test]
fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();
    let config = override_file(&dir, "{}");

    with_config(&config)
        .args(["config", "set", "queue.batch_size", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set queue.batch_size = 50"));

    with_config(&config)
        .args(["config", "get", "queue.batch_size"])
        .assert()
        .success()
        .stdout("50\n");

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&config).unwrap()).unwrap();
    assert_eq!(saved["queue"]["batch_size"], 50);
}

#[test]
fn test_config_set_static_url_refused() {
    let dir = TempDir::new().unwrap();
    let config = override_file(&dir, "{}");

    with_config(&config)
        .args(["config", "set", "testing.urls.api_url", "https://evil.example"])
        .assert()
        .failure();

    assert_eq!(std::fs::read_to_string(&config).unwrap(), "{}");
}

#[test]
fn test_static_override_in_file_fails_to_load() {
    let dir = TempDir::new().unwrap();
    let config = override_file(
        &dir,
        r#"{ "production": { "urls": { "api_url": "https://evil.example" } } }"#,
    );

    with_config(&config)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("production.urls.api_url"));
}

#[test]
fn test_env_flag_selects_environment() {
    let dir = TempDir::new().unwrap();
    let config = override_file(&dir, "{}");

    with_config(&config)
        .args(["--env", "testing", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Environment: testing"));
}

#[test]
fn test_unknown_environment_fails() {
    let dir = TempDir::new().unwrap();
    let config = override_file(&dir, "{}");

    with_config(&config)
        .args(["--env", "staging", "config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"));
}

#[test]
fn test_unknown_event_lists_known_names() {
    let dir = TempDir::new().unwrap();
    let config = override_file(&dir, "{}");

    with_config(&config)
        .args(["event", "order_exploded"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown event 'order_exploded'"))
        .stderr(predicate::str::contains("order_created"));
}

#[test]
fn test_invalid_order_id_rejected_before_request() {
    let dir = TempDir::new().unwrap();
    let config = override_file(&dir, "{}");

    with_config(&config)
        .args(["order", "../merchants", "--decision"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid path segment"));
}

#[test]
fn test_queue_status_stopped() {
    let dir = TempDir::new().unwrap();
    let config = override_file(&dir, "{}");
    let pid_file = dir.path().join("queue_worker.json");

    with_config(&config)
        .args(["queue", "status", "--pid-file"])
        .arg(&pid_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("stopped"));
}

#[test]
fn test_queue_status_stale() {
    let dir = TempDir::new().unwrap();
    let config = override_file(&dir, "{}");
    let pid_file = dir.path().join("queue_worker.json");
    std::fs::write(
        &pid_file,
        r#"{ "process_id": 999999999, "last_update_time": 1 }"#,
    )
    .unwrap();

    with_config(&config)
        .args(["queue", "status", "--pid-file"])
        .arg(&pid_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("stale"))
        .stdout(predicate::str::contains("999999999"));
}

#[test]
fn test_queue_stop_when_not_running() {
    let dir = TempDir::new().unwrap();
    let config = override_file(&dir, "{}");
    let pid_file = dir.path().join("queue_worker.json");

    with_config(&config)
        .args(["queue", "stop", "--pid-file"])
        .arg(&pid_file)
        .assert()
        .success()
        .stderr(predicate::str::contains("not running"));
}

#[test]
fn test_queue_stop_removes_pid_file() {
    let dir = TempDir::new().unwrap();
    let config = override_file(&dir, "{}");
    let pid_file = dir.path().join("queue_worker.json");
    // Unknown PID: the kill command fails, which is only logged
    std::fs::write(&pid_file, r#"{ "process_id": 999999999 }"#).unwrap();

    with_config(&config)
        .args(["queue", "stop", "--pid-file"])
        .arg(&pid_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Queue worker stopped"));

    assert!(!pid_file.exists());
}

#[test]
fn test_queue_list_unreachable_api_fails() {
    let dir = TempDir::new().unwrap();
    let config = override_file(
        &dir,
        r#"{ "development": { "urls": { "api_url": "http://127.0.0.1:9/v2" } } }"#,
    );

    with_config(&config)
        .args(["--env", "development", "queue", "list", "--limit", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to fetch queue items"));
}

/// Stops the worker even when an assertion fails first
struct StopWorker<'a> {
    config: &'a Path,
    pid_file: &'a Path,
}

impl Drop for StopWorker<'_> {
    fn drop(&mut self) {
        let _ = with_config(self.config)
            .args(["queue", "stop", "--pid-file"])
            .arg(self.pid_file)
            .ok();
    }
}

fn read_pid_info(path: &Path) -> Option<Value> {
    let text = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}

#[cfg(unix)]
#[test]
fn test_queue_start_runs_detached_worker() {
    let dir = TempDir::new().unwrap();
    let config = override_file(
        &dir,
        r#"{
            "default_environment": "development",
            "development": { "urls": { "api_url": "http://127.0.0.1:9/v2" } },
            "http": { "connect_timeout_secs": 1 },
            "queue": { "poll_interval_secs": 1 }
        }"#,
    );
    let pid_file = dir.path().join("queue_worker.json");

    with_config(&config)
        .args(["queue", "start", "--pid-file"])
        .arg(&pid_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Queue worker launched"));
    let _stop = StopWorker {
        config: &config,
        pid_file: &pid_file,
    };

    let deadline = Instant::now() + Duration::from_secs(10);
    let info = loop {
        if let Some(info) = read_pid_info(&pid_file) {
            break info;
        }
        assert!(Instant::now() < deadline, "worker never wrote {:?}", pid_file);
        std::thread::sleep(Duration::from_millis(100));
    };

    let pid = info["process_id"].as_u64().unwrap();
    assert_ne!(pid, 0);
    assert_ne!(pid, u64::from(std::process::id()));
    let started = info["last_update_time"].clone();

    // Several poll cycles against an unreachable API; the record is never rewritten
    std::thread::sleep(Duration::from_millis(2500));
    let later = read_pid_info(&pid_file).expect("worker exited early");
    assert_eq!(later["process_id"], info["process_id"]);
    assert_eq!(later["last_update_time"], started);
    assert!(dir.path().join("queue_worker.log").exists());

    with_config(&config)
        .args(["queue", "status", "--pid-file"])
        .arg(&pid_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("running"));

    with_config(&config)
        .args(["queue", "stop", "--pid-file"])
        .arg(&pid_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Queue worker stopped"));
    assert!(!pid_file.exists());
}
