//! Basic CLI E2E tests.
//!
//! Tests run the built binary in the dev environment with `HOME` pointed at a
//! temporary directory, so nothing touches system paths.

use std::path::{Path, PathBuf};
use std::process::Command;

struct Sandbox {
    home: tempfile::TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("Failed to create temp home"),
        }
    }

    fn data_dir(&self) -> PathBuf {
        self.home.path().join(".config").join("uptimeguard-dev")
    }

    /// Run the CLI and return (stdout, stderr, exit code).
    fn run(&self, presenter: &Path, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_uptimeguard"))
            .args(args)
            .env("HOME", self.home.path())
            .env("UPTIMEGUARD_ENV", "dev")
            .env("UPTIMEGUARD_PRESENTER", presenter)
            .env_remove("UPTIMEGUARD_DEBUG")
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);

        (stdout, stderr, code)
    }

    fn log(&self) -> String {
        std::fs::read_to_string(self.data_dir().join("uptimeguard.log")).unwrap_or_default()
    }
}

#[test]
fn test_missing_presenter_exits_before_uptime_check() {
    let sandbox = Sandbox::new();
    let presenter = sandbox.home.path().join("no-such-presenter");

    let (_stdout, stderr, code) = sandbox.run(&presenter, &["--debug"]);

    assert_eq!(code, 1, "expected exit 1, stderr: {stderr}");
    assert!(stderr.contains("Presenter not found"), "stderr: {stderr}");
    assert!(!stderr.contains("Read uptime"), "uptime was queried: {stderr}");
    assert!(sandbox.log().contains("Presenter not found"));
    assert!(!sandbox.data_dir().join("defer_count").exists());
}

#[test]
fn test_status_json_reports_counter() {
    let sandbox = Sandbox::new();
    let presenter = sandbox.home.path().join("no-such-presenter");
    std::fs::create_dir_all(sandbox.data_dir()).unwrap();
    std::fs::write(sandbox.data_dir().join("defer_count"), "2\n").unwrap();

    let (stdout, stderr, code) = sandbox.run(&presenter, &["status", "--json"]);

    assert_eq!(code, 0, "status failed: {stderr}");
    let status: serde_json::Value = serde_json::from_str(&stdout).expect("status is JSON");
    assert_eq!(status["defer_count"], 2);
    assert_eq!(status["defer_limit"], 3);
    assert_eq!(status["deferrals_remaining"], 1);
    assert_eq!(status["environment"], "dev");
}

#[test]
fn test_status_treats_corrupt_counter_as_zero() {
    let sandbox = Sandbox::new();
    let presenter = sandbox.home.path().join("no-such-presenter");
    std::fs::create_dir_all(sandbox.data_dir()).unwrap();
    std::fs::write(sandbox.data_dir().join("defer_count"), "lots").unwrap();

    let (stdout, _stderr, code) = sandbox.run(&presenter, &["status", "--json"]);

    assert_eq!(code, 0);
    let status: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(status["defer_count"], 0);
}

#[test]
fn test_reset_clears_counter() {
    let sandbox = Sandbox::new();
    let presenter = sandbox.home.path().join("no-such-presenter");
    std::fs::create_dir_all(sandbox.data_dir()).unwrap();
    std::fs::write(sandbox.data_dir().join("defer_count"), "3\n").unwrap();

    let (stdout, _stderr, code) = sandbox.run(&presenter, &["reset"]);

    assert_eq!(code, 0);
    assert!(stdout.contains("cleared"));
    assert!(!sandbox.data_dir().join("defer_count").exists());
}

#[cfg(unix)]
#[test]
fn test_run_with_presenter_never_restarts() {
    use std::os::unix::fs::PermissionsExt;

    let sandbox = Sandbox::new();
    // Always answers "button 2" (Defer).
    let presenter = sandbox.home.path().join("presenter.sh");
    std::fs::write(&presenter, "#!/bin/sh\necho 2\n").unwrap();
    std::fs::set_permissions(&presenter, std::fs::Permissions::from_mode(0o755)).unwrap();

    let (stdout, stderr, code) = sandbox.run(&presenter, &["--debug", "--json"]);

    assert_eq!(code, 0, "run failed: {stderr}");
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("report is JSON");
    let result = report["outcome"]["result"].as_str().unwrap();
    // Depends on the test machine's uptime; both paths must avoid restarting.
    assert!(
        result == "no_action_needed" || result == "deferred",
        "unexpected outcome: {result}"
    );
    if result == "deferred" {
        let count = std::fs::read_to_string(sandbox.data_dir().join("defer_count")).unwrap();
        assert_eq!(count.trim(), "1");
    }
}
