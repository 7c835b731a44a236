//! Integration tests for the lifecycle binary and library.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a lifecycle Command
fn lifecycle() -> Command {
    cargo_bin_cmd!("lifecycle")
}

/// Helper to create a project directory with the given lifecycle.toml
fn project_with_config(config: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let cfg_dir = dir.path().join(".lifecycle");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("lifecycle.toml"), config).unwrap();
    dir
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_lifecycle_help() {
        lifecycle().arg("--help").assert().success();
    }

    #[test]
    fn test_lifecycle_version() {
        lifecycle().arg("--version").assert().success();
    }

    #[test]
    fn test_run_rejects_unknown_phase() {
        let dir = TempDir::new().unwrap();
        lifecycle()
            .current_dir(dir.path())
            .args(["run", "warmup"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid phase"));
    }

    #[test]
    fn test_run_without_config() {
        let dir = TempDir::new().unwrap();
        lifecycle()
            .current_dir(dir.path())
            .arg("run")
            .assert()
            .success()
            .stdout(predicate::str::contains("No lifecycle tasks ran"));
    }
}

// =============================================================================
// Run Command Tests
// =============================================================================

mod run_command {
    use super::*;

    #[test]
    fn test_run_executes_phases_in_order() {
        let dir = project_with_config(
            r#"
[[tasks]]
phase = "deferred"
id = "third"
command = "echo third >> order.txt"

[[tasks]]
phase = "bootstrap"
id = "first"
command = "echo first >> order.txt"

[[tasks]]
phase = "bootstrap"
id = "second"
command = "echo second >> order.txt"
"#,
        );

        lifecycle()
            .current_dir(dir.path())
            .arg("run")
            .assert()
            .success()
            .stdout(predicate::str::contains("bootstrap/first"))
            .stdout(predicate::str::contains("3 task(s) run, 0 failed"));

        let order = fs::read_to_string(dir.path().join("order.txt")).unwrap();
        assert_eq!(order, "first\nsecond\nthird\n");
    }

    #[test]
    fn test_run_selected_phase_only() {
        let dir = project_with_config(
            r#"
[[tasks]]
phase = "bootstrap"
id = "boot"
command = "touch boot.txt"

[[tasks]]
phase = "shutdown"
id = "stop"
command = "touch stop.txt"
"#,
        );

        lifecycle()
            .current_dir(dir.path())
            .args(["run", "shutdown"])
            .assert()
            .success();

        assert!(dir.path().join("stop.txt").exists());
        assert!(!dir.path().join("boot.txt").exists());
    }

    #[test]
    fn test_optional_failure_does_not_abort() {
        let dir = project_with_config(
            r#"
[[tasks]]
phase = "deferred"
id = "updates"
command = "exit 2"
optional = true

[[tasks]]
phase = "deferred"
id = "index"
command = "touch index.txt"
"#,
        );

        lifecycle()
            .current_dir(dir.path())
            .args(["run", "deferred"])
            .assert()
            .success()
            .stdout(predicate::str::contains("failed (optional)"))
            .stdout(predicate::str::contains("2 task(s) run, 1 failed"));

        assert!(dir.path().join("index.txt").exists());
    }

    #[test]
    fn test_required_failure_aborts_remaining_tasks_and_phases() {
        let dir = project_with_config(
            r#"
[[tasks]]
phase = "bootstrap"
id = "db"
command = "echo 'db locked' >&2; exit 4"

[[tasks]]
phase = "bootstrap"
id = "after"
command = "touch after.txt"

[[tasks]]
phase = "deferred"
id = "later"
command = "touch later.txt"
"#,
        );

        lifecycle()
            .current_dir(dir.path())
            .arg("run")
            .assert()
            .failure()
            .stdout(predicate::str::contains("FAILED"))
            .stdout(predicate::str::contains("bootstrap/db"))
            .stderr(predicate::str::contains("Phase 'bootstrap' aborted"))
            .stderr(predicate::str::contains("db locked"));

        assert!(!dir.path().join("after.txt").exists());
        assert!(!dir.path().join("later.txt").exists());
    }

    #[test]
    fn test_failure_is_logged_with_coordinator_source() {
        let dir = project_with_config(
            r#"
[[tasks]]
phase = "idle"
id = "flaky"
command = "exit 1"
optional = true
"#,
        );

        lifecycle()
            .current_dir(dir.path())
            .args(["--log-format", "json", "run", "idle"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Lifecycle task failed"))
            .stderr(predicate::str::contains("LifecycleCoordinator"));
    }

    #[test]
    fn test_project_dir_flag() {
        let dir = project_with_config(
            r#"
[[tasks]]
phase = "critical"
id = "marker"
command = "touch marker.txt"
"#,
        );

        lifecycle()
            .arg("--project-dir")
            .arg(dir.path())
            .args(["run", "critical"])
            .assert()
            .success();

        assert!(dir.path().join("marker.txt").exists());
    }
}

// =============================================================================
// List / Validate Tests
// =============================================================================

mod config_commands {
    use super::*;

    #[test]
    fn test_list_groups_tasks_by_phase() {
        let dir = project_with_config(
            r#"
[[tasks]]
phase = "deferred"
id = "updates"
label = "Check for updates"
command = "true"
optional = true

[[tasks]]
phase = "bootstrap"
id = "env"
command = "true"

[[tasks]]
phase = "bootstrap"
id = "hidden"
command = "true"
enabled = false
"#,
        );

        lifecycle()
            .current_dir(dir.path())
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("[bootstrap]"))
            .stdout(predicate::str::contains("env (required)"))
            .stdout(predicate::str::contains(
                "updates (optional) - Check for updates",
            ))
            .stdout(predicate::str::contains("hidden").not());
    }

    #[test]
    fn test_list_without_config() {
        let dir = TempDir::new().unwrap();
        lifecycle()
            .current_dir(dir.path())
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("No lifecycle tasks configured"));
    }

    #[test]
    fn test_validate_valid_config() {
        let dir = project_with_config(
            r#"
[[tasks]]
phase = "bootstrap"
id = "env"
command = "true"
"#,
        );

        lifecycle()
            .current_dir(dir.path())
            .arg("validate")
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration valid: 1 enabled task(s)"));
    }

    #[test]
    fn test_validate_reports_warnings() {
        let dir = project_with_config(
            r#"
[[tasks]]
phase = "bootstrap"
id = "broken"
"#,
        );

        lifecycle()
            .current_dir(dir.path())
            .arg("validate")
            .assert()
            .failure()
            .stdout(predicate::str::contains("no command specified"));
    }

    #[test]
    fn test_invalid_toml_fails() {
        let dir = project_with_config("[[tasks]\nphase = ");
        lifecycle()
            .current_dir(dir.path())
            .arg("list")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to parse lifecycle.toml"));
    }
}
