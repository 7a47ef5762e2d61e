//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Sandbox with a UTC zone and a complete bear profile.
    fn with_profile() -> Self {
        let sb = Self::new();
        sb.run_success(&["config", "set", "timezone", "UTC"]);
        sb.run_success(&[
            "profile",
            "set",
            "--chronotype",
            "bear",
            "--wakeup-time",
            "07:00",
            "--sleep-duration",
            "7.5",
        ]);
        sb
    }

    /// Run a CLI command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_timeweave-cli"))
            .args(args)
            .env("TIMEWEAVE_DATA_DIR", self.dir.path())
            .env_remove("TIMEWEAVE_LOG")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);

        (stdout, stderr, code)
    }

    fn run_success(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "CLI command failed: {:?}\n{}", args, stderr);
        stdout
    }

    fn run_json(&self, args: &[&str]) -> Value {
        serde_json::from_str(&self.run_success(args)).expect("Failed to parse JSON output")
    }
}

#[test]
fn test_profile_show_incomplete() {
    let sb = Sandbox::new();
    let out = sb.run_success(&["profile", "show"]);
    assert!(out.contains("Profile incomplete"));
}

#[test]
fn test_plan_without_profile_fails() {
    let sb = Sandbox::new();
    let (_, stderr, code) = sb.run(&["plan", "generate", "--date", "2025-03-12"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("profile incomplete"));
}

#[test]
fn test_profile_set_rejects_unknown_chronotype() {
    let sb = Sandbox::new();
    let (_, stderr, code) = sb.run(&["profile", "set", "--chronotype", "owl"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("chronotype"));
}

#[test]
fn test_profile_bedtime() {
    let sb = Sandbox::with_profile();
    let out = sb.run_success(&["profile", "bedtime"]);
    assert!(out.contains("Bedtime: 23:30"));

    let out = sb.run_success(&["profile", "show"]);
    assert!(out.contains("07:00 - 23:30 (16h30)"));

    let shown = sb.run_json(&["profile", "show", "--json"]);
    assert_eq!(shown["complete"], true);
    assert_eq!(shown["bedtime"], "23:30");
    assert_eq!(shown["crosses_midnight"], false);
    assert_eq!(shown["energy_peak"]["start_hour"], 10);
}

#[test]
fn test_plan_generate_empty_week() {
    let sb = Sandbox::with_profile();
    let plan = sb.run_json(&["plan", "generate", "--date", "2025-03-12", "--json"]);
    let items = plan.as_array().unwrap();

    assert_eq!(items.len(), 7);
    assert_eq!(items[0]["title"], "Review / Homework");
    assert_eq!(items[0]["type"], "study");
    assert_eq!(items[0]["start_time"], "2025-03-10T07:00:00Z");
    assert_eq!(items[0]["end_time"], "2025-03-10T08:00:00Z");
    assert_eq!(items[0]["is_tentative"], true);
    assert_eq!(items[6]["start_time"], "2025-03-16T07:00:00Z");

    // Preview only: nothing was saved.
    let stored = sb.run_json(&["events", "list", "--json"]);
    assert!(stored.as_array().unwrap().is_empty());
}

#[test]
fn test_plan_avoids_existing_events() {
    let sb = Sandbox::with_profile();
    sb.run_success(&[
        "events",
        "add",
        "Lecture",
        "--type",
        "class",
        "--start",
        "2025-03-10 07:00",
        "--end",
        "2025-03-10 12:00",
        "--fixed",
    ]);

    let plan = sb.run_json(&["plan", "generate", "--date", "2025-03-10", "--json"]);
    let monday = &plan.as_array().unwrap()[0];
    assert_eq!(monday["title"], "Deep study");
    assert_eq!(monday["start_time"], "2025-03-10T12:00:00Z");
    assert_eq!(monday["end_time"], "2025-03-10T13:30:00Z");
}

#[test]
fn test_plan_apply_then_clear() {
    let sb = Sandbox::with_profile();
    let out = sb.run_success(&["plan", "apply", "--date", "2025-03-12"]);
    assert!(out.contains("Saved 7 of 7"));

    let stored = sb.run_json(&["events", "list", "--week", "2025-03-12", "--json"]);
    let stored = stored.as_array().unwrap();
    assert_eq!(stored.len(), 7);
    assert!(stored.iter().all(|e| e["is_tentative"] == true && e["id"].is_string()));

    // A second apply plans around the saved sessions.
    let report = sb.run_json(&["plan", "apply", "--date", "2025-03-12", "--json"]);
    assert!(report["conflicts"].as_array().unwrap().is_empty());

    let out = sb.run_success(&["events", "clear-suggestions", "--date", "2025-03-12"]);
    assert!(out.contains("Removed 14"));
}

#[test]
fn test_accept_and_reject_suggestions() {
    let sb = Sandbox::with_profile();
    let report = sb.run_json(&["plan", "apply", "--date", "2025-03-12", "--json"]);
    let saved = report["saved"].as_array().unwrap();
    let first = saved[0]["id"].as_str().unwrap().to_string();
    let second = saved[1]["id"].as_str().unwrap().to_string();

    sb.run_success(&["events", "accept", &first]);
    sb.run_success(&["events", "reject", &second]);

    let (_, stderr, code) = sb.run(&["events", "reject", &first]);
    assert_ne!(code, 0);
    assert!(stderr.contains("not a pending suggestion"));

    let stored = sb.run_json(&["events", "list", "--json"]);
    assert_eq!(stored.as_array().unwrap().len(), 6);
}

#[test]
fn test_strict_mode_rejects_malformed_wake_time() {
    let sb = Sandbox::new();
    std::fs::write(
        sb.dir.path().join("config.toml"),
        "timezone = \"UTC\"\n\n[profile]\nchronotype = \"bear\"\nwakeup_time = \"7am\"\nsleep_duration = 7.5\n",
    )
    .unwrap();

    let (_, stderr, code) = sb.run(&["plan", "generate", "--date", "2025-03-12", "--strict"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("7am"));

    let plan = sb.run_json(&["plan", "generate", "--date", "2025-03-12", "--json"]);
    let items = plan.as_array().unwrap();
    assert_eq!(items.len(), 7);
    assert_eq!(items[0]["start_time"], "2025-03-10T07:00:00Z");
}

#[test]
fn test_config_get_set() {
    let sb = Sandbox::new();
    sb.run_success(&["config", "set", "planner.min_slot_minutes", "30"]);
    let out = sb.run_success(&["config", "get", "planner.min_slot_minutes"]);
    assert_eq!(out.trim(), "30");

    let (_, _, code) = sb.run(&["config", "set", "planner.min_slot_minutes", "-5"]);
    assert_ne!(code, 0);
    let (_, _, code) = sb.run(&["config", "set", "timezone", "Mars/Olympus"]);
    assert_ne!(code, 0);
    let (_, _, code) = sb.run(&["config", "get", "no.such.key"]);
    assert_ne!(code, 0);
}
