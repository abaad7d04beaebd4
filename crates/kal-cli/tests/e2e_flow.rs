//! End-to-end tests running the `kal` binary against a temporary database.
//!
//! Tests the full pipeline: add → conflict check → list → edit → delete

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn kal_binary() -> String {
    env!("CARGO_BIN_EXE_kal").to_string()
}

/// Writes a config file pointing the database into `temp`.
fn write_config(temp: &Path) -> PathBuf {
    let config_path = temp.join("config.toml");
    let db_path = temp.join("data").join("kal.db");
    std::fs::write(
        &config_path,
        format!("database_path = {:?}\n", db_path.display().to_string()),
    )
    .unwrap();
    config_path
}

fn kal(temp: &Path, args: &[&str]) -> Output {
    let config_path = write_config(temp);
    Command::new(kal_binary())
        .env("HOME", temp)
        .env("XDG_CONFIG_HOME", temp.join(".config"))
        .env_remove("KAL_DATABASE_PATH")
        .env_remove("KAL_DEFAULT_NOTIFICATION_MINUTES")
        .env_remove("KAL_DEFAULT_CATEGORY")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config_path)
        .args(args)
        .output()
        .expect("failed to run kal")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "kal should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn list_json(temp: &Path) -> Vec<serde_json::Value> {
    let output = kal(temp, &["list", "--json"]);
    assert_success(&output);
    serde_json::from_str(&stdout(&output)).unwrap()
}

#[test]
fn test_add_recurring_event_and_list() {
    let temp = TempDir::new().unwrap();

    let output = kal(
        temp.path(),
        &[
            "add", "--title", "Gym", "--date", "2025-10-26", "--start", "18:00", "--end", "19:00",
            "--repeat", "daily",
        ],
    );
    assert_success(&output);
    assert!(stdout(&output).contains("Occurrences: 5 (2025-10-26 to 2025-10-30)"));

    let events = list_json(temp.path());
    let dates: Vec<&str> = events.iter().map(|e| e["date"].as_str().unwrap()).collect();
    assert_eq!(
        dates,
        ["2025-10-26", "2025-10-27", "2025-10-28", "2025-10-29", "2025-10-30"]
    );
    assert!(events.iter().all(|e| e["isRecurring"] == true));
    assert_eq!(events[0]["category"], "Work");
    assert_eq!(events[0]["notificationTime"], 10);
}

#[test]
fn test_conflicting_add_is_refused_without_force() {
    let temp = TempDir::new().unwrap();

    let first = kal(
        temp.path(),
        &["add", "--title", "Review", "--date", "2025-10-15", "--start", "10:00", "--end", "11:00"],
    );
    assert_success(&first);

    let clash = [
        "add", "--title", "Sync", "--date", "2025-10-15", "--start", "10:30", "--end", "11:30",
    ];
    let refused = kal(temp.path(), &clash);
    assert!(!refused.status.success());
    assert!(stdout(&refused).contains("Conflicts with:"));
    assert!(String::from_utf8_lossy(&refused.stderr).contains("--force"));
    assert_eq!(list_json(temp.path()).len(), 1);

    let mut forced = clash.to_vec();
    forced.push("--force");
    let output = kal(temp.path(), &forced);
    assert_success(&output);
    assert_eq!(list_json(temp.path()).len(), 2);
}

#[test]
fn test_back_to_back_events_do_not_conflict() {
    let temp = TempDir::new().unwrap();

    for (start, end) in [("09:00", "10:00"), ("10:00", "11:00")] {
        let output = kal(
            temp.path(),
            &["add", "--title", "Block", "--date", "2025-10-15", "--start", start, "--end", end],
        );
        assert_success(&output);
    }
    assert_eq!(list_json(temp.path()).len(), 2);
}

#[test]
fn test_edit_and_delete_single_occurrence() {
    let temp = TempDir::new().unwrap();

    let output = kal(
        temp.path(),
        &[
            "add", "--title", "Gym", "--date", "2025-10-28", "--start", "18:00", "--end", "19:00",
            "--repeat", "daily", "--json",
        ],
    );
    assert_success(&output);
    let created: Vec<serde_json::Value> = serde_json::from_str(&stdout(&output)).unwrap();
    let seed_id = created[0]["id"].as_str().unwrap().to_string();
    let first_id = format!("{seed_id}-1");
    let second_id = format!("{seed_id}-2");

    let output = kal(temp.path(), &["edit", &first_id, "--start", "07:00", "--end", "08:00"]);
    assert_success(&output);
    assert!(stdout(&output).contains("Detached from its series"));

    let output = kal(temp.path(), &["delete", &second_id]);
    assert_success(&output);

    let events = list_json(temp.path());
    assert_eq!(events.len(), 2);
    let edited = events.iter().find(|e| e["id"] == first_id.as_str()).unwrap();
    assert_eq!(edited["startTime"], "07:00");
    assert!(edited.get("originalId").is_none());
    assert_eq!(edited["repeat"]["type"], "none");

    let missing = kal(temp.path(), &["delete", &second_id]);
    assert!(!missing.status.success());
}

#[test]
fn test_invalid_input_is_rejected() {
    let temp = TempDir::new().unwrap();

    let inverted = kal(
        temp.path(),
        &["add", "--title", "Oops", "--date", "2025-10-15", "--start", "11:00", "--end", "10:00"],
    );
    assert!(!inverted.status.success());

    let bad_time = kal(
        temp.path(),
        &["add", "--title", "Oops", "--date", "2025-10-15", "--start", "9:00", "--end", "10:00"],
    );
    assert!(!bad_time.status.success());

    let zero_interval = kal(
        temp.path(),
        &[
            "add", "--title", "Oops", "--date", "2025-10-15", "--start", "09:00", "--end", "10:00",
            "--repeat", "weekly", "--interval", "0",
        ],
    );
    assert!(!zero_interval.status.success());

    assert!(list_json(temp.path()).is_empty());
}

#[test]
fn test_upcoming_reports_due_reminder() {
    let temp = TempDir::new().unwrap();

    let output = kal(
        temp.path(),
        &[
            "add", "--title", "Dentist", "--date", "2025-10-16", "--start", "09:00", "--end",
            "10:00", "--notify", "60",
        ],
    );
    assert_success(&output);

    let output = kal(temp.path(), &["upcoming", "--at", "2025-10-16T08:30"]);
    assert_success(&output);
    assert!(stdout(&output).contains("Dentist starts in 60 minutes"));

    let output = kal(temp.path(), &["upcoming", "--at", "2025-10-16T07:30"]);
    assert_success(&output);
    assert!(stdout(&output).contains("No reminders due."));
}
