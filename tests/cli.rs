//! Binary tests for the audit log inspector

use std::sync::Arc;

use assert_cmd::Command;
use change_audit::audit::{Auditor, JsonlAuditStore, LifecycleEvent, TrackedEntity};
use predicates::prelude::*;
use tempfile::TempDir;

fn seeded_dir() -> (TempDir, String) {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(JsonlAuditStore::new(temp.path().join("audits.jsonl")));
    let auditor = Auditor::new(store);

    let mut person = TrackedEntity::new("people", "1").with("name", "A").with("age", 1);
    auditor.observe(&mut person, LifecycleEvent::Created).unwrap();

    person.sync_original();
    person.set("age", 2);
    let updated = auditor.observe(&mut person, LifecycleEvent::Updated).unwrap();

    let mut order = TrackedEntity::new("orders", "9").with("status", "open");
    auditor.observe(&mut order, LifecycleEvent::Created).unwrap();

    let id = updated.record().unwrap().id.to_string();
    (temp, id)
}

fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("change-audit").unwrap();
    cmd.env_remove("RUST_LOG").arg("--data-dir").arg(dir.path());
    cmd
}

#[test]
fn list_shows_all_records() {
    let (dir, _) = seeded_dir();
    cmd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("people#1"))
        .stdout(predicate::str::contains("orders#9"))
        .stdout(predicate::str::contains("3 record(s)"));
}

#[test]
fn list_filters_by_type_and_event() {
    let (dir, _) = seeded_dir();
    cmd(&dir)
        .args(["list", "--type", "people", "--event", "updated"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 record(s)"))
        .stdout(predicate::str::contains("orders#9").not());
}

#[test]
fn list_rejects_unknown_event() {
    let (dir, _) = seeded_dir();
    cmd(&dir)
        .args(["list", "--event", "archived"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("archived"));
}

#[test]
fn show_prints_the_diff() {
    let (dir, id) = seeded_dir();
    cmd(&dir)
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("UPDATED"))
        .stdout(predicate::str::contains("age: 1 -> 2"));
}

#[test]
fn show_unknown_id_fails() {
    let (dir, _) = seeded_dir();
    cmd(&dir)
        .args(["show", "aud-00000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Audit not found"));
}

#[test]
fn empty_log_lists_nothing() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No audit records found."));
}

#[test]
fn config_reports_paths() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("audits.jsonl"))
        .stdout(predicate::str::contains("Audit in console: true"));
}
