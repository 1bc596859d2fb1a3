//! CLI smoke tests for the notewidget binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use notewidget::storage::{Database, NoteRecord, SchemaModel};

struct Env {
    tmp: TempDir,
}

impl Env {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let config = format!(
            r#"
[storage]
legacy_path = "{0}/notes.db"
shared_path = "{0}/shared/notes.db"
schema_path = "{0}/notes.sql"

[widget]
sort_mode = "alphabetical"
"#,
            tmp.path().display()
        );
        fs::write(tmp.path().join("config.toml"), config).unwrap();
        fs::write(
            tmp.path().join("notes.sql"),
            SchemaModel::embedded().sql(),
        )
        .unwrap();

        let db = Database::open(tmp.path().join("notes.db"), &SchemaModel::embedded()).unwrap();
        for (key, content) in [("a1", "Apples\ngala, fuji"), ("b2", "Bread recipe")] {
            db.upsert_note(&NoteRecord::new(key, content)).unwrap();
        }
        db.set_note_tags("a1", &["groceries".to_string()]).unwrap();

        Self { tmp }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("notewidget").unwrap();
        cmd.arg("--quiet")
            .arg("--config")
            .arg(self.tmp.path().join("config.toml"));
        cmd
    }

    fn shared_db(&self) -> std::path::PathBuf {
        self.tmp.path().join("shared/notes.db")
    }
}

#[test]
fn migrate_then_list_reads_the_shared_store() {
    let env = Env::new();

    env.cmd().arg("migrate").assert().success();
    assert!(env.shared_db().exists());

    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("a1\tApples"))
        .stdout(predicate::str::contains("b2\tBread recipe"));
}

#[test]
fn migrate_is_safe_to_repeat() {
    let env = Env::new();
    env.cmd().arg("migrate").assert().success();
    env.cmd().arg("migrate").assert().success();
}

#[test]
fn forced_migrate_onto_existing_shared_fails() {
    let env = Env::new();
    env.cmd().arg("migrate").assert().success();

    env.cmd()
        .arg("migrate")
        .arg("--force")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn list_filters_by_tag_and_honors_limit() {
    let env = Env::new();

    env.cmd()
        .args(["list", "--tag", "groceries"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a1"))
        .stdout(predicate::str::contains("b2").not());

    let output = env
        .cmd()
        .args(["list", "--limit", "1"])
        .output()
        .unwrap();
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 1);
}

#[test]
fn list_json_emits_parseable_records() {
    let env = Env::new();

    let output = env.cmd().args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());
    let notes: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(notes.as_array().unwrap().len(), 2);
    assert_eq!(notes[0]["key"], "a1");
}

#[test]
fn show_prints_content_and_errors_on_missing_key() {
    let env = Env::new();

    env.cmd()
        .args(["show", "a1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gala, fuji"));

    env.cmd()
        .args(["show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));
}

#[test]
fn tags_lists_tag_names() {
    let env = Env::new();

    env.cmd()
        .arg("tags")
        .assert()
        .success()
        .stdout(predicate::str::contains("groceries"));
}
