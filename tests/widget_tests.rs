//! End-to-end widget query-layer tests against file-backed stores.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use notewidget::settings::StorageSettings;
use notewidget::storage::migrator::SharedStorageMigrator;
use notewidget::storage::{Database, NoteRecord, SchemaModel};
use notewidget::widget::{SortMode, TagFilter, WidgetDataController, ALL_NOTES_IDENTIFIER};
use notewidget::NwError;

fn settings_in(dir: &Path) -> StorageSettings {
    let settings = StorageSettings::new(
        dir.join("notes.db"),
        dir.join("shared").join("notes.db"),
        dir.join("notes.sql"),
    );
    fs::write(settings.schema(), SchemaModel::embedded().sql()).unwrap();
    settings
}

fn seed(settings: &StorageSettings) {
    let db = Database::open(settings.legacy_db(), &SchemaModel::embedded()).unwrap();
    for (key, content, modified) in [
        ("grocery", "Groceries\nmilk, eggs", "2024-03-01T00:00:00Z"),
        ("standup", "Standup notes", "2024-02-01T00:00:00Z"),
        ("draft", "Blog draft", "2024-01-01T00:00:00Z"),
    ] {
        let mut note = NoteRecord::new(key, content);
        note.modification_date = modified.to_string();
        db.upsert_note(&note).unwrap();
    }
    db.set_note_tags("grocery", &["home".to_string()]).unwrap();
    db.set_note_tags("standup", &["work".to_string()]).unwrap();
    db.mark_deleted("draft").unwrap();
}

#[test]
fn controller_opens_the_shared_store_once_migration_has_happened() {
    let tmp = TempDir::new().unwrap();
    let settings = settings_in(tmp.path());
    seed(&settings);

    SharedStorageMigrator::new(settings.clone()).perform_migration_if_needed();

    // A note written to the legacy store after migration is invisible:
    // the controller reads the shared copy.
    let legacy = Database::open(settings.legacy_db(), &SchemaModel::embedded()).unwrap();
    legacy
        .upsert_note(&NoteRecord::new("post-migration", "too late"))
        .unwrap();

    let controller = WidgetDataController::open(&settings, SortMode::ModifiedNewest).unwrap();
    let notes = controller.notes(&TagFilter::AllNotes, 0).unwrap();
    assert_eq!(notes.len(), 2);
    assert!(controller.note_for_key("post-migration").unwrap().is_none());
}

#[test]
fn filters_sort_and_limit_compose_through_open() {
    let tmp = TempDir::new().unwrap();
    let settings = settings_in(tmp.path());
    seed(&settings);

    let controller = WidgetDataController::open(&settings, SortMode::ModifiedNewest).unwrap();

    let all = controller.notes(&TagFilter::AllNotes, 0).unwrap();
    assert_eq!(
        all.iter().map(|n| n.key.as_str()).collect::<Vec<_>>(),
        vec!["grocery", "standup"]
    );

    let work = controller
        .notes(&TagFilter::from_identifier("work"), 0)
        .unwrap();
    assert_eq!(work.len(), 1);
    assert_eq!(work[0].key, "standup");

    let capped = controller
        .notes(&TagFilter::from_identifier(ALL_NOTES_IDENTIFIER), 1)
        .unwrap();
    assert_eq!(capped.len(), 1);
    assert_eq!(capped[0].key, "grocery");

    let first = controller.first_note().unwrap().unwrap();
    assert_eq!(first.key, "grocery");
    assert_eq!(controller.tags().unwrap(), vec!["home", "work"]);
}

#[test]
fn open_fails_when_no_store_exists_at_either_location() {
    let tmp = TempDir::new().unwrap();
    let settings = StorageSettings::new(
        tmp.path().join("notes.db"),
        tmp.path().join("shared/notes.db"),
        tmp.path().join("notes.sql"),
    );

    let err = WidgetDataController::open(&settings, SortMode::default()).unwrap_err();
    assert!(matches!(err, NwError::Config(_)));
}
