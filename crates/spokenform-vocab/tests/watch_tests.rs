//! Hot-reload tests: edits on disk are republished through the handle.

use spokenform_vocab::{
    DefaultTables, Lookup, ReconcileOptions, SettingsConfig, SpokenFormMap, VocabularyEngine,
    VocabularyHandle,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn watching_engine(dir: &tempfile::TempDir) -> VocabularyEngine {
    VocabularyEngine::new(SettingsConfig {
        user_dir: dir.path().to_path_buf(),
        settings_directory: PathBuf::from("settings"),
        watch_files: true,
    })
}

fn defaults() -> DefaultTables {
    let list: SpokenFormMap = [("chuck", "remove"), ("take", "setSelection")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let mut tables = DefaultTables::new();
    tables.insert("action".to_string(), list);
    tables
}

fn wait_for(handle: &VocabularyHandle, predicate: impl Fn(&VocabularyHandle) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if predicate(handle) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    false
}

#[test]
fn test_edit_is_republished() {
    let dir = tempfile::tempdir().unwrap();
    let engine = watching_engine(&dir);
    let reconciled = engine.reconcile("actions", defaults(), ReconcileOptions::default());
    assert!(reconciled.subscription.is_active());

    let before = reconciled.table();
    let path = engine.config().file_path("actions");
    std::fs::write(&path, "Spoken form, Identifier\ndelete, remove\ntake, setSelection\n").unwrap();

    let republished = wait_for(&reconciled.handle, |handle| {
        handle.snapshot().lookup("action", "delete") == Lookup::Found("remove")
    });
    assert!(republished, "edit was never republished");
    assert!(reconciled.handle.generation() > 1);

    // The earlier snapshot is untouched
    assert_eq!(before.lookup("action", "chuck"), Lookup::Found("remove"));
    assert!(!before.lookup("action", "delete").is_found());

    engine.shutdown();
    assert!(!reconciled.subscription.is_active());
}

#[test]
fn test_edit_dropping_a_builtin_gets_it_appended() {
    let dir = tempfile::tempdir().unwrap();
    let engine = watching_engine(&dir);
    let reconciled = engine.reconcile("actions", defaults(), ReconcileOptions::default());
    let path = engine.config().file_path("actions");
    std::fs::write(&path, "Spoken form, Identifier\ndelete, remove\n").unwrap();

    let republished = wait_for(&reconciled.handle, |handle| {
        handle.snapshot().lookup("action", "delete") == Lookup::Found("remove")
    });
    assert!(republished, "edit was never republished");

    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline
        && !std::fs::read_to_string(&path).unwrap().contains("take, setSelection")
    {
        std::thread::sleep(Duration::from_millis(50));
    }
    std::thread::sleep(Duration::from_millis(500));

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("Spoken form, Identifier\ndelete, remove\n"));
    assert_eq!(contents.matches("take, setSelection").count(), 1);
    assert_eq!(contents.matches("New entries automatically added").count(), 1);
    engine.shutdown();
}

#[test]
fn test_deleted_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let engine = watching_engine(&dir);
    let path = engine.config().file_path("actions");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "Spoken form, Identifier\ndelete, remove\ntake, setSelection\n").unwrap();

    let reconciled = engine.reconcile("actions", defaults(), ReconcileOptions::default());
    assert!(reconciled.table().lookup("action", "delete").is_found());

    std::fs::remove_file(&path).unwrap();
    let reverted = wait_for(&reconciled.handle, |handle| {
        handle.snapshot().lookup("action", "chuck") == Lookup::Found("remove")
    });
    assert!(reverted, "deletion was never republished");
    assert!(!path.exists());
}

#[test]
fn test_reinitializing_replaces_previous_watch() {
    let dir = tempfile::tempdir().unwrap();
    let engine = watching_engine(&dir);

    let first = engine.reconcile("actions", defaults(), ReconcileOptions::default());
    let second = engine.reconcile("actions", defaults(), ReconcileOptions::default());

    assert!(!first.subscription.is_active());
    assert!(second.subscription.is_active());
    assert_eq!(engine.watched_files(), vec!["actions".to_string()]);

    assert!(engine.unsubscribe("actions"));
    assert!(!second.subscription.is_active());
    assert!(engine.watched_files().is_empty());
}
