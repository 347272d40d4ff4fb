//! End-to-end tests for vocabulary reconciliation

use super::*;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::tempdir;

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// Helper to create an engine over a scratch settings directory
fn test_engine() -> (VocabularyEngine, Arc<RecordingNotifier>, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let config = SettingsConfig {
        user_dir: dir.path().to_path_buf(),
        settings_directory: PathBuf::from("settings"),
        watch_files: false,
    };
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = VocabularyEngine::with_notifier(config, notifier.clone());
    (engine, notifier, dir)
}

fn defaults(entries: &[(&str, &str)]) -> DefaultTables {
    let mut tables = DefaultTables::new();
    tables.insert(
        "action".to_string(),
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    );
    tables
}

fn write_settings(engine: &VocabularyEngine, file_id: &str, contents: &str) -> PathBuf {
    let path = engine.config().file_path(file_id);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_empty_file_gets_header_and_defaults() {
    let (engine, _, _dir) = test_engine();
    let path = write_settings(&engine, "actions", "");

    let reconciled = engine.reconcile(
        "actions",
        defaults(&[("copy", "copyToClipboard")]),
        ReconcileOptions::default(),
    );

    let table = reconciled.table();
    assert_eq!(table.lookup("action", "copy"), Lookup::Found("copyToClipboard"));
    assert_eq!(table.len(), 1);
    assert!(reconciled.report.created);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Spoken form, Identifier\ncopy, copyToClipboard\n"
    );
}

#[test]
fn test_missing_file_and_directory_are_created() {
    let (engine, _, _dir) = test_engine();
    let reconciled = engine.reconcile(
        "experimental/actions_custom",
        BuiltinGroup::CustomActions.defaults(),
        BuiltinGroup::CustomActions.options(),
    );
    let path = engine.config().file_path("experimental/actions_custom");
    assert!(path.exists());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Spoken form, Command identifier\n"
    );
    assert!(reconciled.table().list(lists::CUSTOM_ACTION).is_some());
}

#[test]
fn test_duplicate_identifier_keeps_first_row() {
    let (engine, notifier, _dir) = test_engine();
    let contents = "Spoken form, Identifier\ncopy, copyToClipboard\ncut, copyToClipboard\n";
    let path = write_settings(&engine, "actions", contents);

    let reconciled = engine.reconcile(
        "actions",
        defaults(&[("copy", "copyToClipboard")]),
        ReconcileOptions::default(),
    );

    assert_eq!(reconciled.report.diagnostics.len(), 1);
    assert_eq!(
        reconciled.report.diagnostics[0].issue,
        CsvIssue::DuplicateIdentifier("copyToClipboard".to_string())
    );
    assert_eq!(reconciled.report.diagnostics[0].line, 3);
    let table = reconciled.table();
    assert_eq!(table.lookup("action", "copy"), Lookup::Found("copyToClipboard"));
    assert!(!table.lookup("action", "cut").is_found());
    assert_eq!(notifier.messages.lock().len(), 1);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), contents);
}

#[test]
fn test_override_on_builtin_spoken_form_is_stable() {
    let (engine, notifier, _dir) = test_engine();
    let contents = "Spoken form, Identifier\ntake, remove\n";
    let path = write_settings(&engine, "actions", contents);

    for pass in 1..=3 {
        let reconciled = engine.reconcile(
            "actions",
            defaults(&[("chuck", "remove"), ("take", "setSelection")]),
            ReconcileOptions::default(),
        );
        assert!(!reconciled.report.has_errors(), "pass {pass} reported errors");
        assert!(!reconciled.report.wrote_file(), "pass {pass} wrote the file");
        let table = reconciled.table();
        assert_eq!(table.lookup("action", "take"), Lookup::Found("remove"));
        assert!(!table.lookup("action", "chuck").is_found());
        assert!(table.spoken_forms_for("setSelection").is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), contents);
    }
    assert!(notifier.messages.lock().is_empty());
}

#[test]
fn test_duplicate_spoken_form_keeps_first_row() {
    let (engine, _, _dir) = test_engine();
    let contents = "Spoken form, Identifier\ntake, remove\ntake, setSelection\n";
    let path = write_settings(&engine, "actions", contents);

    let reconciled = engine.reconcile(
        "actions",
        defaults(&[("chuck", "remove"), ("take", "setSelection")]),
        ReconcileOptions::default(),
    );

    assert_eq!(reconciled.report.diagnostics.len(), 1);
    assert_eq!(
        reconciled.report.diagnostics[0].issue,
        CsvIssue::DuplicateSpokenForm("take".to_string())
    );
    assert_eq!(reconciled.report.diagnostics[0].line, 3);
    assert_eq!(reconciled.table().lookup("action", "take"), Lookup::Found("remove"));
    assert!(reconciled.report.appended.is_empty());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), contents);
}

#[test]
fn test_new_builtins_are_appended_verbatim() {
    let (engine, notifier, _dir) = test_engine();
    let original = "Spoken form, Identifier\n# my favourite\ndup, copyToClipboard\n";
    let path = write_settings(&engine, "actions", original);

    let reconciled = engine.reconcile(
        "actions",
        defaults(&[("copy", "copyToClipboard"), ("chuck", "remove"), ("take", "setSelection")]),
        ReconcileOptions::default(),
    );

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with(original));
    let appended = &contents[original.len()..];
    let lines: Vec<&str> = appended.lines().collect();
    assert_eq!(lines[0], "");
    assert_eq!(lines[1], "");
    assert!(lines[2].starts_with("# "));
    assert!(lines[2].ends_with(" - New entries automatically added by spokenform"));
    assert_eq!(&lines[3..], &["chuck, remove", "take, setSelection"]);

    assert_eq!(reconciled.report.appended.len(), 2);
    assert_eq!(
        reconciled.table().lookup("action", "dup"),
        Lookup::Found("copyToClipboard")
    );
    assert_eq!(notifier.messages.lock().len(), 1);
}

#[test]
fn test_errors_suppress_append() {
    let (engine, notifier, _dir) = test_engine();
    let original = "Spoken form, Identifier\nbogus row without separator\n";
    let path = write_settings(&engine, "actions", original);

    let reconciled = engine.reconcile(
        "actions",
        defaults(&[("copy", "copyToClipboard")]),
        ReconcileOptions::default(),
    );

    assert!(reconciled.report.has_errors());
    assert!(reconciled.report.appended.is_empty());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    // Rejected rows fall back to the built-in default
    assert_eq!(
        reconciled.table().lookup("action", "copy"),
        Lookup::Found("copyToClipboard")
    );
    assert_eq!(notifier.messages.lock().len(), 1);
}

#[test]
fn test_no_update_file_never_writes() {
    let (engine, _, _dir) = test_engine();
    let options = ReconcileOptions {
        no_update_file: true,
        ..Default::default()
    };
    let reconciled = engine.reconcile("actions", defaults(&[("copy", "copyToClipboard")]), options);
    assert!(!reconciled.report.wrote_file());
    assert!(!engine.config().file_path("actions").exists());
    assert_eq!(reconciled.table().len(), 1);
}

#[test]
fn test_comment_only_file_gets_header_in_appended_block() {
    let (engine, _, _dir) = test_engine();
    let path = write_settings(&engine, "actions", "# notes to self\n");

    let first = engine.reconcile(
        "actions",
        defaults(&[("copy", "copyToClipboard")]),
        ReconcileOptions::default(),
    );
    assert_eq!(first.report.appended.len(), 1);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("\nSpoken form, Identifier\ncopy, copyToClipboard"));

    let second = engine.reconcile(
        "actions",
        defaults(&[("copy", "copyToClipboard")]),
        ReconcileOptions::default(),
    );
    assert!(!second.report.has_errors());
    assert!(!second.report.wrote_file());
}

#[test]
fn test_reconcile_is_idempotent() {
    let (engine, _, _dir) = test_engine();
    let group = BuiltinGroup::ScopeTypes;
    let first = engine.reconcile(group.file_id(), group.defaults(), group.options());
    let written = std::fs::read_to_string(engine.config().file_path(group.file_id())).unwrap();

    let second = engine.reconcile(group.file_id(), group.defaults(), group.options());
    assert_eq!(*first.table(), *second.table());
    assert!(!second.report.wrote_file());
    assert_eq!(
        std::fs::read_to_string(engine.config().file_path(group.file_id())).unwrap(),
        written
    );
    assert_eq!(
        second.table().lookup(lists::SCOPE_TYPE_PLURAL, "funks"),
        Lookup::Found("namedFunction")
    );
}

#[test]
fn test_refresh_after_delete_returns_defaults() {
    let (engine, _, _dir) = test_engine();
    let path = write_settings(
        &engine,
        "actions",
        "Spoken form, Identifier\nduplicate, copyToClipboard\n",
    );
    let reconciler = FileReconciler::new(
        path.clone(),
        defaults(&[("copy", "copyToClipboard")]),
        ReconcileOptions::default(),
        Arc::new(LogNotifier),
    );
    let (table, _) = reconciler.refresh();
    assert!(table.lookup("action", "duplicate").is_found());

    std::fs::remove_file(&path).unwrap();
    let (table, report) = reconciler.refresh();
    assert!(table.lookup("action", "copy").is_found());
    assert!(!report.wrote_file());
    assert!(!path.exists());
}

#[test]
fn test_refresh_appends_missing_builtins_once() {
    let (engine, _, _dir) = test_engine();
    let original = "Spoken form, Identifier\nchuck, remove\n";
    let path = write_settings(&engine, "actions", original);
    let reconciler = FileReconciler::new(
        path.clone(),
        defaults(&[("chuck", "remove"), ("take", "setSelection")]),
        ReconcileOptions::default(),
        Arc::new(LogNotifier),
    );

    let (table, report) = reconciler.refresh();
    assert_eq!(report.appended.len(), 1);
    assert_eq!(table.lookup("action", "take"), Lookup::Found("setSelection"));
    let appended = std::fs::read_to_string(&path).unwrap();
    assert!(appended.starts_with(original));
    assert!(appended.ends_with("\ntake, setSelection"));

    // The pass raised by the append itself finds nothing to add
    let (_, report) = reconciler.refresh();
    assert!(!report.wrote_file());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), appended);
}

#[test]
fn test_unwritable_settings_dir_still_publishes() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("settings");
    std::fs::write(&blocker, "not a directory").unwrap();
    let engine = VocabularyEngine::new(SettingsConfig {
        user_dir: dir.path().to_path_buf(),
        settings_directory: PathBuf::from("settings"),
        watch_files: false,
    });

    let reconciled = engine.reconcile(
        "actions",
        defaults(&[("copy", "copyToClipboard")]),
        ReconcileOptions::default(),
    );
    assert!(!reconciled.report.io_errors.is_empty());
    assert_eq!(
        reconciled.table().lookup("action", "copy"),
        Lookup::Found("copyToClipboard")
    );
}

#[test]
fn test_hat_styles_ignore_disabled_styles() {
    let (engine, _, _dir) = test_engine();
    let group = BuiltinGroup::HatStyles;
    engine.reconcile(group.file_id(), group.defaults(), group.options());
    let path = engine.config().file_path(group.file_id());
    let edited = std::fs::read_to_string(&path)
        .unwrap()
        .replace("navy, userColor1", "-navy, userColor1");
    std::fs::write(&path, edited).unwrap();

    let reconciled = engine.reconcile(group.file_id(), group.defaults(), group.options());
    assert!(!reconciled.report.has_errors());
    assert!(reconciled.table().spoken_forms_for("userColor1").is_empty());
    assert!(reconciled.table().lookup(lists::HAT_COLOR, "blue").is_found());
}

#[test]
fn test_all_builtin_groups_reconcile_cleanly() {
    let (engine, _, _dir) = test_engine();
    let groups = reconcile_builtin_groups(&engine);
    assert_eq!(groups.len(), BuiltinGroup::ALL.len());
    for (group, reconciled) in groups {
        assert!(!reconciled.report.has_errors(), "{group} has errors");
        assert!(reconciled.report.created, "{group} was not created");
    }
}
