//! Vocabulary Reconciliation Engine
//!
//! Owns one published [`IdentifierTable`] per override file. The initial pass
//! may create the file; every pass over an existing file appends built-ins it
//! does not mention yet. Passes triggered by the directory watch never create
//! a deleted file again.

use crate::config::SettingsConfig;
use crate::merge::{default_identifiers, merge_tables, missing_defaults, super_defaults, ReconcileOptions};
use crate::override_file::{
    append_block, parse_override_file, render_appended_block, write_new_file, CsvDiagnostic,
    OverrideFile, OverrideRow, RowRules,
};
use crate::table::{DefaultTables, IdentifierTable, SpokenFormMap};
use crate::watch::{watch_file, Subscription};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Notification seam
// ============================================================================

/// User-facing notifications, raised at most once per kind per pass.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Forwards notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!(notification = true, "{message}");
    }
}

// ============================================================================
// Published tables
// ============================================================================

struct HandleInner {
    table: RwLock<Arc<IdentifierTable>>,
    generation: AtomicU64,
}

/// Shared, atomically republished view of one file's merged table.
///
/// Readers take a [`snapshot`](Self::snapshot) and keep using it; a
/// republication swaps the whole table and never touches a live snapshot.
#[derive(Clone)]
pub struct VocabularyHandle {
    inner: Arc<HandleInner>,
}

impl std::fmt::Debug for VocabularyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VocabularyHandle")
            .field("generation", &self.generation())
            .field("entries", &self.snapshot().len())
            .finish()
    }
}

impl VocabularyHandle {
    pub fn new(table: IdentifierTable) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                table: RwLock::new(Arc::new(table)),
                generation: AtomicU64::new(1),
            }),
        }
    }

    pub fn snapshot(&self) -> Arc<IdentifierTable> {
        Arc::clone(&self.inner.table.read())
    }

    /// Number of tables published so far, starting at 1.
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    pub fn publish(&self, table: IdentifierTable) {
        *self.inner.table.write() = Arc::new(table);
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// One reconciliation pass
// ============================================================================

/// What a reconciliation pass found and did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub path: PathBuf,
    pub diagnostics: Vec<CsvDiagnostic>,
    /// Rows appended to the file for newly introduced built-ins
    pub appended: SpokenFormMap,
    /// The file was written from scratch
    pub created: bool,
    pub io_errors: Vec<String>,
}

impl ReconcileReport {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            ..Default::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn wrote_file(&self) -> bool {
        self.created || !self.appended.is_empty()
    }

    fn io_error(&mut self, action: &str, err: &std::io::Error) {
        tracing::error!(path = %self.path.display(), error = %err, "failed to {action}");
        self.io_errors.push(format!("failed to {action} {}: {err}", self.path.display()));
    }
}

/// Everything needed to reconcile one override file, shared with its watch.
pub struct FileReconciler {
    path: PathBuf,
    defaults: DefaultTables,
    options: ReconcileOptions,
    known_identifiers: BTreeSet<String>,
    notifier: Arc<dyn Notifier>,
}

impl FileReconciler {
    pub fn new(
        path: PathBuf,
        defaults: DefaultTables,
        options: ReconcileOptions,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let known_identifiers = default_identifiers(&defaults);
        Self {
            path,
            defaults,
            options,
            known_identifiers,
            notifier,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, contents: &str) -> OverrideFile {
        let rules = RowRules {
            known_identifiers: &self.known_identifiers,
            extra_ignored_values: &self.options.extra_ignored_values,
            allow_unknown: self.options.unknown_values.allowed(),
        };
        let file = parse_override_file(&self.path, contents, &self.options.headers, &rules);
        for diagnostic in &file.diagnostics {
            tracing::error!("{diagnostic}");
        }
        if file.has_errors() {
            self.notifier.notify(&format!(
                "Spoken form settings error in {}; see log",
                self.path.display()
            ));
        }
        file
    }

    /// `None` when the file is absent or blank.
    fn read(&self, report: &mut ReconcileReport) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => None,
            Ok(contents) => Some(contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                report.io_error("read", &err);
                None
            }
        }
    }

    /// Initial pass: read, validate, persist new built-ins, merge.
    pub fn load(&self) -> (IdentifierTable, ReconcileReport) {
        let mut report = ReconcileReport::new(&self.path);

        if let Some(parent) = self.path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                report.io_error("create settings directory for", &err);
            }
        }

        let rows = match self.read(&mut report) {
            Some(contents) => self.reconcile_contents(&contents, &mut report),
            None => {
                let defaults = super_defaults(&self.defaults);
                if !self.options.no_update_file && report.io_errors.is_empty() {
                    match write_new_file(&self.path, &self.options.headers, &defaults) {
                        Ok(()) => {
                            report.created = true;
                            tracing::info!(path = %self.path.display(), entries = defaults.len(), "created override file");
                        }
                        Err(err) => report.io_error("write", &err),
                    }
                }
                Vec::new()
            }
        };

        (merge_tables(&self.defaults, &rows, &self.options), report)
    }

    /// Watch-triggered pass: read, validate, append missing built-ins, merge.
    ///
    /// The append raises one more watch event; the pass it triggers finds
    /// nothing missing and leaves the file alone. A deleted file is not
    /// recreated.
    pub fn refresh(&self) -> (IdentifierTable, ReconcileReport) {
        let mut report = ReconcileReport::new(&self.path);
        let rows = match self.read(&mut report) {
            Some(contents) => self.reconcile_contents(&contents, &mut report),
            None => Vec::new(),
        };
        (merge_tables(&self.defaults, &rows, &self.options), report)
    }

    fn reconcile_contents(&self, contents: &str, report: &mut ReconcileReport) -> Vec<OverrideRow> {
        let file = self.parse(contents);
        self.append_missing(&file, report);
        report.diagnostics = file.diagnostics;
        file.rows
    }

    fn append_missing(&self, file: &OverrideFile, report: &mut ReconcileReport) {
        let missing = missing_defaults(&self.defaults, &file.rows, &self.options);
        if missing.is_empty() {
            return;
        }
        if file.has_errors() || self.options.no_update_file {
            tracing::info!(
                path = %self.path.display(),
                missing = missing.len(),
                "new built-in spoken forms detected, but not updating the file; fix the errors above first"
            );
            return;
        }

        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        let header = (!file.seen_header).then_some(&self.options.headers);
        let block = render_appended_block(&missing, &timestamp, header);
        if let Err(err) = append_block(&self.path, &block) {
            report.io_error("append to", &err);
            return;
        }

        tracing::info!(path = %self.path.display(), "new built-in spoken forms added");
        for (spoken_form, identifier) in &missing {
            tracing::info!("{spoken_form}: {identifier}");
        }
        self.notifier.notify(&format!(
            "New spoken forms added to {}; see log",
            self.path.display()
        ));
        report.appended = missing;
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Result of [`VocabularyEngine::reconcile`].
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub handle: VocabularyHandle,
    pub subscription: Subscription,
    pub report: ReconcileReport,
}

impl Reconciled {
    pub fn table(&self) -> Arc<IdentifierTable> {
        self.handle.snapshot()
    }
}

pub struct VocabularyEngine {
    config: SettingsConfig,
    notifier: Arc<dyn Notifier>,
    subscriptions: Mutex<HashMap<String, Subscription>>,
}

impl VocabularyEngine {
    pub fn new(config: SettingsConfig) -> Self {
        Self::with_notifier(config, Arc::new(LogNotifier))
    }

    pub fn with_notifier(config: SettingsConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config,
            notifier,
            subscriptions: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &SettingsConfig {
        &self.config
    }

    /// Merge `defaults` with the override file for `file_id`, publish the
    /// result and (if enabled) watch the file for further edits.
    ///
    /// Any previous watch for the same `file_id` is removed first.
    pub fn reconcile(
        &self,
        file_id: &str,
        defaults: DefaultTables,
        options: ReconcileOptions,
    ) -> Reconciled {
        self.unsubscribe(file_id);

        let path = self.config.file_path(file_id);
        let reconciler = Arc::new(FileReconciler::new(
            path.clone(),
            defaults,
            options,
            Arc::clone(&self.notifier),
        ));
        let (table, report) = reconciler.load();
        let handle = VocabularyHandle::new(table);

        let subscription = if self.config.watch_files {
            let watched = Arc::clone(&reconciler);
            let published = handle.clone();
            match watch_file(&path, move || {
                let (table, report) = watched.refresh();
                published.publish(table);
                tracing::info!(
                    path = %report.path.display(),
                    generation = published.generation(),
                    errors = report.diagnostics.len(),
                    "republished vocabulary"
                );
            }) {
                Ok(subscription) => subscription,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "could not watch override file");
                    Subscription::inactive(&path)
                }
            }
        } else {
            Subscription::inactive(&path)
        };

        self.subscriptions
            .lock()
            .insert(file_id.to_string(), subscription.clone());

        Reconciled {
            handle,
            subscription,
            report,
        }
    }

    /// Remove the watch for `file_id`. Returns whether one was active.
    pub fn unsubscribe(&self, file_id: &str) -> bool {
        let previous = self.subscriptions.lock().remove(file_id);
        previous.is_some_and(|subscription| subscription.unsubscribe())
    }

    pub fn watched_files(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .subscriptions
            .lock()
            .iter()
            .filter(|(_, subscription)| subscription.is_active())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Remove every watch this engine installed.
    pub fn shutdown(&self) {
        let subscriptions: Vec<Subscription> =
            self.subscriptions.lock().drain().map(|(_, s)| s).collect();
        for subscription in subscriptions {
            subscription.unsubscribe();
        }
    }
}

impl Drop for VocabularyEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
