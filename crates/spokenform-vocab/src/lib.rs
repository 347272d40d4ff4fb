//! Spokenform Vocabulary Layer
//!
//! Merges built-in spoken forms with user overrides kept in plain text files:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  VOCABULARY RECONCILIATION                          │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │  ┌───────────┐     ┌───────────────┐     ┌──────────────────┐      │
//! │  │ built-in  │────►│               │────►│ IdentifierTable  │      │
//! │  │ catalog   │     │  Vocabulary   │     │ (published Arc)  │      │
//! │  └───────────┘     │    Engine     │     └──────────────────┘      │
//! │                    │               │              ▲                 │
//! │  ┌───────────┐     │               │              │ republish       │
//! │  │ override  │◄───►│               │     ┌──────────────────┐      │
//! │  │ file.csv  │     └───────────────┘     │  directory watch │      │
//! │  └───────────┘            ▲              └──────────────────┘      │
//! │        │                  └──────────── edits ─────┘                │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Features
//!
//! - **Best-effort parsing**: bad rows become diagnostics, never failures
//! - **Append-only persistence**: new built-ins are appended under a
//!   timestamped comment; user rows are never rewritten or reordered
//! - **Atomic publication**: readers hold `Arc` snapshots that a republication
//!   replaces wholesale
//! - **Hot reload**: file edits are picked up through a directory watch

pub mod catalog;
pub mod config;
pub mod engine;
pub mod inflection;
pub mod merge;
pub mod override_file;
pub mod table;
pub mod watch;

#[cfg(test)]
mod tests;

pub use catalog::{lists, BuiltinGroup, UnknownGroup};
pub use config::{ConfigError, SettingsConfig};
pub use engine::{
    FileReconciler, LogNotifier, Notifier, ReconcileReport, Reconciled, VocabularyEngine,
    VocabularyHandle,
};
pub use inflection::pluralize;
pub use merge::{ReconcileOptions, SpokenFormMigration, UnknownValues};
pub use override_file::{CsvDiagnostic, CsvIssue, Headers, OverrideRow};
pub use table::{DefaultTables, IdentifierTable, Lookup, SpokenFormMap};
pub use watch::Subscription;

/// Reconcile every built-in group and return the handles by group.
pub fn reconcile_builtin_groups(
    engine: &VocabularyEngine,
) -> Vec<(BuiltinGroup, Reconciled)> {
    BuiltinGroup::ALL
        .into_iter()
        .map(|group| {
            let reconciled = engine.reconcile(group.file_id(), group.defaults(), group.options());
            (group, reconciled)
        })
        .collect()
}
