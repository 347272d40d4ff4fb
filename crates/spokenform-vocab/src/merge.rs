//! Merging built-in defaults with user overrides.
//!
//! ```text
//!   defaults {list: {spoken: id}}        override rows [(spoken, id)]
//!              │                                   │
//!              ▼                                   ▼
//!   by identifier {id: (spoken, list)} ◄── replace spoken form per id
//!              │
//!              ▼  re-key, drop disabled, split alternatives, migrate
//!   IdentifierTable {list: {spoken: id}}  (+ `{list}_plural` lists)
//! ```
//!
//! A spoken form claimed by a file row always beats the built-in spoken form
//! of an identifier the file never mentions; the shadowed built-in is neither
//! published nor appended back to the file.

use crate::inflection::pluralize;
use crate::override_file::{spoken_alternatives, Headers, OverrideRow};
use crate::table::{DefaultTables, IdentifierTable, SpokenFormMap};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Identifier the `paste to` rename migration applies to.
pub const PASTE_FROM_CLIPBOARD: &str = "pasteFromClipboard";

/// What to do with a row whose identifier is not a known default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum UnknownValues {
    /// Report the row and drop it
    #[default]
    Reject,
    /// Accept the row into the named catch-all list
    Allow { list: String },
}

impl UnknownValues {
    pub fn allowed(&self) -> bool {
        matches!(self, UnknownValues::Allow { .. })
    }
}

/// Spoken-form correction applied while re-keying, for identifiers whose
/// spoken form changed shape in an earlier release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpokenFormMigration {
    pub name: String,
    pub identifier: String,
    /// Suffix stripped from legacy spoken forms of `identifier`
    pub legacy_suffix: String,
}

impl SpokenFormMigration {
    /// `paste to` became `paste`; `to` is now spoken as a destination.
    pub fn paste_to_destination() -> Self {
        Self {
            name: "paste-to-destination".to_string(),
            identifier: PASTE_FROM_CLIPBOARD.to_string(),
            legacy_suffix: " to".to_string(),
        }
    }

    fn apply<'a>(&self, identifier: &str, spoken_form: &'a str) -> &'a str {
        if identifier == self.identifier {
            spoken_form
                .strip_suffix(self.legacy_suffix.as_str())
                .unwrap_or(spoken_form)
        } else {
            spoken_form
        }
    }
}

pub fn default_migrations() -> Vec<SpokenFormMigration> {
    vec![SpokenFormMigration::paste_to_destination()]
}

/// Per-file reconciliation options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// Identifiers accepted in the file but never published
    pub extra_ignored_values: Vec<String>,
    pub unknown_values: UnknownValues,
    pub headers: Headers,
    /// Lists that also get a `{list}_plural` companion
    pub pluralize_lists: Vec<String>,
    /// Never write to the override file
    pub no_update_file: bool,
    pub migrations: Vec<SpokenFormMigration>,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            extra_ignored_values: Vec::new(),
            unknown_values: UnknownValues::Reject,
            headers: Headers::default(),
            pluralize_lists: Vec::new(),
            no_update_file: false,
            migrations: default_migrations(),
        }
    }
}

/// Union of all lists of `defaults`: spoken form → identifier.
pub fn super_defaults(defaults: &DefaultTables) -> SpokenFormMap {
    defaults
        .values()
        .flat_map(|list| list.iter())
        .map(|(spoken, id)| (spoken.clone(), id.clone()))
        .collect()
}

pub fn default_identifiers(defaults: &DefaultTables) -> BTreeSet<String> {
    defaults
        .values()
        .flat_map(|list| list.values().cloned())
        .collect()
}

/// Spoken forms taken by rows that publish something.
fn claimed_spoken_forms<'a>(rows: &'a [OverrideRow], options: &ReconcileOptions) -> HashSet<&'a str> {
    rows.iter()
        .filter(|row| !options.extra_ignored_values.contains(&row.identifier))
        .flat_map(OverrideRow::alternatives)
        .collect()
}

/// Default entries whose identifier the file does not mention, minus those
/// whose spoken form a file row already claims.
pub fn missing_defaults(
    defaults: &DefaultTables,
    rows: &[OverrideRow],
    options: &ReconcileOptions,
) -> SpokenFormMap {
    let present: HashSet<&str> = rows.iter().map(|row| row.identifier.as_str()).collect();
    let claimed = claimed_spoken_forms(rows, options);

    let mut missing = SpokenFormMap::new();
    for (spoken_form, identifier) in super_defaults(defaults) {
        if present.contains(identifier.as_str()) {
            continue;
        }
        if spoken_alternatives(&spoken_form).any(|alternative| claimed.contains(alternative)) {
            tracing::warn!(
                spoken_form = %spoken_form,
                identifier = %identifier,
                "built-in spoken form is taken by another row; not adding it"
            );
            continue;
        }
        missing.insert(spoken_form, identifier);
    }
    missing
}

struct Entry<'a> {
    spoken_form: &'a str,
    list: &'a str,
    /// Spoken form comes from a file row
    overridden: bool,
}

fn published_alternatives<'a>(
    identifier: &str,
    spoken_form: &'a str,
    options: &ReconcileOptions,
) -> Vec<&'a str> {
    spoken_alternatives(spoken_form)
        .map(|alternative| {
            options
                .migrations
                .iter()
                .fold(alternative, |spoken, migration| migration.apply(identifier, spoken))
                .trim()
        })
        .filter(|alternative| !alternative.is_empty())
        .collect()
}

/// Build the published table from defaults and the accepted file rows.
///
/// When two rows name the same identifier the first one wins.
pub fn merge_tables(
    defaults: &DefaultTables,
    rows: &[OverrideRow],
    options: &ReconcileOptions,
) -> IdentifierTable {
    let mut by_identifier: BTreeMap<&str, Entry<'_>> = BTreeMap::new();
    for (list, entries) in defaults {
        for (spoken_form, identifier) in entries {
            by_identifier.insert(
                identifier,
                Entry {
                    spoken_form,
                    list,
                    overridden: false,
                },
            );
        }
    }

    for row in rows {
        let (spoken_form, identifier) = (row.spoken_form.as_str(), row.identifier.as_str());
        if let Some(entry) = by_identifier.get_mut(identifier) {
            if !entry.overridden {
                entry.spoken_form = spoken_form;
                entry.overridden = true;
            }
            continue;
        }
        if options.extra_ignored_values.contains(&row.identifier) {
            continue;
        }
        if let UnknownValues::Allow { list } = &options.unknown_values {
            by_identifier.insert(
                identifier,
                Entry {
                    spoken_form,
                    list,
                    overridden: true,
                },
            );
        }
    }

    let mut table = IdentifierTable::new();
    for list in defaults.keys() {
        table.ensure_list(list);
    }
    if let UnknownValues::Allow { list } = &options.unknown_values {
        table.ensure_list(list);
    }

    // File rows claim their spoken forms before any untouched default
    let (overridden, untouched): (Vec<_>, Vec<_>) =
        by_identifier.iter().partition(|(_, entry)| entry.overridden);
    let mut claimed: HashSet<&str> = HashSet::new();
    for (identifier, entry) in overridden.into_iter().chain(untouched) {
        for alternative in published_alternatives(identifier, entry.spoken_form, options) {
            let free = if entry.overridden {
                claimed.insert(alternative)
            } else {
                !claimed.contains(alternative)
            };
            if free {
                table.insert(entry.list, alternative, identifier);
            } else {
                tracing::debug!(alternative, identifier = *identifier, "spoken form already taken");
            }
        }
    }

    for list in &options.pluralize_lists {
        let plural: SpokenFormMap = table
            .list(list)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(spoken, id)| (pluralize(spoken), id.clone()))
                    .collect()
            })
            .unwrap_or_default();
        let plural_list = format!("{list}_plural");
        let target = table.ensure_list(&plural_list);
        target.extend(plural);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> SpokenFormMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn rows(pairs: &[(&str, &str)]) -> Vec<OverrideRow> {
        pairs
            .iter()
            .map(|(spoken, id)| OverrideRow::new(*spoken, *id))
            .collect()
    }

    fn defaults() -> DefaultTables {
        let mut tables = DefaultTables::new();
        tables.insert(
            "simple_action".to_string(),
            map(&[("chuck", "remove"), ("take", "setSelection"), ("paste", "pasteFromClipboard")]),
        );
        tables.insert("empty_list".to_string(), SpokenFormMap::new());
        tables
    }

    #[test]
    fn test_defaults_without_overrides() {
        let table = merge_tables(&defaults(), &[], &ReconcileOptions::default());
        assert_eq!(table.list("simple_action").map(|l| l.len()), Some(3));
        assert!(table.list("empty_list").is_some());
    }

    #[test]
    fn test_override_replaces_default_spoken_form() {
        let current = rows(&[("drop", "remove")]);
        let table = merge_tables(&defaults(), &current, &ReconcileOptions::default());
        assert!(table.lookup("simple_action", "drop").is_found());
        assert!(!table.lookup("simple_action", "chuck").is_found());
    }

    #[test]
    fn test_disabled_and_alternatives() {
        let current = rows(&[("-take", "setSelection"), ("drop | chuck", "remove")]);
        let table = merge_tables(&defaults(), &current, &ReconcileOptions::default());
        assert!(table.spoken_forms_for("setSelection").is_empty());
        assert_eq!(
            table.spoken_forms_for("remove"),
            vec![("simple_action", "chuck"), ("simple_action", "drop")]
        );
    }

    #[test]
    fn test_paste_to_migration() {
        let current = rows(&[("paste to", "pasteFromClipboard")]);
        let table = merge_tables(&defaults(), &current, &ReconcileOptions::default());
        assert!(table.lookup("simple_action", "paste").is_found());

        let no_migrations = ReconcileOptions {
            migrations: Vec::new(),
            ..Default::default()
        };
        let table = merge_tables(&defaults(), &current, &no_migrations);
        assert!(table.lookup("simple_action", "paste to").is_found());
    }

    #[test]
    fn test_unknown_values_routing() {
        let current = rows(&[("hello", "myCommand"), ("skip", "ignoredThing")]);
        let options = ReconcileOptions {
            extra_ignored_values: vec!["ignoredThing".to_string()],
            unknown_values: UnknownValues::Allow {
                list: "custom_action".to_string(),
            },
            ..Default::default()
        };
        let table = merge_tables(&defaults(), &current, &options);
        assert_eq!(table.lookup("custom_action", "hello"), crate::Lookup::Found("myCommand"));
        assert!(!table.find("skip").is_found());

        let rejected = merge_tables(&defaults(), &current, &ReconcileOptions::default());
        assert!(!rejected.find("hello").is_found());
    }

    #[test]
    fn test_plural_lists() {
        let options = ReconcileOptions {
            pluralize_lists: vec!["simple_action".to_string()],
            ..Default::default()
        };
        let table = merge_tables(&defaults(), &[], &options);
        assert_eq!(
            table.lookup("simple_action_plural", "chucks"),
            crate::Lookup::Found("remove")
        );
    }

    #[test]
    fn test_missing_defaults() {
        let current = rows(&[("drop", "remove")]);
        let missing = missing_defaults(&defaults(), &current, &ReconcileOptions::default());
        assert_eq!(
            missing,
            map(&[("paste", "pasteFromClipboard"), ("take", "setSelection")])
        );
    }

    #[test]
    fn test_file_row_beats_untouched_default_spoken_form() {
        // `take` now removes; setSelection keeps no spoken form
        let current = rows(&[("take", "remove")]);
        let options = ReconcileOptions::default();
        let table = merge_tables(&defaults(), &current, &options);
        assert_eq!(table.lookup("simple_action", "take"), crate::Lookup::Found("remove"));
        assert!(!table.lookup("simple_action", "chuck").is_found());
        assert!(table.spoken_forms_for("setSelection").is_empty());

        let missing = missing_defaults(&defaults(), &current, &options);
        assert_eq!(missing, map(&[("paste", "pasteFromClipboard")]));
    }

    #[test]
    fn test_disabled_and_ignored_rows_claim_nothing() {
        let options = ReconcileOptions {
            extra_ignored_values: vec!["ignoredThing".to_string()],
            ..Default::default()
        };
        let current = rows(&[("-take", "remove"), ("chuck", "ignoredThing")]);
        let missing = missing_defaults(&defaults(), &current, &options);
        assert_eq!(
            missing,
            map(&[("paste", "pasteFromClipboard"), ("take", "setSelection")])
        );

        let table = merge_tables(&defaults(), &current, &options);
        assert_eq!(table.lookup("simple_action", "take"), crate::Lookup::Found("setSelection"));
        assert!(!table.find("chuck").is_found());
    }

    #[test]
    fn test_first_row_for_an_identifier_wins() {
        let current = rows(&[("drop", "remove"), ("yank", "remove")]);
        let table = merge_tables(&defaults(), &current, &ReconcileOptions::default());
        assert_eq!(table.spoken_forms_for("remove"), vec![("simple_action", "drop")]);
    }
}
