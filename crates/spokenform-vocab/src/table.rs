//! Identifier tables: `{list_name: {spoken_form: identifier}}`
//!
//! A table is built once per reconciliation pass and then only read. Consumers
//! hold an `Arc<IdentifierTable>` snapshot, so a republished table never
//! changes under them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Spoken form → canonical identifier for a single list.
pub type SpokenFormMap = BTreeMap<String, String>;

/// Built-in vocabulary for one override file, keyed by list name.
pub type DefaultTables = BTreeMap<String, SpokenFormMap>;

/// Result of a lookup that has a well-defined "not there" case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::NotFound => Lookup::NotFound,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Lookup::Found(v),
            None => Lookup::NotFound,
        }
    }
}

/// Merged vocabulary for one override file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierTable {
    lists: BTreeMap<String, SpokenFormMap>,
}

impl IdentifierTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lists(lists: BTreeMap<String, SpokenFormMap>) -> Self {
        Self { lists }
    }

    /// Make sure `list` is present, even if it ends up empty.
    pub(crate) fn ensure_list(&mut self, list: &str) -> &mut SpokenFormMap {
        self.lists.entry(list.to_string()).or_default()
    }

    pub(crate) fn insert(&mut self, list: &str, spoken_form: &str, identifier: &str) {
        self.ensure_list(list)
            .insert(spoken_form.to_string(), identifier.to_string());
    }

    pub fn list(&self, name: &str) -> Option<&SpokenFormMap> {
        self.lists.get(name)
    }

    pub fn lists(&self) -> &BTreeMap<String, SpokenFormMap> {
        &self.lists
    }

    pub fn list_names(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    /// Identifier for `spoken_form` within `list`.
    pub fn lookup(&self, list: &str, spoken_form: &str) -> Lookup<&str> {
        self.lists
            .get(list)
            .and_then(|entries| entries.get(spoken_form))
            .map(String::as_str)
            .into()
    }

    /// First `(list, identifier)` whose spoken form matches, scanning lists
    /// in name order.
    pub fn find(&self, spoken_form: &str) -> Lookup<(&str, &str)> {
        self.lists
            .iter()
            .find_map(|(list, entries)| {
                entries
                    .get(spoken_form)
                    .map(|id| (list.as_str(), id.as_str()))
            })
            .into()
    }

    /// Every `(list, spoken_form)` that resolves to `identifier`.
    pub fn spoken_forms_for(&self, identifier: &str) -> Vec<(&str, &str)> {
        self.lists
            .iter()
            .flat_map(|(list, entries)| {
                entries
                    .iter()
                    .filter(move |(_, id)| id.as_str() == identifier)
                    .map(move |(spoken, _)| (list.as_str(), spoken.as_str()))
            })
            .collect()
    }

    /// Total number of spoken forms across all lists.
    pub fn len(&self) -> usize {
        self.lists.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_lists(self) -> BTreeMap<String, SpokenFormMap> {
        self.lists
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IdentifierTable {
        let mut table = IdentifierTable::new();
        table.insert("action", "chuck", "remove");
        table.insert("action", "drop", "remove");
        table.insert("action", "take", "setSelection");
        table.insert("scope_type", "funk", "namedFunction");
        table.ensure_list("empty");
        table
    }

    #[test]
    fn test_lookup_and_find() {
        let table = sample();
        assert_eq!(table.lookup("action", "take"), Lookup::Found("setSelection"));
        assert_eq!(table.lookup("action", "funk"), Lookup::NotFound);
        assert_eq!(
            table.find("funk"),
            Lookup::Found(("scope_type", "namedFunction"))
        );
    }

    #[test]
    fn test_reverse_lookup_returns_all_alternatives() {
        let table = sample();
        let forms = table.spoken_forms_for("remove");
        assert_eq!(forms, vec![("action", "chuck"), ("action", "drop")]);
    }

    #[test]
    fn test_empty_lists_are_kept() {
        let table = sample();
        assert_eq!(table.list("empty").map(BTreeMap::len), Some(0));
        assert_eq!(table.len(), 4);
    }
}
