//! On-disk override file format
//!
//! ```text
//! Spoken form, Identifier
//! # comments and blank lines are skipped
//! chuck, remove
//! -take, setSelection        <- disabled: identifier stays known, no spoken form
//! clone|dupe, insertCopyAfter <- two alternatives for one identifier
//!
//! # 2024-05-01 12:00:00 - New entries automatically added by spokenform
//! pour, editNewLineAfter
//! ```
//!
//! Parsing is best-effort: every problem becomes a [`CsvDiagnostic`] and the
//! offending row is dropped, so one bad line never takes the rest of the file
//! down with it.

use crate::table::SpokenFormMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SPOKEN_FORM_HEADER: &str = "Spoken form";
pub const IDENTIFIER_HEADER: &str = "Identifier";

/// Leading character that disables a spoken form without deleting its row.
pub const DISABLED_MARKER: char = '-';
/// Separates alternative spoken forms inside one cell.
pub const ALTERNATIVE_SEPARATOR: char = '|';

const COMMENT_MARKER: char = '#';
const CELL_SEPARATOR: char = ',';

/// Expected column names of an override file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers {
    pub spoken_form: String,
    pub identifier: String,
}

impl Default for Headers {
    fn default() -> Self {
        Self {
            spoken_form: SPOKEN_FORM_HEADER.to_string(),
            identifier: IDENTIFIER_HEADER.to_string(),
        }
    }
}

impl Headers {
    pub const COLUMNS: usize = 2;

    /// Standard spoken-form column with a special-purpose second column.
    pub fn with_identifier(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            ..Default::default()
        }
    }

    pub fn line(&self) -> String {
        create_line(&[&self.spoken_form, &self.identifier])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsvIssue {
    #[error("Malformed header '{found}' (expected '{expected}')")]
    MalformedHeader { found: String, expected: String },
    #[error("Malformed csv entry '{0}'")]
    MalformedRow(String),
    #[error("Unknown identifier '{0}'")]
    UnknownIdentifier(String),
    #[error("Duplicate identifier '{0}'")]
    DuplicateIdentifier(String),
    #[error("Duplicate spoken form '{0}'")]
    DuplicateSpokenForm(String),
}

/// A problem found in one line of an override file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDiagnostic {
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    pub issue: CsvIssue,
}

impl fmt::Display for CsvDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.path.display(), self.line, self.issue)
    }
}

/// Which identifiers a row may mention.
#[derive(Debug, Clone, Copy)]
pub struct RowRules<'a> {
    pub known_identifiers: &'a BTreeSet<String>,
    pub extra_ignored_values: &'a [String],
    pub allow_unknown: bool,
}

impl RowRules<'_> {
    fn accepts(&self, identifier: &str) -> bool {
        self.allow_unknown
            || self.known_identifiers.contains(identifier)
            || self.extra_ignored_values.iter().any(|v| v == identifier)
    }
}

/// One accepted row of an override file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideRow {
    pub spoken_form: String,
    pub identifier: String,
}

impl OverrideRow {
    pub fn new(spoken_form: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            spoken_form: spoken_form.into(),
            identifier: identifier.into(),
        }
    }

    /// Spoken forms this row claims; none when it is disabled.
    pub fn alternatives(&self) -> impl Iterator<Item = &str> + '_ {
        spoken_alternatives(&self.spoken_form)
    }
}

/// Parsed contents of one override file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideFile {
    /// Accepted rows in file order
    pub rows: Vec<OverrideRow>,
    pub diagnostics: Vec<CsvDiagnostic>,
    /// Whether a header row (well-formed or not) was seen
    pub seen_header: bool,
}

impl OverrideFile {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn identifiers(&self) -> HashSet<&str> {
        self.rows.iter().map(|row| row.identifier.as_str()).collect()
    }

    /// Identifier of the row whose spoken-form cell is exactly `spoken_form`.
    pub fn identifier_for(&self, spoken_form: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.spoken_form == spoken_form)
            .map(|row| row.identifier.as_str())
    }
}

pub fn create_line(cells: &[&str]) -> String {
    cells.join(", ")
}

pub fn is_disabled(spoken_form: &str) -> bool {
    spoken_form.starts_with(DISABLED_MARKER)
}

/// Trimmed, non-empty alternatives of a spoken-form cell. Empty when disabled.
pub fn spoken_alternatives(spoken_form: &str) -> impl Iterator<Item = &str> + '_ {
    let enabled = !is_disabled(spoken_form);
    spoken_form
        .split(ALTERNATIVE_SEPARATOR)
        .filter(move |_| enabled)
        .map(str::trim)
        .filter(|alternative| !alternative.is_empty())
}

pub fn parse_override_file(
    path: &Path,
    contents: &str,
    headers: &Headers,
    rules: &RowRules<'_>,
) -> OverrideFile {
    let mut file = OverrideFile::default();
    let mut used_identifiers: HashSet<String> = HashSet::new();
    let mut used_spoken_forms: HashSet<String> = HashSet::new();
    let expected_header = headers.line();

    let report = |index: usize, issue: CsvIssue| CsvDiagnostic {
        path: path.to_path_buf(),
        line: index + 1,
        issue,
    };

    for (index, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }

        if !file.seen_header {
            file.seen_header = true;
            if line != expected_header {
                file.diagnostics.push(report(
                    index,
                    CsvIssue::MalformedHeader {
                        found: line.to_string(),
                        expected: expected_header.clone(),
                    },
                ));
            }
            continue;
        }

        let parts: Vec<&str> = line.split(CELL_SEPARATOR).collect();
        if parts.len() != Headers::COLUMNS {
            file.diagnostics
                .push(report(index, CsvIssue::MalformedRow(line.to_string())));
            continue;
        }

        let spoken_form = parts[0].trim();
        let identifier = parts[1].trim();

        if !rules.accepts(identifier) {
            file.diagnostics.push(report(
                index,
                CsvIssue::UnknownIdentifier(identifier.to_string()),
            ));
            continue;
        }

        if !used_identifiers.insert(identifier.to_string()) {
            file.diagnostics.push(report(
                index,
                CsvIssue::DuplicateIdentifier(identifier.to_string()),
            ));
            continue;
        }

        // First row to claim a spoken form keeps it
        if let Some(taken) = spoken_alternatives(spoken_form).find(|a| used_spoken_forms.contains(*a)) {
            file.diagnostics.push(report(
                index,
                CsvIssue::DuplicateSpokenForm(taken.to_string()),
            ));
            continue;
        }
        used_spoken_forms.extend(spoken_alternatives(spoken_form).map(str::to_string));

        file.rows.push(OverrideRow::new(spoken_form, identifier));
    }

    file
}

pub fn read_override_file(
    path: &Path,
    headers: &Headers,
    rules: &RowRules<'_>,
) -> std::io::Result<OverrideFile> {
    let contents = std::fs::read_to_string(path)?;
    Ok(parse_override_file(path, &contents, headers, rules))
}

/// Full contents of a freshly created override file.
pub fn render_new_file(headers: &Headers, values: &SpokenFormMap) -> String {
    let mut lines = vec![headers.line()];
    lines.extend(
        values
            .iter()
            .map(|(spoken_form, identifier)| create_line(&[spoken_form, identifier])),
    );
    lines.push(String::new());
    lines.join("\n")
}

/// Block appended to an existing file for newly introduced built-ins.
///
/// `header` is only passed when the existing file never had a header row.
pub fn render_appended_block(
    missing: &SpokenFormMap,
    timestamp: &str,
    header: Option<&Headers>,
) -> String {
    let mut lines = vec![format!(
        "# {timestamp} - New entries automatically added by spokenform"
    )];
    if let Some(headers) = header {
        lines.push(headers.line());
    }
    lines.extend(
        missing
            .iter()
            .map(|(spoken_form, identifier)| create_line(&[spoken_form, identifier])),
    );
    format!("\n\n{}", lines.join("\n"))
}

pub fn write_new_file(path: &Path, headers: &Headers, values: &SpokenFormMap) -> std::io::Result<()> {
    std::fs::write(path, render_new_file(headers, values))
}

pub fn append_block(path: &Path, block: &str) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new().append(true).open(path)?;
    file.write_all(block.as_bytes())
}
