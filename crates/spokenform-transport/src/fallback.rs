//! Local execution of fallback responses
//!
//! When the engine cannot act on the focused element itself it answers with
//! a [`Fallback`]: an action name, the modifiers of the target (outermost
//! first) and a few action-specific fields. The interpreter turns that into
//! a [`FallbackPlan`] of editor primitives, applying the modifiers innermost
//! first, and then runs the plan against an [`Editor`].
//!
//! The whole plan is resolved before anything runs, so an unknown action or
//! modifier leaves the editor untouched.

use crate::response::Fallback;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Editor primitives
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorOp {
    SelectToken,
    SelectWord,
    SelectLine,
    SelectParagraph,
    SelectDocument,
    /// Select the surrounding token only when nothing is selected
    SelectTokenIfEmpty,
    CollapseToStart,
    CollapseToEnd,
    ExtendToLineStart,
    ExtendToLineEnd,
    ExtendToParagraphStart,
    ExtendToParagraphEnd,
    ExtendToDocumentStart,
    ExtendToDocumentEnd,
    Insert(String),
    Delete,
    Copy,
    Cut,
    Paste,
    InsertLineAbove,
    InsertLineBelow,
    ToggleComment,
    Indent,
    Outdent,
}

impl fmt::Display for EditorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorOp::Insert(text) => write!(f, "insert {text:?}"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[derive(Debug, Error)]
#[error("editor operation failed: {0}")]
pub struct EditorError(pub String);

/// The local editor a fallback runs against.
pub trait Editor {
    fn perform(&mut self, op: &EditorOp) -> Result<(), EditorError>;

    fn selected_text(&mut self) -> Result<String, EditorError>;
}

// ============================================================================
// Plans
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackStep {
    Op(EditorOp),
    /// Replace the selection with `left + selection + right`
    WrapSelection { left: String, right: String },
    /// Replace the selected word with its next homophone
    CycleHomophone,
    /// Hand the selected text back to the caller
    ReturnSelectedText,
}

impl fmt::Display for FallbackStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackStep::Op(op) => op.fmt(f),
            FallbackStep::WrapSelection { left, right } => write!(f, "wrap selection in {left:?} {right:?}"),
            FallbackStep::CycleHomophone => f.write_str("replace selection with next homophone"),
            FallbackStep::ReturnSelectedText => f.write_str("return selected text"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FallbackError {
    #[error("unknown fallback action '{0}'")]
    UnknownAction(String),

    #[error("unknown fallback modifier '{0}'")]
    UnknownModifier(String),

    #[error("fallback action '{action}' is missing field '{field}'")]
    MissingField { action: String, field: &'static str },

    #[error("no homophones for '{0}'")]
    NoHomophone(String),

    #[error("{0}")]
    Editor(String),
}

impl From<EditorError> for FallbackError {
    fn from(err: EditorError) -> Self {
        FallbackError::Editor(err.0)
    }
}

/// Steps for one fallback, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FallbackPlan {
    pub steps: Vec<FallbackStep>,
}

impl FallbackPlan {
    /// Resolve `fallback` against the closed action and modifier tables.
    pub fn from_fallback(fallback: &Fallback) -> Result<Self, FallbackError> {
        let mut steps = Vec::with_capacity(fallback.modifiers.len() + 1);
        for modifier in fallback.modifiers.iter().rev() {
            let key = modifier_key(modifier);
            steps.push(FallbackStep::Op(modifier_op(&key)?));
        }
        steps.extend(action_steps(fallback)?);
        Ok(Self { steps })
    }

    /// Run every step; the first failure stops the plan where it is.
    pub fn execute(
        &self,
        editor: &mut dyn Editor,
        homophones: &Homophones,
    ) -> Result<Option<String>, FallbackError> {
        let mut returned = None;
        for step in &self.steps {
            tracing::debug!(step = %step, "fallback step");
            match step {
                FallbackStep::Op(op) => editor.perform(op)?,
                FallbackStep::WrapSelection { left, right } => {
                    let text = editor.selected_text()?;
                    editor.perform(&EditorOp::Insert(format!("{left}{text}{right}")))?;
                }
                FallbackStep::CycleHomophone => {
                    let text = editor.selected_text()?;
                    let next = homophones
                        .next(&text)
                        .ok_or_else(|| FallbackError::NoHomophone(text.clone()))?;
                    editor.perform(&EditorOp::Insert(next))?;
                }
                FallbackStep::ReturnSelectedText => returned = Some(editor.selected_text()?),
            }
        }
        Ok(returned)
    }
}

impl fmt::Display for FallbackPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, step) in self.steps.iter().enumerate() {
            writeln!(f, "{}. {step}", index + 1)?;
        }
        Ok(())
    }
}

/// Plan and run `fallback` in one go.
pub fn perform_fallback(
    fallback: &Fallback,
    editor: &mut dyn Editor,
    homophones: &Homophones,
) -> Result<Option<String>, FallbackError> {
    let plan = FallbackPlan::from_fallback(fallback).map_err(|err| {
        tracing::error!(action = %fallback.action, error = %err, "fallback rejected");
        err
    })?;
    plan.execute(editor, homophones)
}

/// Lookup key of a modifier record: `type`, plus the scope for
/// `containingScope` (`containingScope.paragraph`) and for head/tail limited
/// to a scope (`extendThroughEndOf.line`).
pub fn modifier_key(modifier: &Value) -> String {
    let kind = modifier.get("type").and_then(Value::as_str).unwrap_or_default();
    let scope = match kind {
        "containingScope" => scope_name(modifier.get("scopeType")),
        "extendThroughStartOf" | "extendThroughEndOf" => modifier
            .get("modifiers")
            .and_then(Value::as_array)
            .and_then(|inner| match inner.as_slice() {
                [only] if only.get("type").and_then(Value::as_str) == Some("containingScope") => {
                    scope_name(only.get("scopeType"))
                }
                _ => None,
            }),
        _ => None,
    };
    match scope {
        Some(scope) => format!("{kind}.{scope}"),
        None => kind.to_string(),
    }
}

/// Scope types arrive either as `{"type": "line"}` or as a bare `"line"`.
fn scope_name(scope_type: Option<&Value>) -> Option<&str> {
    match scope_type? {
        Value::String(name) => Some(name),
        other => other.get("type").and_then(Value::as_str),
    }
}

fn modifier_op(key: &str) -> Result<EditorOp, FallbackError> {
    Ok(match key {
        "containingScope.token" | "containingScope.identifier" => EditorOp::SelectToken,
        "containingScope.word" => EditorOp::SelectWord,
        "containingScope.line" => EditorOp::SelectLine,
        "containingScope.paragraph" => EditorOp::SelectParagraph,
        "containingScope.document" => EditorOp::SelectDocument,
        "containingTokenIfEmpty" => EditorOp::SelectTokenIfEmpty,
        "startOf" => EditorOp::CollapseToStart,
        "endOf" => EditorOp::CollapseToEnd,
        "extendThroughStartOf" | "extendThroughStartOf.line" => EditorOp::ExtendToLineStart,
        "extendThroughEndOf" | "extendThroughEndOf.line" => EditorOp::ExtendToLineEnd,
        "extendThroughStartOf.paragraph" => EditorOp::ExtendToParagraphStart,
        "extendThroughEndOf.paragraph" => EditorOp::ExtendToParagraphEnd,
        "extendThroughStartOf.document" => EditorOp::ExtendToDocumentStart,
        "extendThroughEndOf.document" => EditorOp::ExtendToDocumentEnd,
        other => return Err(FallbackError::UnknownModifier(other.to_string())),
    })
}

fn required<'a>(fallback: &'a Fallback, field: &'static str) -> Result<&'a str, FallbackError> {
    fallback.field(field).ok_or_else(|| FallbackError::MissingField {
        action: fallback.action.clone(),
        field,
    })
}

fn action_steps(fallback: &Fallback) -> Result<Vec<FallbackStep>, FallbackError> {
    let single = |op: EditorOp| Ok(vec![FallbackStep::Op(op)]);
    match fallback.action.as_str() {
        "insert" => single(EditorOp::Insert(required(fallback, "text")?.to_string())),
        "callAsFunction" => Ok(vec![FallbackStep::WrapSelection {
            left: format!("{}(", required(fallback, "callee")?),
            right: ")".to_string(),
        }]),
        "wrapWithPairedDelimiter" | "rewrapWithPairedDelimiter" => Ok(vec![FallbackStep::WrapSelection {
            left: required(fallback, "left")?.to_string(),
            right: required(fallback, "right")?.to_string(),
        }]),
        "getText" => Ok(vec![FallbackStep::ReturnSelectedText]),
        "nextHomophone" => Ok(vec![FallbackStep::CycleHomophone]),
        "setSelection" => Ok(Vec::new()),
        "setSelectionBefore" => single(EditorOp::CollapseToStart),
        "setSelectionAfter" => single(EditorOp::CollapseToEnd),
        "copyToClipboard" => single(EditorOp::Copy),
        "cutToClipboard" => single(EditorOp::Cut),
        "pasteFromClipboard" => single(EditorOp::Paste),
        "clearAndSetSelection" | "remove" => single(EditorOp::Delete),
        "editNewLineBefore" => single(EditorOp::InsertLineAbove),
        "editNewLineAfter" => single(EditorOp::InsertLineBelow),
        "toggleLineComment" => single(EditorOp::ToggleComment),
        "indentLine" => single(EditorOp::Indent),
        "outdentLine" => single(EditorOp::Outdent),
        other => Err(FallbackError::UnknownAction(other.to_string())),
    }
}

// ============================================================================
// Homophones
// ============================================================================

/// Groups of words that sound alike, each cycling to the next.
#[derive(Debug, Clone, Default)]
pub struct Homophones {
    groups: Vec<Vec<String>>,
    index: HashMap<String, usize>,
}

impl Homophones {
    pub fn new() -> Self {
        Self::default()
    }

    /// One comma-separated group per line; `#` starts a comment.
    pub fn parse(text: &str) -> Self {
        let mut homophones = Self::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            homophones.add_group(line.split(',').map(str::trim).filter(|w| !w.is_empty()));
        }
        homophones
    }

    pub fn add_group<'a>(&mut self, words: impl IntoIterator<Item = &'a str>) {
        let group: Vec<String> = words.into_iter().map(str::to_lowercase).collect();
        if group.len() < 2 {
            return;
        }
        let id = self.groups.len();
        for word in &group {
            self.index.entry(word.clone()).or_insert(id);
        }
        self.groups.push(group);
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The homophone after `word`, in the case `word` was written in.
    pub fn next(&self, word: &str) -> Option<String> {
        let lower = word.to_lowercase();
        let group = &self.groups[*self.index.get(&lower)?];
        let position = group.iter().position(|w| *w == lower)?;
        let next = &group[(position + 1) % group.len()];
        Some(match_case(word, next))
    }
}

fn match_case(model: &str, word: &str) -> String {
    let has_letters = model.chars().any(char::is_alphabetic);
    if has_letters && model.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase) && model.chars().count() > 1 {
        return word.to_uppercase();
    }
    let mut chars = model.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            let mut rest = word.chars();
            match rest.next() {
                Some(head) => head.to_uppercase().chain(rest).collect(),
                None => String::new(),
            }
        }
        _ => word.to_string(),
    }
}
