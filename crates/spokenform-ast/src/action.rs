//! Action descriptors
//!
//! Most actions take one target and nothing else; those share
//! [`SimpleAction`]. The rest carry their own arguments and are tagged by
//! `name` in [`ComplexAction`].

use crate::destination::Destination;
use crate::scope::ScopeType;
use crate::target::Target;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! simple_action_names {
    ($($variant:ident => $name:literal,)*) => {
        /// Actions whose only argument is a target.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum SimpleActionName {
            $(
                #[serde(rename = $name)]
                $variant,
            )*
        }

        impl SimpleActionName {
            pub const ALL: &'static [SimpleActionName] = &[$(SimpleActionName::$variant,)*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(SimpleActionName::$variant => $name,)*
                }
            }
        }

        impl FromStr for SimpleActionName {
            type Err = UnknownAction;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(SimpleActionName::$variant),)*
                    _ => Err(UnknownAction(s.to_string())),
                }
            }
        }
    };
}

simple_action_names! {
    AddSelection => "addSelection",
    AddSelectionAfter => "addSelectionAfter",
    AddSelectionBefore => "addSelectionBefore",
    BreakLine => "breakLine",
    ClearAndSetSelection => "clearAndSetSelection",
    CopyToClipboard => "copyToClipboard",
    CutToClipboard => "cutToClipboard",
    Decrement => "decrement",
    Deselect => "deselect",
    EditNewLineAfter => "editNewLineAfter",
    EditNewLineBefore => "editNewLineBefore",
    SetInstanceReference => "experimental.setInstanceReference",
    ExtractVariable => "extractVariable",
    FindInDocument => "findInDocument",
    FindInWorkspace => "findInWorkspace",
    FlashTargets => "flashTargets",
    FoldRegion => "foldRegion",
    FollowLink => "followLink",
    FollowLinkAside => "followLinkAside",
    Increment => "increment",
    IndentLine => "indentLine",
    InsertCopyAfter => "insertCopyAfter",
    InsertCopyBefore => "insertCopyBefore",
    InsertEmptyLineAfter => "insertEmptyLineAfter",
    InsertEmptyLineBefore => "insertEmptyLineBefore",
    InsertEmptyLinesAround => "insertEmptyLinesAround",
    JoinLines => "joinLines",
    OutdentLine => "outdentLine",
    GetTargets => "private.getTargets",
    SetKeyboardTarget => "private.setKeyboardTarget",
    RandomizeTargets => "randomizeTargets",
    Remove => "remove",
    Rename => "rename",
    RevealDefinition => "revealDefinition",
    RevealTypeDefinition => "revealTypeDefinition",
    ReverseTargets => "reverseTargets",
    ScrollToBottom => "scrollToBottom",
    ScrollToCenter => "scrollToCenter",
    ScrollToTop => "scrollToTop",
    SetSelection => "setSelection",
    SetSelectionAfter => "setSelectionAfter",
    SetSelectionBefore => "setSelectionBefore",
    ShowDebugHover => "showDebugHover",
    ShowHover => "showHover",
    ShowQuickFix => "showQuickFix",
    ShowReferences => "showReferences",
    SortTargets => "sortTargets",
    ToggleLineBreakpoint => "toggleLineBreakpoint",
    ToggleLineComment => "toggleLineComment",
    UnfoldRegion => "unfoldRegion",
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);

impl fmt::Display for SimpleActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Descriptors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionDescriptor {
    Simple(SimpleAction),
    Complex(ComplexAction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleAction {
    pub name: SimpleActionName,
    pub target: Target,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum ComplexAction {
    CallAsFunction { callee: Target, argument: Target },
    ReplaceWithTarget(BringMoveAction),
    MoveToTarget(BringMoveAction),
    SwapTargets { target1: Target, target2: Target },
    WrapWithPairedDelimiter(WrapAction),
    RewrapWithPairedDelimiter(WrapAction),
    PasteFromClipboard { destination: Destination },
    GenerateSnippet(GenerateSnippetAction),
    InsertSnippet(InsertSnippetAction),
    WrapWithSnippet(WrapWithSnippetAction),
    ExecuteCommand(ExecuteCommandAction),
    Replace(ReplaceAction),
    Highlight(HighlightAction),
    EditNew { destination: Destination },
    GetText(GetTextAction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BringMoveAction {
    pub source: Target,
    pub destination: Destination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapAction {
    pub left: String,
    pub right: String,
    pub target: Target,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSnippetAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet_name: Option<String>,
    pub target: Target,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertSnippetAction {
    pub snippet_description: InsertSnippetArg,
    pub destination: Destination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InsertSnippetArg {
    Named(NamedSnippet),
    Custom(CustomSnippet),
    List(SnippetList),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedSnippet {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitutions: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSnippet {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_types: Option<Vec<ScopeType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitutions: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_language: Option<String>,
    pub snippets: Vec<CustomSnippet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrapWithSnippetAction {
    pub snippet_description: WrapWithSnippetArg,
    pub target: Target,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WrapWithSnippetArg {
    Named(NamedWrapSnippet),
    Custom(CustomWrapSnippet),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedWrapSnippet {
    pub name: String,
    pub variable_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomWrapSnippet {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_type: Option<ScopeType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteCommandAction {
    pub command_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ExecuteCommandOptions>,
    pub target: Target,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteCommandOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_args: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ensure_single_editor: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ensure_single_target: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_selection: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_decorations: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceAction {
    pub replace_with: ReplaceWith,
    pub destination: Destination,
}

/// Literal texts, one per target, or a counter starting at `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplaceWith {
    Texts(Vec<String>),
    Counter { start: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_id: Option<String>,
    pub target: Target,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTextAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<GetTextOptions>,
    pub target: Target,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTextOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_decorations: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ensure_single_target: Option<bool>,
}

impl ComplexAction {
    pub fn name(&self) -> &'static str {
        match self {
            ComplexAction::CallAsFunction { .. } => "callAsFunction",
            ComplexAction::ReplaceWithTarget(_) => "replaceWithTarget",
            ComplexAction::MoveToTarget(_) => "moveToTarget",
            ComplexAction::SwapTargets { .. } => "swapTargets",
            ComplexAction::WrapWithPairedDelimiter(_) => "wrapWithPairedDelimiter",
            ComplexAction::RewrapWithPairedDelimiter(_) => "rewrapWithPairedDelimiter",
            ComplexAction::PasteFromClipboard { .. } => "pasteFromClipboard",
            ComplexAction::GenerateSnippet(_) => "generateSnippet",
            ComplexAction::InsertSnippet(_) => "insertSnippet",
            ComplexAction::WrapWithSnippet(_) => "wrapWithSnippet",
            ComplexAction::ExecuteCommand(_) => "executeCommand",
            ComplexAction::Replace(_) => "replace",
            ComplexAction::Highlight(_) => "highlight",
            ComplexAction::EditNew { .. } => "editNew",
            ComplexAction::GetText(_) => "getText",
        }
    }
}

impl ActionDescriptor {
    pub fn simple(name: SimpleActionName, target: Target) -> Self {
        ActionDescriptor::Simple(SimpleAction { name, target })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActionDescriptor::Simple(action) => action.name.as_str(),
            ActionDescriptor::Complex(action) => action.name(),
        }
    }

    /// Every target the action reads, destinations included, in wire order.
    pub fn targets(&self) -> Vec<&Target> {
        let complex = match self {
            ActionDescriptor::Simple(action) => return vec![&action.target],
            ActionDescriptor::Complex(action) => action,
        };
        match complex {
            ComplexAction::CallAsFunction { callee, argument } => vec![callee, argument],
            ComplexAction::ReplaceWithTarget(action) | ComplexAction::MoveToTarget(action) => {
                let mut targets = vec![&action.source];
                targets.extend(action.destination.targets());
                targets
            }
            ComplexAction::SwapTargets { target1, target2 } => vec![target1, target2],
            ComplexAction::WrapWithPairedDelimiter(action)
            | ComplexAction::RewrapWithPairedDelimiter(action) => vec![&action.target],
            ComplexAction::PasteFromClipboard { destination }
            | ComplexAction::EditNew { destination } => destination.targets(),
            ComplexAction::GenerateSnippet(action) => vec![&action.target],
            ComplexAction::InsertSnippet(action) => action.destination.targets(),
            ComplexAction::WrapWithSnippet(action) => vec![&action.target],
            ComplexAction::ExecuteCommand(action) => vec![&action.target],
            ComplexAction::Replace(action) => action.destination.targets(),
            ComplexAction::Highlight(action) => vec![&action.target],
            ComplexAction::GetText(action) => vec![&action.target],
        }
    }
}

/// Opening and closing text of a paired delimiter identifier.
pub fn paired_delimiter_text(identifier: &str) -> Option<(&'static str, &'static str)> {
    Some(match identifier {
        "curlyBrackets" => ("{", "}"),
        "angleBrackets" => ("<", ">"),
        "escapedDoubleQuotes" => ("\\\"", "\\\""),
        "escapedSingleQuotes" => ("\\'", "\\'"),
        "escapedParentheses" => ("\\(", "\\)"),
        "escapedSquareBrackets" => ("\\[", "\\]"),
        "doubleQuotes" => ("\"", "\""),
        "parentheses" => ("(", ")"),
        "backtickQuotes" => ("`", "`"),
        "squareBrackets" => ("[", "]"),
        "singleQuotes" => ("'", "'"),
        "whitespace" => (" ", " "),
        _ => return None,
    })
}
