//! Built-in vocabulary groups and their default spoken forms.
//!
//! Each group is reconciled against one override file. Edit the files, not
//! these tables, to customize spoken forms.

use crate::merge::{merge_tables, ReconcileOptions, UnknownValues};
use crate::override_file::Headers;
use crate::table::{DefaultTables, IdentifierTable, SpokenFormMap};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// List names shared with the compiler
// ============================================================================

pub mod lists {
    pub const SIMPLE_ACTION: &str = "simple_action";
    pub const BRING_MOVE_ACTION: &str = "bring_move_action";
    pub const SWAP_ACTION: &str = "swap_action";
    pub const CALL_ACTION: &str = "call_action";
    pub const WRAP_ACTION: &str = "wrap_action";
    pub const INSERT_SNIPPET_ACTION: &str = "insert_snippet_action";
    pub const PASTE_ACTION: &str = "paste_action";
    pub const CUSTOM_ACTION: &str = "custom_action";

    pub const SCOPE_TYPE: &str = "scope_type";
    pub const SCOPE_TYPE_PLURAL: &str = "scope_type_plural";
    pub const GLYPH_SCOPE_TYPE: &str = "glyph_scope_type";
    pub const GLYPH_SCOPE_TYPE_PLURAL: &str = "glyph_scope_type_plural";
    pub const CUSTOM_REGEX_SCOPE_TYPE: &str = "custom_regex_scope_type";

    pub const PAIRED_DELIMITER: &str = "paired_delimiter";
    pub const SELECTABLE_ONLY_PAIRED_DELIMITER: &str = "selectable_only_paired_delimiter";

    pub const SIMPLE_MODIFIER: &str = "simple_modifier";
    pub const EVERY_SCOPE_MODIFIER: &str = "every_scope_modifier";
    pub const START_END_MODIFIER: &str = "start_end_modifier";
    pub const HEAD_TAIL_MODIFIER: &str = "head_tail_modifier";
    pub const FIRST_MODIFIER: &str = "first_modifier";
    pub const LAST_MODIFIER: &str = "last_modifier";
    pub const PREVIOUS_NEXT_MODIFIER: &str = "previous_next_modifier";
    pub const FORWARD_BACKWARD_MODIFIER: &str = "forward_backward_modifier";
    pub const ANCESTOR_MODIFIER: &str = "ancestor_modifier";
    pub const FORCE_DIRECTION: &str = "surrounding_pair_force_direction";

    pub const SPECIAL_MARK: &str = "special_mark";
    pub const LINE_DIRECTION: &str = "line_direction";

    pub const HAT_COLOR: &str = "hat_color";
    pub const HAT_SHAPE: &str = "hat_shape";

    pub const RANGE_CONNECTIVE: &str = "range_connective";
    pub const LIST_CONNECTIVE: &str = "list_connective";
    pub const RANGE_TYPE: &str = "range_type";
    pub const SWAP_CONNECTIVE: &str = "swap_connective";
    pub const CALL_CONNECTIVE: &str = "call_connective";

    pub const POSITION: &str = "position";
    pub const INSERTION_MODE_TO: &str = "insertion_mode_to";

    pub const INSERTION_SNIPPET: &str = "insertion_snippet";
}

// ============================================================================
// Groups
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinGroup {
    Actions,
    ScopeTypes,
    PairedDelimiters,
    Modifiers,
    SpecialMarks,
    HatStyles,
    TargetConnectives,
    Positions,
    CustomActions,
    RegexScopeTypes,
    Snippets,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown vocabulary group '{0}'")]
pub struct UnknownGroup(pub String);

impl BuiltinGroup {
    pub const ALL: [BuiltinGroup; 11] = [
        BuiltinGroup::Actions,
        BuiltinGroup::ScopeTypes,
        BuiltinGroup::PairedDelimiters,
        BuiltinGroup::Modifiers,
        BuiltinGroup::SpecialMarks,
        BuiltinGroup::HatStyles,
        BuiltinGroup::TargetConnectives,
        BuiltinGroup::Positions,
        BuiltinGroup::CustomActions,
        BuiltinGroup::RegexScopeTypes,
        BuiltinGroup::Snippets,
    ];

    /// Override file id, relative to the settings directory, without `.csv`.
    pub fn file_id(self) -> &'static str {
        match self {
            BuiltinGroup::Actions => "actions",
            BuiltinGroup::ScopeTypes => "scope_types",
            BuiltinGroup::PairedDelimiters => "paired_delimiters",
            BuiltinGroup::Modifiers => "modifiers",
            BuiltinGroup::SpecialMarks => "special_marks",
            BuiltinGroup::HatStyles => "hat_styles",
            BuiltinGroup::TargetConnectives => "target_connectives",
            BuiltinGroup::Positions => "positions",
            BuiltinGroup::CustomActions => "experimental/actions_custom",
            BuiltinGroup::RegexScopeTypes => "experimental/regex_scope_types",
            BuiltinGroup::Snippets => "experimental/snippets",
        }
    }

    pub fn defaults(self) -> DefaultTables {
        match self {
            BuiltinGroup::Actions => tables(&[
                (lists::SIMPLE_ACTION, SIMPLE_ACTIONS),
                (
                    lists::BRING_MOVE_ACTION,
                    &[("bring", "replaceWithTarget"), ("move", "moveToTarget")],
                ),
                (lists::SWAP_ACTION, &[("swap", "swapTargets")]),
                (lists::CALL_ACTION, &[("call", "callAsFunction")]),
                (
                    lists::WRAP_ACTION,
                    &[("wrap", "wrapWithPairedDelimiter"), ("repack", "rewrapWithPairedDelimiter")],
                ),
                (lists::INSERT_SNIPPET_ACTION, &[("snippet", "insertSnippet")]),
                (lists::PASTE_ACTION, &[("paste", "pasteFromClipboard")]),
            ]),
            BuiltinGroup::ScopeTypes => tables(&[
                (lists::SCOPE_TYPE, SCOPE_TYPES),
                (lists::GLYPH_SCOPE_TYPE, &[("glyph", "glyph")]),
            ]),
            BuiltinGroup::PairedDelimiters => tables(&[
                (lists::PAIRED_DELIMITER, PAIRED_DELIMITERS),
                (
                    lists::SELECTABLE_ONLY_PAIRED_DELIMITER,
                    &[("pair", "any"), ("string", "string")],
                ),
            ]),
            BuiltinGroup::Modifiers => tables(&[
                (lists::SIMPLE_MODIFIER, SIMPLE_MODIFIERS),
                (lists::EVERY_SCOPE_MODIFIER, &[("every", "everyScope")]),
                (
                    lists::START_END_MODIFIER,
                    &[("start of", "startOf"), ("end of", "endOf")],
                ),
                (
                    lists::HEAD_TAIL_MODIFIER,
                    &[("head", "extendThroughStartOf"), ("tail", "extendThroughEndOf")],
                ),
                (lists::FIRST_MODIFIER, &[("first", "first")]),
                (lists::LAST_MODIFIER, &[("last", "last")]),
                (
                    lists::PREVIOUS_NEXT_MODIFIER,
                    &[("previous", "previous"), ("next", "next")],
                ),
                (
                    lists::FORWARD_BACKWARD_MODIFIER,
                    &[("forward", "forward"), ("backward", "backward")],
                ),
                (lists::ANCESTOR_MODIFIER, &[("grand", "ancestor")]),
                (lists::FORCE_DIRECTION, &[("left", "left"), ("right", "right")]),
            ]),
            BuiltinGroup::SpecialMarks => tables(&[
                (
                    lists::SPECIAL_MARK,
                    &[
                        ("this", "currentSelection"),
                        ("that", "previousTarget"),
                        ("source", "previousSource"),
                        ("nothing", "nothing"),
                    ],
                ),
                (
                    lists::LINE_DIRECTION,
                    &[
                        ("row", "lineNumberModulo100"),
                        ("up", "lineNumberRelativeUp"),
                        ("down", "lineNumberRelativeDown"),
                    ],
                ),
            ]),
            BuiltinGroup::HatStyles => tables(&[
                (lists::HAT_COLOR, HAT_COLORS),
                (lists::HAT_SHAPE, HAT_SHAPES),
            ]),
            BuiltinGroup::TargetConnectives => tables(&[
                (
                    lists::RANGE_CONNECTIVE,
                    &[
                        ("between", "rangeExclusive"),
                        ("past", "rangeInclusive"),
                        ("-", "rangeExcludingStart"),
                        ("until", "rangeExcludingEnd"),
                    ],
                ),
                (lists::LIST_CONNECTIVE, &[("and", "listConnective")]),
                (lists::RANGE_TYPE, &[("slice", "verticalRange")]),
                (lists::SWAP_CONNECTIVE, &[("with", "swapConnective")]),
                (lists::CALL_CONNECTIVE, &[("on", "callConnective")]),
            ]),
            BuiltinGroup::Positions => tables(&[
                (lists::POSITION, &[("before", "before"), ("after", "after")]),
                (lists::INSERTION_MODE_TO, &[("to", "to")]),
            ]),
            BuiltinGroup::CustomActions => tables(&[(lists::CUSTOM_ACTION, &[])]),
            BuiltinGroup::RegexScopeTypes => tables(&[(lists::CUSTOM_REGEX_SCOPE_TYPE, &[])]),
            BuiltinGroup::Snippets => tables(&[(lists::INSERTION_SNIPPET, &[])]),
        }
    }

    pub fn options(self) -> ReconcileOptions {
        match self {
            BuiltinGroup::ScopeTypes => ReconcileOptions {
                pluralize_lists: vec![
                    lists::SCOPE_TYPE.to_string(),
                    lists::GLYPH_SCOPE_TYPE.to_string(),
                ],
                ..Default::default()
            },
            BuiltinGroup::HatStyles => ReconcileOptions {
                extra_ignored_values: HAT_COLORS
                    .iter()
                    .chain(HAT_SHAPES)
                    .map(|(_, id)| id.to_string())
                    .collect(),
                ..Default::default()
            },
            BuiltinGroup::CustomActions => {
                catch_all(Headers::with_identifier("Command identifier"), lists::CUSTOM_ACTION)
            }
            BuiltinGroup::RegexScopeTypes => {
                catch_all(Headers::with_identifier("Regex"), lists::CUSTOM_REGEX_SCOPE_TYPE)
            }
            BuiltinGroup::Snippets => {
                catch_all(Headers::with_identifier("Snippet"), lists::INSERTION_SNIPPET)
            }
            _ => ReconcileOptions::default(),
        }
    }

    /// Table this group publishes when its override file has no rows.
    pub fn default_table(self) -> IdentifierTable {
        merge_tables(&self.defaults(), &[], &self.options())
    }
}

impl fmt::Display for BuiltinGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_id())
    }
}

impl FromStr for BuiltinGroup {
    type Err = UnknownGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim_end_matches(".csv");
        BuiltinGroup::ALL
            .into_iter()
            .find(|group| group.file_id() == id)
            .ok_or_else(|| UnknownGroup(s.to_string()))
    }
}

fn catch_all(headers: Headers, list: &str) -> ReconcileOptions {
    ReconcileOptions {
        headers,
        unknown_values: UnknownValues::Allow {
            list: list.to_string(),
        },
        ..Default::default()
    }
}

fn tables(entries: &[(&str, &[(&str, &str)])]) -> DefaultTables {
    entries
        .iter()
        .map(|(list, pairs)| {
            let map: SpokenFormMap = pairs
                .iter()
                .map(|(spoken, id)| (spoken.to_string(), id.to_string()))
                .collect();
            (list.to_string(), map)
        })
        .collect()
}

// ============================================================================
// Default spoken forms
// ============================================================================

const SIMPLE_ACTIONS: &[(&str, &str)] = &[
    ("append", "addSelection"),
    ("append post", "addSelectionAfter"),
    ("append pre", "addSelectionBefore"),
    ("break", "breakLine"),
    ("bottom", "scrollToBottom"),
    ("break point", "toggleLineBreakpoint"),
    ("carve", "cutToClipboard"),
    ("center", "scrollToCenter"),
    ("change", "clearAndSetSelection"),
    ("chuck", "remove"),
    ("clone up", "insertCopyBefore"),
    ("clone", "insertCopyAfter"),
    ("comment", "toggleLineComment"),
    ("copy", "copyToClipboard"),
    ("crown", "scrollToTop"),
    ("dedent", "outdentLine"),
    ("define", "revealDefinition"),
    ("drink", "editNewLineBefore"),
    ("drop", "insertEmptyLineBefore"),
    ("extract", "extractVariable"),
    ("float", "insertEmptyLineAfter"),
    ("fold", "foldRegion"),
    ("follow", "followLink"),
    ("follow split", "followLinkAside"),
    ("give", "deselect"),
    ("highlight", "highlight"),
    ("hover", "showHover"),
    ("increment", "increment"),
    ("decrement", "decrement"),
    ("indent", "indentLine"),
    ("inspect", "showDebugHover"),
    ("join", "joinLines"),
    ("post", "setSelectionAfter"),
    ("pour", "editNewLineAfter"),
    ("pre", "setSelectionBefore"),
    ("puff", "insertEmptyLinesAround"),
    ("quick fix", "showQuickFix"),
    ("reference", "showReferences"),
    ("rename", "rename"),
    ("reverse", "reverseTargets"),
    ("scout", "findInDocument"),
    ("scout all", "findInWorkspace"),
    ("shuffle", "randomizeTargets"),
    ("snippet make", "generateSnippet"),
    ("sort", "sortTargets"),
    ("take", "setSelection"),
    ("type deaf", "revealTypeDefinition"),
    ("unfold", "unfoldRegion"),
];

const SCOPE_TYPES: &[(&str, &str)] = &[
    ("arg", "argumentOrParameter"),
    ("attribute", "attribute"),
    ("call", "functionCall"),
    ("callee", "functionCallee"),
    ("class name", "className"),
    ("class", "class"),
    ("comment", "comment"),
    ("funk name", "functionName"),
    ("funk", "namedFunction"),
    ("if state", "ifStatement"),
    ("instance", "instance"),
    ("item", "collectionItem"),
    ("key", "collectionKey"),
    ("lambda", "anonymousFunction"),
    ("list", "list"),
    ("map", "map"),
    ("name", "name"),
    ("regex", "regularExpression"),
    ("section", "section"),
    ("selector", "selector"),
    ("state", "statement"),
    ("branch", "branch"),
    ("type", "type"),
    ("value", "value"),
    ("condition", "condition"),
    ("unit", "unit"),
    ("element", "xmlElement"),
    ("tags", "xmlBothTags"),
    ("start tag", "xmlStartTag"),
    ("end tag", "xmlEndTag"),
    ("command", "command"),
    ("char", "character"),
    ("sub", "word"),
    ("token", "token"),
    ("identifier", "identifier"),
    ("line", "line"),
    ("sentence", "sentence"),
    ("block", "paragraph"),
    ("short block", "boundedParagraph"),
    ("file", "document"),
    ("paint", "nonWhitespaceSequence"),
    ("short paint", "boundedNonWhitespaceSequence"),
    ("link", "url"),
    ("cell", "notebookCell"),
];

const PAIRED_DELIMITERS: &[(&str, &str)] = &[
    ("curly", "curlyBrackets"),
    ("diamond", "angleBrackets"),
    ("escaped quad", "escapedDoubleQuotes"),
    ("escaped twin", "escapedSingleQuotes"),
    ("escaped round", "escapedParentheses"),
    ("escaped box", "escapedSquareBrackets"),
    ("quad", "doubleQuotes"),
    ("round", "parentheses"),
    ("skis", "backtickQuotes"),
    ("box", "squareBrackets"),
    ("twin", "singleQuotes"),
    ("void", "whitespace"),
];

const SIMPLE_MODIFIERS: &[(&str, &str)] = &[
    ("bounds", "excludeInterior"),
    ("just", "toRawSelection"),
    ("leading", "leading"),
    ("trailing", "trailing"),
    ("content", "keepContentFilter"),
    ("empty", "keepEmptyFilter"),
    ("its", "inferPreviousMark"),
    ("inside", "interiorOnly"),
    ("visible", "visible"),
];

const HAT_COLORS: &[(&str, &str)] = &[
    ("blue", "blue"),
    ("green", "green"),
    ("red", "red"),
    ("pink", "pink"),
    ("yellow", "yellow"),
    ("navy", "userColor1"),
    ("apricot", "userColor2"),
];

const HAT_SHAPES: &[(&str, &str)] = &[
    ("ex", "ex"),
    ("fox", "fox"),
    ("wing", "wing"),
    ("hole", "hole"),
    ("frame", "frame"),
    ("curve", "curve"),
    ("eye", "eye"),
    ("play", "play"),
    ("cross", "crosshairs"),
    ("bolt", "bolt"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::default_identifiers;
    use std::collections::HashSet;

    #[test]
    fn test_group_names_round_trip() {
        for group in BuiltinGroup::ALL {
            assert_eq!(group.file_id().parse::<BuiltinGroup>(), Ok(group));
        }
        assert_eq!("actions.csv".parse::<BuiltinGroup>(), Ok(BuiltinGroup::Actions));
        assert!("nope".parse::<BuiltinGroup>().is_err());
    }

    #[test]
    fn test_identifiers_unique_within_each_group() {
        for group in BuiltinGroup::ALL {
            let defaults = group.defaults();
            let total: usize = defaults.values().map(|list| list.len()).sum();
            assert_eq!(
                default_identifiers(&defaults).len(),
                total,
                "duplicate identifier in {group}"
            );
        }
    }

    #[test]
    fn test_spoken_forms_unique_within_each_group() {
        for group in BuiltinGroup::ALL {
            let mut seen = HashSet::new();
            for list in group.defaults().values() {
                for spoken in list.keys() {
                    assert!(seen.insert(spoken.clone()), "{spoken} repeated in {group}");
                }
            }
        }
    }

    #[test]
    fn test_experimental_groups_accept_unknown_values() {
        let options = BuiltinGroup::CustomActions.options();
        assert_eq!(options.headers.identifier, "Command identifier");
        assert!(options.unknown_values.allowed());
        assert!(!BuiltinGroup::Actions.options().unknown_values.allowed());
    }

    #[test]
    fn test_default_table_includes_plurals() {
        let table = BuiltinGroup::ScopeTypes.default_table();
        assert_eq!(table.lookup(lists::SCOPE_TYPE_PLURAL, "funks"), crate::Lookup::Found("namedFunction"));
        assert_eq!(table.lookup(lists::GLYPH_SCOPE_TYPE_PLURAL, "glyphs"), crate::Lookup::Found("glyph"));
        assert!(BuiltinGroup::CustomActions.default_table().list(lists::CUSTOM_ACTION).is_some());
    }
}
