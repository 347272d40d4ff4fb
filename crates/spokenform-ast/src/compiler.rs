//! Command-AST builders
//!
//! Each `build_*` function assembles one node from parts that the grammar
//! layer has already resolved. Optional parts are passed as `Option`, never
//! probed for.
//!
//! Structural rules enforced here:
//!
//! - a list of one element is that element
//! - a range without a spoken connective includes both endpoints
//! - a position attaches to the first primitive of a target tree
//! - single-target actions refuse list targets

use crate::action::{
    paired_delimiter_text, ActionDescriptor, BringMoveAction, ComplexAction, CustomSnippet,
    ExecuteCommandAction, GenerateSnippetAction, GetTextAction, HighlightAction,
    InsertSnippetAction, InsertSnippetArg, NamedSnippet, SimpleActionName, WrapAction,
};
use crate::destination::{Destination, InsertionMode, ListDestination, PrimitiveDestination};
use crate::mark::{DecoratedSymbolMark, LineNumberMark, LineNumberType, Mark};
use crate::modifier::{
    ContainingScopeModifier, Direction, HeadTailModifier, Modifier, OrdinalScopeModifier,
    RelativeScopeModifier, ScopeModifier, TargetPosition,
};
use crate::scope::ScopeType;
use crate::target::{
    ListElement, ListTarget, PrimitiveTarget, RangeAnchor, RangeTarget, RangeType, Target,
};
use spokenform_vocab::Lookup;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// An action that needs one target was given several.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{action}' requires a single target, got a list of {count}")]
pub struct AmbiguousTargetError {
    pub action: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("cannot build an empty {0}")]
    Empty(&'static str),

    #[error("no {list} entry for '{spoken_form}'")]
    UnknownSpokenForm { list: String, spoken_form: String },

    #[error("unknown {kind} identifier '{identifier}'")]
    UnknownIdentifier { kind: &'static str, identifier: String },

    #[error(transparent)]
    Ambiguous(#[from] AmbiguousTargetError),
}

pub type Result<T> = std::result::Result<T, CompileError>;

// ============================================================================
// Targets
// ============================================================================

pub fn build_primitive(mark: Option<Mark>, modifiers: Vec<Modifier>) -> PrimitiveTarget {
    PrimitiveTarget { mark, modifiers }
}

/// Range connective identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeConnective {
    #[default]
    Inclusive,
    Exclusive,
    ExcludingStart,
    ExcludingEnd,
}

impl RangeConnective {
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "rangeInclusive" => Some(RangeConnective::Inclusive),
            "rangeExclusive" => Some(RangeConnective::Exclusive),
            "rangeExcludingStart" => Some(RangeConnective::ExcludingStart),
            "rangeExcludingEnd" => Some(RangeConnective::ExcludingEnd),
            _ => None,
        }
    }

    pub fn identifier(self) -> &'static str {
        match self {
            RangeConnective::Inclusive => "rangeInclusive",
            RangeConnective::Exclusive => "rangeExclusive",
            RangeConnective::ExcludingStart => "rangeExcludingStart",
            RangeConnective::ExcludingEnd => "rangeExcludingEnd",
        }
    }

    /// `(exclude_anchor, exclude_active)`
    pub fn exclusions(self) -> (bool, bool) {
        match self {
            RangeConnective::Inclusive => (false, false),
            RangeConnective::Exclusive => (true, true),
            RangeConnective::ExcludingStart => (true, false),
            RangeConnective::ExcludingEnd => (false, true),
        }
    }

    pub fn from_exclusions(exclude_anchor: bool, exclude_active: bool) -> Self {
        match (exclude_anchor, exclude_active) {
            (false, false) => RangeConnective::Inclusive,
            (true, true) => RangeConnective::Exclusive,
            (true, false) => RangeConnective::ExcludingStart,
            (false, true) => RangeConnective::ExcludingEnd,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeConnectiveWithType {
    pub connective: RangeConnective,
    pub range_type: Option<RangeType>,
}

/// Range from `anchor` (the current selection when absent) to `active`.
pub fn build_range(
    anchor: Option<PrimitiveTarget>,
    connective: Option<RangeConnectiveWithType>,
    active: PrimitiveTarget,
) -> RangeTarget {
    let connective = connective.unwrap_or_default();
    let (exclude_anchor, exclude_active) = connective.connective.exclusions();
    RangeTarget {
        anchor: anchor.map_or(RangeAnchor::Implicit, RangeAnchor::Primitive),
        active,
        exclude_anchor,
        exclude_active,
        range_type: connective.range_type,
    }
}

/// List target; a single element is returned as itself.
pub fn build_list(elements: Vec<ListElement>) -> Result<Target> {
    let mut elements = elements;
    match elements.len() {
        0 => Err(CompileError::Empty("target list")),
        1 => Ok(elements.remove(0).into()),
        _ => Ok(Target::List(ListTarget { elements })),
    }
}

/// Prepend `position` to the first primitive reachable from `target`.
pub fn attach_position(target: &mut Target, position: TargetPosition) {
    if matches!(target, Target::Implicit) {
        *target = Target::Primitive(PrimitiveTarget::default());
    }
    if let Some(primitive) = target.first_primitive_mut() {
        primitive.modifiers.insert(0, Modifier::Position { position });
    }
}

pub fn build_positional(mut target: Target, position: TargetPosition) -> Target {
    attach_position(&mut target, position);
    target
}

// ============================================================================
// Destinations
// ============================================================================

pub fn build_destination(insertion_mode: InsertionMode, target: Target) -> PrimitiveDestination {
    PrimitiveDestination {
        insertion_mode,
        target,
    }
}

/// List destination; a single element is returned as itself.
pub fn build_destination_list(destinations: Vec<PrimitiveDestination>) -> Result<Destination> {
    let mut destinations = destinations;
    match destinations.len() {
        0 => Err(CompileError::Empty("destination list")),
        1 => Ok(Destination::Primitive(destinations.remove(0))),
        _ => Ok(Destination::List(ListDestination { destinations })),
    }
}

// ============================================================================
// Marks
// ============================================================================

pub fn build_decorated_symbol(color: Option<&str>, shape: Option<&str>, character: &str) -> Mark {
    Mark::DecoratedSymbol(DecoratedSymbolMark::new(color, shape, character))
}

/// Mark for a `special_mark` identifier.
pub fn build_special_mark(identifier: &str) -> Lookup<Mark> {
    match identifier {
        "currentSelection" | "cursor" => Lookup::Found(Mark::Cursor),
        "previousTarget" | "that" => Lookup::Found(Mark::That),
        "previousSource" | "source" => Lookup::Found(Mark::Source),
        "nothing" => Lookup::Found(Mark::Nothing),
        "keyboard" => Lookup::Found(Mark::Keyboard),
        "lastCursorPosition" => Lookup::Found(Mark::LastCursorPosition),
        _ => Lookup::NotFound,
    }
}

/// Line-number mark for a `line_direction` identifier and a spoken number.
pub fn build_line_number(direction: &str, number: u32) -> Result<Mark> {
    let number = i64::from(number);
    let (line_number_type, line_number) = match direction {
        "lineNumberModulo100" => (LineNumberType::Modulo100, number - 1),
        "lineNumberRelativeUp" => (LineNumberType::Relative, -number),
        "lineNumberRelativeDown" => (LineNumberType::Relative, number),
        other => {
            return Err(CompileError::UnknownIdentifier {
                kind: "line direction",
                identifier: other.to_string(),
            })
        }
    };
    Ok(Mark::LineNumber(LineNumberMark {
        line_number_type,
        line_number,
    }))
}

pub fn build_range_mark(anchor: Mark, connective: Option<RangeConnective>, active: Mark) -> Mark {
    let (exclude_anchor, exclude_active) = connective.unwrap_or_default().exclusions();
    Mark::Range(crate::mark::RangeMark {
        anchor: Box::new(anchor),
        active: Box::new(active),
        exclude_anchor,
        exclude_active,
    })
}

// ============================================================================
// Modifiers
// ============================================================================

pub fn build_containing_scope(scope_type: ScopeType, ancestor_index: Option<u32>) -> Modifier {
    Modifier::ContainingScope(ContainingScopeModifier {
        scope_type,
        ancestor_index: ancestor_index.filter(|index| *index > 0),
    })
}

pub fn build_every_scope(scope_type: ScopeType) -> Modifier {
    Modifier::EveryScope(ScopeModifier { scope_type })
}

/// `first n <scope>` or `last n <scope>`; `from_end` counts backwards.
pub fn build_ordinal_range(scope_type: ScopeType, length: u32, from_end: bool) -> Modifier {
    let length = length.max(1);
    let start = if from_end { -i64::from(length) } else { 0 };
    Modifier::OrdinalScope(OrdinalScopeModifier {
        scope_type,
        start,
        length,
        is_every: Some(true).filter(|_| length > 1),
    })
}

/// `<ordinal> <scope>` such as `third funk` (`index` is 0 based) or
/// `last funk` with `from_end`.
pub fn build_nth(scope_type: ScopeType, index: u32, from_end: bool) -> Modifier {
    let start = if from_end {
        -i64::from(index) - 1
    } else {
        i64::from(index)
    };
    Modifier::OrdinalScope(OrdinalScopeModifier {
        scope_type,
        start,
        length: 1,
        is_every: None,
    })
}

/// Relative scope identifiers from the `previous_next_modifier` and
/// `forward_backward_modifier` lists.
pub fn build_relative_scope(
    scope_type: ScopeType,
    identifier: &str,
    count: Option<u32>,
) -> Result<Modifier> {
    let (direction, offset, length) = match (identifier, count) {
        ("next", count) => (Direction::Forward, count.unwrap_or(1), 1),
        ("previous", count) => (Direction::Backward, count.unwrap_or(1), 1),
        ("forward", count) => (Direction::Forward, 0, count.unwrap_or(1)),
        ("backward", count) => (Direction::Backward, 0, count.unwrap_or(1)),
        (other, _) => {
            return Err(CompileError::UnknownIdentifier {
                kind: "relative scope",
                identifier: other.to_string(),
            })
        }
    };
    Ok(Modifier::RelativeScope(RelativeScopeModifier {
        scope_type,
        offset,
        length,
        direction,
        is_every: None,
    }))
}

/// `head`/`tail`, optionally limited by the modifiers spoken after it.
pub fn build_head_tail(identifier: &str, modifiers: Vec<Modifier>) -> Result<Modifier> {
    let inner = HeadTailModifier {
        modifiers: Some(modifiers).filter(|m| !m.is_empty()),
    };
    match identifier {
        "extendThroughStartOf" => Ok(Modifier::ExtendThroughStartOf(inner)),
        "extendThroughEndOf" => Ok(Modifier::ExtendThroughEndOf(inner)),
        other => Err(CompileError::UnknownIdentifier {
            kind: "head/tail modifier",
            identifier: other.to_string(),
        }),
    }
}

/// Argument-free modifier from the `simple_modifier` or `start_end_modifier` lists.
pub fn build_simple_modifier(identifier: &str) -> Result<Modifier> {
    Modifier::unit(identifier).ok_or_else(|| CompileError::UnknownIdentifier {
        kind: "modifier",
        identifier: identifier.to_string(),
    })
}

// ============================================================================
// Actions
// ============================================================================

/// Actions that act on exactly one target.
pub const SINGLE_TARGET_ACTIONS: &[&str] = &[
    "findInDocument",
    "findInWorkspace",
    "getText",
    "rename",
    "generateSnippet",
];

pub fn ensure_single_target(action: &str, target: &Target) -> std::result::Result<(), AmbiguousTargetError> {
    match target {
        Target::List(list) if SINGLE_TARGET_ACTIONS.contains(&action) => Err(AmbiguousTargetError {
            action: action.to_string(),
            count: list.elements.len(),
        }),
        _ => Ok(()),
    }
}

/// Action taking one target, by identifier from the `simple_action` list.
pub fn build_simple_action(identifier: &str, target: Target) -> Result<ActionDescriptor> {
    ensure_single_target(identifier, &target)?;
    let complex = match identifier {
        "highlight" => ComplexAction::Highlight(HighlightAction {
            highlight_id: None,
            target,
        }),
        "generateSnippet" => ComplexAction::GenerateSnippet(GenerateSnippetAction {
            directory: None,
            snippet_name: None,
            target,
        }),
        "getText" => ComplexAction::GetText(GetTextAction {
            options: None,
            target,
        }),
        _ => {
            let name: SimpleActionName = identifier.parse().map_err(|_| CompileError::UnknownIdentifier {
                kind: "action",
                identifier: identifier.to_string(),
            })?;
            return Ok(ActionDescriptor::simple(name, target));
        }
    };
    Ok(ActionDescriptor::Complex(complex))
}

/// `bring`/`move`; without a destination the source lands at the cursor.
pub fn build_bring_move(
    identifier: &str,
    source: Target,
    destination: Option<Destination>,
) -> Result<ActionDescriptor> {
    let action = BringMoveAction {
        source,
        destination: destination.unwrap_or(Destination::Implicit),
    };
    let complex = match identifier {
        "replaceWithTarget" => ComplexAction::ReplaceWithTarget(action),
        "moveToTarget" => ComplexAction::MoveToTarget(action),
        other => {
            return Err(CompileError::UnknownIdentifier {
                kind: "bring/move action",
                identifier: other.to_string(),
            })
        }
    };
    Ok(ActionDescriptor::Complex(complex))
}

/// `swap a with b`; `swap b` swaps the selection with `b`.
pub fn build_swap(target1: Option<Target>, target2: Target) -> ActionDescriptor {
    ActionDescriptor::Complex(ComplexAction::SwapTargets {
        target1: target1.unwrap_or(Target::Implicit),
        target2,
    })
}

/// `call a on b`; the argument defaults to the selection.
pub fn build_call(callee: Target, argument: Option<Target>) -> ActionDescriptor {
    ActionDescriptor::Complex(ComplexAction::CallAsFunction {
        callee,
        argument: argument.unwrap_or(Target::Implicit),
    })
}

pub fn build_wrap(identifier: &str, delimiter: &str, target: Target) -> Result<ActionDescriptor> {
    let (left, right) = paired_delimiter_text(delimiter).ok_or_else(|| CompileError::UnknownIdentifier {
        kind: "paired delimiter",
        identifier: delimiter.to_string(),
    })?;
    let action = WrapAction {
        left: left.to_string(),
        right: right.to_string(),
        target,
    };
    let complex = match identifier {
        "wrapWithPairedDelimiter" => ComplexAction::WrapWithPairedDelimiter(action),
        "rewrapWithPairedDelimiter" | "rewrap" => ComplexAction::RewrapWithPairedDelimiter(action),
        other => {
            return Err(CompileError::UnknownIdentifier {
                kind: "wrap action",
                identifier: other.to_string(),
            })
        }
    };
    Ok(ActionDescriptor::Complex(complex))
}

pub fn build_paste(destination: Destination) -> ActionDescriptor {
    ActionDescriptor::Complex(ComplexAction::PasteFromClipboard { destination })
}

pub fn build_edit_new(destination: Destination) -> ActionDescriptor {
    ActionDescriptor::Complex(ComplexAction::EditNew { destination })
}

/// A catalog snippet by name, otherwise `phrase` is a custom body.
pub fn build_snippet(catalog: Lookup<&str>, phrase: &str) -> InsertSnippetArg {
    match catalog {
        Lookup::Found(name) => InsertSnippetArg::Named(NamedSnippet {
            name: name.to_string(),
            substitutions: None,
        }),
        Lookup::NotFound => {
            tracing::debug!(phrase, "no catalog snippet, using phrase as body");
            InsertSnippetArg::Custom(CustomSnippet {
                body: phrase.to_string(),
                language_id: None,
                scope_types: None,
                substitutions: None,
            })
        }
    }
}

pub fn build_insert_snippet(snippet: InsertSnippetArg, destination: Option<Destination>) -> ActionDescriptor {
    ActionDescriptor::Complex(ComplexAction::InsertSnippet(InsertSnippetAction {
        snippet_description: snippet,
        destination: destination.unwrap_or(Destination::Implicit),
    }))
}

/// Editor command run against a target, from the `custom_action` list.
pub fn build_execute_command(command_id: &str, target: Target) -> ActionDescriptor {
    ActionDescriptor::Complex(ComplexAction::ExecuteCommand(ExecuteCommandAction {
        command_id: command_id.to_string(),
        options: None,
        target,
    }))
}

/// Check an already-built action against the single-target rule.
pub fn validate_action(action: &ActionDescriptor) -> std::result::Result<(), AmbiguousTargetError> {
    action
        .targets()
        .into_iter()
        .try_for_each(|target| ensure_single_target(action.name(), target))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hat(character: &str) -> PrimitiveTarget {
        build_primitive(Some(build_decorated_symbol(None, None, character)), vec![])
    }

    #[test]
    fn test_range_default_is_inclusive() {
        let range = build_range(Some(hat("a")), None, hat("b"));
        assert!(!range.exclude_anchor);
        assert!(!range.exclude_active);
        assert_eq!(range.range_type, None);
    }

    #[test]
    fn test_range_connectives() {
        for (identifier, expected) in [
            ("rangeInclusive", (false, false)),
            ("rangeExclusive", (true, true)),
            ("rangeExcludingStart", (true, false)),
            ("rangeExcludingEnd", (false, true)),
        ] {
            let connective = RangeConnective::from_identifier(identifier).unwrap();
            assert_eq!(connective.exclusions(), expected);
            assert_eq!(RangeConnective::from_exclusions(expected.0, expected.1), connective);
            assert_eq!(connective.identifier(), identifier);
        }
    }

    #[test]
    fn test_range_shorthand_has_implicit_anchor() {
        let connective = RangeConnectiveWithType {
            connective: RangeConnective::Exclusive,
            range_type: Some(RangeType::Vertical),
        };
        let range = build_range(None, Some(connective), hat("b"));
        assert_eq!(range.anchor, RangeAnchor::Implicit);
        assert!(range.exclude_anchor && range.exclude_active);
        assert_eq!(range.range_type, Some(RangeType::Vertical));
    }

    #[test]
    fn test_singleton_list_collapses() {
        let target = build_list(vec![ListElement::Primitive(hat("a"))]).unwrap();
        assert_eq!(target, Target::Primitive(hat("a")));
        assert_eq!(build_list(vec![]), Err(CompileError::Empty("target list")));

        let list = build_list(vec![ListElement::Primitive(hat("a")), ListElement::Primitive(hat("b"))]).unwrap();
        assert!(list.is_list());
    }

    #[test]
    fn test_singleton_destination_collapses() {
        let destination = build_destination(InsertionMode::After, Target::Primitive(hat("a")));
        assert_eq!(
            build_destination_list(vec![destination.clone()]).unwrap(),
            Destination::Primitive(destination)
        );
    }

    #[test]
    fn test_position_attaches_to_first_primitive_only() {
        let mut target = build_list(vec![
            ListElement::Range(build_range(Some(hat("a")), None, hat("b"))),
            ListElement::Primitive(hat("c")),
        ])
        .unwrap();
        attach_position(&mut target, TargetPosition::After);

        let Target::List(list) = &target else {
            panic!("expected list");
        };
        let ListElement::Range(range) = &list.elements[0] else {
            panic!("expected range");
        };
        let RangeAnchor::Primitive(anchor) = &range.anchor else {
            panic!("expected primitive anchor");
        };
        assert_eq!(
            anchor.modifiers,
            vec![Modifier::Position {
                position: TargetPosition::After
            }]
        );
        assert!(range.active.modifiers.is_empty());
        assert_eq!(list.elements[1], ListElement::Primitive(hat("c")));
    }

    #[test]
    fn test_position_is_outermost_modifier() {
        let mut target = Target::Primitive(build_primitive(
            None,
            vec![build_containing_scope(ScopeType::simple("line"), None)],
        ));
        attach_position(&mut target, TargetPosition::Before);
        let Target::Primitive(primitive) = target else {
            panic!("expected primitive");
        };
        assert_eq!(primitive.modifiers[0].type_name(), "position");
        assert_eq!(primitive.modifiers[1].type_name(), "containingScope");
    }

    #[test]
    fn test_position_on_implicit_range_anchor() {
        let mut target = Target::Range(build_range(None, None, hat("b")));
        attach_position(&mut target, TargetPosition::Start);
        let Target::Range(range) = target else {
            panic!("expected range");
        };
        assert_eq!(
            range.anchor,
            RangeAnchor::Primitive(build_primitive(
                None,
                vec![Modifier::Position {
                    position: TargetPosition::Start
                }]
            ))
        );
    }

    #[test]
    fn test_line_numbers() {
        let expect = |direction, number, kind, line| {
            assert_eq!(
                build_line_number(direction, number).unwrap(),
                Mark::LineNumber(LineNumberMark {
                    line_number_type: kind,
                    line_number: line
                })
            );
        };
        expect("lineNumberModulo100", 12, LineNumberType::Modulo100, 11);
        expect("lineNumberRelativeUp", 3, LineNumberType::Relative, -3);
        expect("lineNumberRelativeDown", 2, LineNumberType::Relative, 2);
        assert!(build_line_number("sideways", 1).is_err());
    }

    #[test]
    fn test_special_marks() {
        assert_eq!(build_special_mark("currentSelection"), Lookup::Found(Mark::Cursor));
        assert_eq!(build_special_mark("previousTarget"), Lookup::Found(Mark::That));
        assert_eq!(build_special_mark("elsewhere"), Lookup::NotFound);
    }

    #[test]
    fn test_ordinal_and_relative_modifiers() {
        let funk = || ScopeType::simple("namedFunction");
        assert_eq!(
            build_ordinal_range(funk(), 3, true),
            Modifier::OrdinalScope(OrdinalScopeModifier {
                scope_type: funk(),
                start: -3,
                length: 3,
                is_every: Some(true),
            })
        );
        assert_eq!(
            build_nth(funk(), 0, true),
            Modifier::OrdinalScope(OrdinalScopeModifier {
                scope_type: funk(),
                start: -1,
                length: 1,
                is_every: None,
            })
        );
        assert_eq!(
            build_relative_scope(funk(), "previous", Some(2)).unwrap(),
            Modifier::RelativeScope(RelativeScopeModifier {
                scope_type: funk(),
                offset: 2,
                length: 1,
                direction: Direction::Backward,
                is_every: None,
            })
        );
        assert_eq!(
            build_relative_scope(funk(), "forward", Some(3)).unwrap(),
            Modifier::RelativeScope(RelativeScopeModifier {
                scope_type: funk(),
                offset: 0,
                length: 3,
                direction: Direction::Forward,
                is_every: None,
            })
        );
    }

    #[test]
    fn test_head_tail() {
        assert_eq!(
            build_head_tail("extendThroughEndOf", vec![]).unwrap(),
            Modifier::ExtendThroughEndOf(HeadTailModifier { modifiers: None })
        );
        assert!(build_head_tail("extendThroughMiddle", vec![]).is_err());
    }

    #[test]
    fn test_single_target_actions_reject_lists() {
        let list = build_list(vec![ListElement::Primitive(hat("a")), ListElement::Primitive(hat("b"))]).unwrap();
        let err = build_simple_action("findInDocument", list.clone()).unwrap_err();
        assert_eq!(
            err,
            CompileError::Ambiguous(AmbiguousTargetError {
                action: "findInDocument".to_string(),
                count: 2,
            })
        );
        assert!(build_simple_action("remove", list.clone()).is_ok());
        assert!(matches!(
            build_simple_action("getText", list),
            Err(CompileError::Ambiguous(_))
        ));
    }

    #[test]
    fn test_simple_action_special_cases() {
        let action = build_simple_action("highlight", Target::Implicit).unwrap();
        assert_eq!(action.name(), "highlight");
        let action = build_simple_action("generateSnippet", Target::Implicit).unwrap();
        assert_eq!(action.name(), "generateSnippet");
        assert!(build_simple_action("teleport", Target::Implicit).is_err());
    }

    #[test]
    fn test_wrap_resolves_delimiter_text() {
        let action = build_wrap("wrapWithPairedDelimiter", "squareBrackets", Target::Implicit).unwrap();
        let ActionDescriptor::Complex(ComplexAction::WrapWithPairedDelimiter(wrap)) = action else {
            panic!("expected wrap");
        };
        assert_eq!((wrap.left.as_str(), wrap.right.as_str()), ("[", "]"));
        assert!(build_wrap("wrapWithPairedDelimiter", "any", Target::Implicit).is_err());
    }

    #[test]
    fn test_snippet_lookup_branches() {
        assert_eq!(
            build_snippet(Lookup::Found("ifStatement"), "if state"),
            InsertSnippetArg::Named(NamedSnippet {
                name: "ifStatement".to_string(),
                substitutions: None,
            })
        );
        let InsertSnippetArg::Custom(custom) = build_snippet(Lookup::NotFound, "hello $0") else {
            panic!("expected custom snippet");
        };
        assert_eq!(custom.body, "hello $0");
    }

    #[test]
    fn test_validate_action_checks_every_target() {
        let list = build_list(vec![ListElement::Primitive(hat("a")), ListElement::Primitive(hat("b"))]).unwrap();
        let action = ActionDescriptor::Complex(ComplexAction::GetText(GetTextAction {
            options: None,
            target: list,
        }));
        assert!(validate_action(&action).is_err());
        assert!(validate_action(&build_swap(None, Target::Implicit)).is_ok());
    }
}
