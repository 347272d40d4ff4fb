//! Spoken form of a command, reconstructed from the current vocabulary.
//!
//! Used by help output and by tests that check a command can still be said
//! after the user renamed things.

use crate::action::{paired_delimiter_text, ActionDescriptor, ComplexAction, InsertSnippetArg};
use crate::compiler::RangeConnective;
use crate::destination::{Destination, PrimitiveDestination};
use crate::grammar::{Vocabulary, ACTION_LISTS};
use crate::mark::{LineNumberType, Mark, DEFAULT_HAT_COLOR};
use crate::modifier::{Direction, Modifier, TargetPosition};
use crate::scope::ScopeType;
use crate::target::{ListElement, PrimitiveTarget, RangeAnchor, RangeTarget, RangeType, Target};
use spokenform_vocab::{lists, Lookup};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescribeError {
    #[error("no spoken form for {kind} '{identifier}'")]
    UnknownIdentifier { kind: &'static str, identifier: String },

    #[error("{0} has no spoken form")]
    Unsupported(String),
}

type Result<T> = std::result::Result<T, DescribeError>;

const PAIRED_DELIMITER_IDS: &[&str] = &[
    "curlyBrackets",
    "angleBrackets",
    "escapedDoubleQuotes",
    "escapedSingleQuotes",
    "escapedParentheses",
    "escapedSquareBrackets",
    "doubleQuotes",
    "parentheses",
    "backtickQuotes",
    "squareBrackets",
    "singleQuotes",
    "whitespace",
];

/// Spoken form of `action`, words separated by single spaces.
pub fn describe_action(vocabulary: &Vocabulary, action: &ActionDescriptor) -> Result<String> {
    Describer { vocabulary }.action(action)
}

pub fn describe_target(vocabulary: &Vocabulary, target: &Target) -> Result<String> {
    let mut words = Vec::new();
    Describer { vocabulary }.target(target, &mut words)?;
    Ok(words.join(" "))
}

struct Describer<'a> {
    vocabulary: &'a Vocabulary,
}

impl<'a> Describer<'a> {
    fn word(&self, lists: &[&str], kind: &'static str, identifier: &str) -> Result<String> {
        match self.vocabulary.spoken_form(lists, identifier) {
            Lookup::Found(spoken) => Ok(spoken.to_string()),
            Lookup::NotFound => Err(DescribeError::UnknownIdentifier {
                kind,
                identifier: identifier.to_string(),
            }),
        }
    }

    fn action(&self, action: &ActionDescriptor) -> Result<String> {
        let first = match action {
            ActionDescriptor::Complex(ComplexAction::ExecuteCommand(command)) => {
                self.word(&[lists::CUSTOM_ACTION], "command", &command.command_id)?
            }
            _ => self.word(ACTION_LISTS, "action", action.name())?,
        };
        let mut words = vec![first];
        let complex = match action {
            ActionDescriptor::Simple(simple) => {
                self.target(&simple.target, &mut words)?;
                return Ok(words.join(" "));
            }
            ActionDescriptor::Complex(complex) => complex,
        };
        match complex {
            ComplexAction::Highlight(highlight) => self.target(&highlight.target, &mut words)?,
            ComplexAction::GenerateSnippet(generate) => self.target(&generate.target, &mut words)?,
            ComplexAction::GetText(get_text) => self.target(&get_text.target, &mut words)?,
            ComplexAction::ReplaceWithTarget(bring) | ComplexAction::MoveToTarget(bring) => {
                self.target(&bring.source, &mut words)?;
                self.destination(&bring.destination, &mut words)?;
            }
            ComplexAction::SwapTargets { target1, target2 } => {
                if !matches!(target1, Target::Implicit) {
                    self.target(target1, &mut words)?;
                    words.push(self.word(&[lists::SWAP_CONNECTIVE], "swap connective", "swapConnective")?);
                }
                self.target(target2, &mut words)?;
            }
            ComplexAction::CallAsFunction { callee, argument } => {
                self.target(callee, &mut words)?;
                if !matches!(argument, Target::Implicit) {
                    words.push(self.word(&[lists::CALL_CONNECTIVE], "call connective", "callConnective")?);
                    self.target(argument, &mut words)?;
                }
            }
            ComplexAction::WrapWithPairedDelimiter(wrap) | ComplexAction::RewrapWithPairedDelimiter(wrap) => {
                let delimiter = PAIRED_DELIMITER_IDS
                    .iter()
                    .find(|id| paired_delimiter_text(id) == Some((wrap.left.as_str(), wrap.right.as_str())))
                    .ok_or_else(|| DescribeError::Unsupported(format!("wrap with '{}' '{}'", wrap.left, wrap.right)))?;
                words.insert(0, self.word(&[lists::PAIRED_DELIMITER], "paired delimiter", delimiter)?);
                self.target(&wrap.target, &mut words)?;
            }
            ComplexAction::PasteFromClipboard { destination } => self.destination(destination, &mut words)?,
            ComplexAction::InsertSnippet(insert) => {
                match &insert.snippet_description {
                    InsertSnippetArg::Named(named) => {
                        words.push(self.word(&[lists::INSERTION_SNIPPET], "snippet", &named.name)?)
                    }
                    _ => return Err(DescribeError::Unsupported("custom snippet".to_string())),
                }
                self.destination(&insert.destination, &mut words)?;
            }
            ComplexAction::ExecuteCommand(command) => self.target(&command.target, &mut words)?,
            other => return Err(DescribeError::Unsupported(other.name().to_string())),
        }
        Ok(words.join(" "))
    }

    fn destination(&self, destination: &Destination, words: &mut Vec<String>) -> Result<()> {
        match destination {
            Destination::Implicit => Ok(()),
            Destination::Primitive(primitive) => self.primitive_destination(primitive, words),
            Destination::List(list) => {
                for (index, primitive) in list.destinations.iter().enumerate() {
                    if index > 0 {
                        words.push(self.list_connective()?);
                    }
                    self.primitive_destination(primitive, words)?;
                }
                Ok(())
            }
        }
    }

    fn primitive_destination(&self, destination: &PrimitiveDestination, words: &mut Vec<String>) -> Result<()> {
        let mode = destination.insertion_mode.as_str();
        words.push(self.word(&[lists::INSERTION_MODE_TO, lists::POSITION], "insertion mode", mode)?);
        self.target(&destination.target, words)
    }

    fn list_connective(&self) -> Result<String> {
        self.word(&[lists::LIST_CONNECTIVE], "list connective", "listConnective")
    }

    fn target(&self, target: &Target, words: &mut Vec<String>) -> Result<()> {
        match target {
            Target::Implicit => Ok(()),
            Target::Primitive(primitive) => self.primitive(primitive, words),
            Target::Range(range) => self.range(range, words),
            Target::List(list) => {
                for (index, element) in list.elements.iter().enumerate() {
                    if index > 0 {
                        words.push(self.list_connective()?);
                    }
                    match element {
                        ListElement::Primitive(primitive) => self.primitive(primitive, words)?,
                        ListElement::Range(range) => self.range(range, words)?,
                    }
                }
                Ok(())
            }
        }
    }

    fn range(&self, range: &RangeTarget, words: &mut Vec<String>) -> Result<()> {
        if let RangeAnchor::Primitive(anchor) = &range.anchor {
            self.primitive(anchor, words)?;
        }
        let connective = RangeConnective::from_exclusions(range.exclude_anchor, range.exclude_active);
        let vertical = range.range_type == Some(RangeType::Vertical);
        if vertical {
            words.push(self.word(&[lists::RANGE_TYPE], "range type", "verticalRange")?);
        }
        if !vertical || connective != RangeConnective::Inclusive {
            words.push(self.word(&[lists::RANGE_CONNECTIVE], "range connective", connective.identifier())?);
        }
        self.primitive(&range.active, words)
    }

    fn primitive(&self, primitive: &PrimitiveTarget, words: &mut Vec<String>) -> Result<()> {
        for modifier in &primitive.modifiers {
            self.modifier(modifier, words)?;
        }
        match &primitive.mark {
            Some(mark) => self.mark(mark, words),
            None => Ok(()),
        }
    }

    fn mark(&self, mark: &Mark, words: &mut Vec<String>) -> Result<()> {
        let special = |id| self.word(&[lists::SPECIAL_MARK], "special mark", id);
        match mark {
            Mark::Cursor => words.push(special("currentSelection")?),
            Mark::That => words.push(special("previousTarget")?),
            Mark::Source => words.push(special("previousSource")?),
            Mark::Nothing => words.push(special("nothing")?),
            Mark::DecoratedSymbol(symbol) => {
                let (color, shape) = symbol.style();
                if color != DEFAULT_HAT_COLOR {
                    words.push(self.word(&[lists::HAT_COLOR], "hat color", color)?);
                }
                if let Some(shape) = shape {
                    words.push(self.word(&[lists::HAT_SHAPE], "hat shape", shape)?);
                }
                words.push(symbol.character.clone());
            }
            Mark::LineNumber(line) => {
                let (direction, number) = match line.line_number_type {
                    LineNumberType::Modulo100 => ("lineNumberModulo100", line.line_number + 1),
                    LineNumberType::Relative if line.line_number < 0 => ("lineNumberRelativeUp", -line.line_number),
                    LineNumberType::Relative => ("lineNumberRelativeDown", line.line_number),
                    LineNumberType::Absolute => {
                        return Err(DescribeError::Unsupported("absolute line number".to_string()))
                    }
                };
                words.push(self.word(&[lists::LINE_DIRECTION], "line direction", direction)?);
                words.push(number.to_string());
            }
            Mark::Range(range) => {
                self.mark(&range.anchor, words)?;
                let connective = RangeConnective::from_exclusions(range.exclude_anchor, range.exclude_active);
                words.push(self.word(&[lists::RANGE_CONNECTIVE], "range connective", connective.identifier())?);
                self.mark(&range.active, words)?;
            }
            other => {
                let name = serde_json::to_value(other)
                    .ok()
                    .and_then(|value| value.get("type").and_then(|t| t.as_str()).map(str::to_string))
                    .unwrap_or_else(|| "mark".to_string());
                return Err(DescribeError::Unsupported(format!("{name} mark")));
            }
        }
        Ok(())
    }

    fn scope(&self, scope_type: &ScopeType, plural: bool) -> Result<String> {
        match scope_type {
            ScopeType::Simple(name) if plural => {
                self.word(&[lists::SCOPE_TYPE_PLURAL], "scope type", name)
            }
            ScopeType::Simple(name) => self.word(&[lists::SCOPE_TYPE], "scope type", name),
            ScopeType::SurroundingPair { delimiter, .. } => self.word(
                &[lists::PAIRED_DELIMITER, lists::SELECTABLE_ONLY_PAIRED_DELIMITER],
                "paired delimiter",
                delimiter,
            ),
            ScopeType::CustomRegex { regex, .. } => {
                self.word(&[lists::CUSTOM_REGEX_SCOPE_TYPE], "custom regex", regex)
            }
            ScopeType::Glyph { character } => {
                let list = if plural {
                    lists::GLYPH_SCOPE_TYPE_PLURAL
                } else {
                    lists::GLYPH_SCOPE_TYPE
                };
                Ok(format!("{} {character}", self.word(&[list], "scope type", "glyph")?))
            }
            other => Err(DescribeError::Unsupported(format!("{} scope", other.type_name()))),
        }
    }

    fn modifier(&self, modifier: &Modifier, words: &mut Vec<String>) -> Result<()> {
        match modifier {
            Modifier::ContainingScope(containing) => {
                words.push(self.scope(&containing.scope_type, false)?)
            }
            Modifier::EveryScope(every) => {
                words.push(self.word(&[lists::EVERY_SCOPE_MODIFIER], "modifier", "everyScope")?);
                words.push(self.scope(&every.scope_type, false)?);
            }
            Modifier::OrdinalScope(ordinal) => {
                let from_end = ordinal.start < 0;
                let (list, id) = if from_end {
                    (lists::LAST_MODIFIER, "last")
                } else {
                    (lists::FIRST_MODIFIER, "first")
                };
                let single_at_edge = ordinal.length == 1 && (ordinal.start == 0 || ordinal.start == -1);
                let range_at_edge = ordinal.start == 0 || ordinal.start == -i64::from(ordinal.length);
                if !single_at_edge && !range_at_edge {
                    return Err(DescribeError::Unsupported("ordinal scope".to_string()));
                }
                words.push(self.word(&[list], "modifier", id)?);
                if ordinal.length > 1 {
                    words.push(ordinal.length.to_string());
                }
                words.push(self.scope(&ordinal.scope_type, ordinal.length > 1)?);
            }
            Modifier::RelativeScope(relative) => {
                if relative.offset == 0 {
                    if relative.length > 1 {
                        words.push(relative.length.to_string());
                    }
                    words.push(self.scope(&relative.scope_type, relative.length > 1)?);
                    let id = match relative.direction {
                        Direction::Forward => "forward",
                        Direction::Backward => "backward",
                    };
                    words.push(self.word(&[lists::FORWARD_BACKWARD_MODIFIER], "modifier", id)?);
                } else {
                    let id = match relative.direction {
                        Direction::Forward => "next",
                        Direction::Backward => "previous",
                    };
                    words.push(self.word(&[lists::PREVIOUS_NEXT_MODIFIER], "modifier", id)?);
                    if relative.offset > 1 {
                        words.push(relative.offset.to_string());
                    }
                    words.push(self.scope(&relative.scope_type, false)?);
                }
            }
            Modifier::ExtendThroughStartOf(head) | Modifier::ExtendThroughEndOf(head) => {
                words.push(self.word(&[lists::HEAD_TAIL_MODIFIER], "modifier", modifier.type_name())?);
                for inner in head.modifiers.iter().flatten() {
                    self.modifier(inner, words)?;
                }
            }
            Modifier::Position { position } => {
                let id = match position {
                    TargetPosition::Before => "before",
                    TargetPosition::After => "after",
                    TargetPosition::Start => "startOf",
                    TargetPosition::End => "endOf",
                };
                words.push(self.word(&[lists::POSITION, lists::START_END_MODIFIER], "position", id)?);
            }
            other => {
                let id = other.type_name();
                if Modifier::unit(id).is_none() {
                    return Err(DescribeError::Unsupported(format!("{id} modifier")));
                }
                words.push(self.word(&[lists::SIMPLE_MODIFIER, lists::START_END_MODIFIER], "modifier", id)?);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::*;
    use crate::destination::InsertionMode;

    fn builtin() -> Vocabulary {
        Vocabulary::builtin()
    }

    fn hat(character: &str) -> PrimitiveTarget {
        build_primitive(Some(build_decorated_symbol(None, None, character)), vec![])
    }

    #[test]
    fn test_simple_action_on_scope() {
        let vocabulary = builtin();
        let target = Target::Primitive(build_primitive(
            Some(build_decorated_symbol(Some("blue"), None, "a")),
            vec![build_containing_scope(ScopeType::simple("namedFunction"), None)],
        ));
        let action = build_simple_action("remove", target).unwrap();
        assert_eq!(describe_action(&vocabulary, &action).unwrap(), "chuck funk blue a");
    }

    #[test]
    fn test_bring_to_destination() {
        let vocabulary = builtin();
        let destination = Destination::Primitive(build_destination(
            InsertionMode::After,
            Target::Primitive(hat("b")),
        ));
        let action = build_bring_move("replaceWithTarget", Target::Primitive(hat("a")), Some(destination)).unwrap();
        assert_eq!(describe_action(&vocabulary, &action).unwrap(), "bring a after b");
    }

    #[test]
    fn test_call_connective_follows_vocabulary() {
        let action = build_call(Target::Primitive(hat("a")), Some(Target::Primitive(hat("b"))));
        assert_eq!(describe_action(&builtin(), &action).unwrap(), "call a on b");

        let implicit = build_call(Target::Primitive(hat("a")), None);
        assert_eq!(describe_action(&builtin(), &implicit).unwrap(), "call a");

        let mut renamed = spokenform_vocab::BuiltinGroup::TargetConnectives.default_table().into_lists();
        renamed.insert(
            lists::CALL_CONNECTIVE.to_string(),
            [("over".to_string(), "callConnective".to_string())].into_iter().collect(),
        );
        let mut tables: Vec<_> = builtin().tables().to_vec();
        tables.insert(0, std::sync::Arc::new(spokenform_vocab::IdentifierTable::from_lists(renamed)));
        let vocabulary = Vocabulary::new(tables);
        assert_eq!(describe_action(&vocabulary, &action).unwrap(), "call a over b");
    }

    #[test]
    fn test_ranges_and_lists() {
        let vocabulary = builtin();
        let connective = vocabulary.range_connective(Some("between"), None).unwrap();
        let range = ListElement::Range(build_range(Some(hat("a")), Some(connective), hat("b")));
        let list = build_list(vec![range, ListElement::Primitive(hat("c"))]).unwrap();
        assert_eq!(describe_target(&vocabulary, &list).unwrap(), "a between b and c");

        let inclusive = Target::Range(build_range(None, None, hat("d")));
        assert_eq!(describe_target(&vocabulary, &inclusive).unwrap(), "past d");
    }

    #[test]
    fn test_wrap_puts_delimiter_first() {
        let vocabulary = builtin();
        let action = build_wrap("wrapWithPairedDelimiter", "parentheses", Target::Primitive(hat("a"))).unwrap();
        assert_eq!(describe_action(&vocabulary, &action).unwrap(), "round wrap a");
    }

    #[test]
    fn test_modifiers_and_marks() {
        let vocabulary = builtin();
        let target = Target::Primitive(build_primitive(
            Some(build_line_number("lineNumberModulo100", 12).unwrap()),
            vec![
                build_every_scope(ScopeType::simple("token")),
            ],
        ));
        assert_eq!(describe_target(&vocabulary, &target).unwrap(), "every token row 12");

        let target = Target::Primitive(build_primitive(
            Some(Mark::That),
            vec![build_ordinal_range(ScopeType::simple("line"), 3, true)],
        ));
        assert_eq!(describe_target(&vocabulary, &target).unwrap(), "last 3 lines that");
    }

    #[test]
    fn test_unknown_identifier_is_reported() {
        let vocabulary = builtin();
        let target = Target::Primitive(build_primitive(
            None,
            vec![build_containing_scope(ScopeType::simple("hologram"), None)],
        ));
        assert_eq!(
            describe_target(&vocabulary, &target),
            Err(DescribeError::UnknownIdentifier {
                kind: "scope type",
                identifier: "hologram".to_string(),
            })
        );
    }
}
