//! Resolution of spoken words against the reconciled vocabulary.
//!
//! A [`Vocabulary`] is a set of table snapshots taken once per phrase, so a
//! republication in the middle of a phrase cannot change what a word means.

use crate::compiler::{self, CompileError, RangeConnective, RangeConnectiveWithType, Result};
use crate::destination::InsertionMode;
use crate::mark::Mark;
use crate::modifier::{Modifier, TargetPosition};
use crate::scope::ScopeType;
use crate::target::RangeType;
use spokenform_vocab::{lists, BuiltinGroup, IdentifierTable, Lookup, VocabularyHandle};
use std::sync::Arc;

/// The action family a spoken action word belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    Simple(String),
    BringMove(String),
    Swap,
    Call,
    Wrap(String),
    InsertSnippet,
    Paste,
    /// Editor command id from the custom action list
    Custom(String),
}

/// Lists searched for an action word, in priority order.
pub const ACTION_LISTS: &[&str] = &[
    lists::SIMPLE_ACTION,
    lists::BRING_MOVE_ACTION,
    lists::SWAP_ACTION,
    lists::CALL_ACTION,
    lists::WRAP_ACTION,
    lists::INSERT_SNIPPET_ACTION,
    lists::PASTE_ACTION,
    lists::CUSTOM_ACTION,
];

#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    tables: Vec<Arc<IdentifierTable>>,
}

impl Vocabulary {
    pub fn new(tables: Vec<Arc<IdentifierTable>>) -> Self {
        Self { tables }
    }

    /// Snapshot every handle.
    pub fn from_handles<'a>(handles: impl IntoIterator<Item = &'a VocabularyHandle>) -> Self {
        Self::new(handles.into_iter().map(VocabularyHandle::snapshot).collect())
    }

    /// Built-in spoken forms only, with no user overrides.
    pub fn builtin() -> Self {
        Self::new(
            BuiltinGroup::ALL
                .into_iter()
                .map(|group| Arc::new(group.default_table()))
                .collect(),
        )
    }

    pub fn tables(&self) -> &[Arc<IdentifierTable>] {
        &self.tables
    }

    /// Identifier for `spoken_form` in `list`, from the first table that has one.
    pub fn lookup(&self, list: &str, spoken_form: &str) -> Lookup<&str> {
        self.tables
            .iter()
            .find_map(|table| table.lookup(list, spoken_form).found())
            .into()
    }

    /// Spoken form for `identifier` in the first of `lists` that maps it.
    pub fn spoken_form(&self, lists: &[&str], identifier: &str) -> Lookup<&str> {
        lists
            .iter()
            .find_map(|list| {
                self.tables.iter().find_map(|table| {
                    table.list(list).and_then(|entries| {
                        entries
                            .iter()
                            .find(|(_, id)| id.as_str() == identifier)
                            .map(|(spoken, _)| spoken.as_str())
                    })
                })
            })
            .into()
    }

    fn require(&self, list: &str, spoken_form: &str) -> Result<&str> {
        self.lookup(list, spoken_form)
            .found()
            .ok_or_else(|| CompileError::UnknownSpokenForm {
                list: list.to_string(),
                spoken_form: spoken_form.to_string(),
            })
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    pub fn action(&self, spoken_form: &str) -> Lookup<ActionKind> {
        let Some((list, id)) = ACTION_LISTS.iter().find_map(|list| {
            self.lookup(list, spoken_form)
                .found()
                .map(|id| (*list, id.to_string()))
        }) else {
            return Lookup::NotFound;
        };
        Lookup::Found(match list {
            lists::BRING_MOVE_ACTION => ActionKind::BringMove(id),
            lists::SWAP_ACTION => ActionKind::Swap,
            lists::CALL_ACTION => ActionKind::Call,
            lists::WRAP_ACTION => ActionKind::Wrap(id),
            lists::INSERT_SNIPPET_ACTION => ActionKind::InsertSnippet,
            lists::PASTE_ACTION => ActionKind::Paste,
            lists::CUSTOM_ACTION => ActionKind::Custom(id),
            _ => ActionKind::Simple(id),
        })
    }

    // ------------------------------------------------------------------------
    // Scope types
    // ------------------------------------------------------------------------

    /// Scope type for a singular scope word, a paired delimiter or a custom
    /// regex.
    pub fn scope_type(&self, spoken_form: &str) -> Lookup<ScopeType> {
        self.scope_type_in(spoken_form, lists::SCOPE_TYPE)
    }

    /// Scope type for a plural scope word (`funks`, `tokens`, ...).
    pub fn plural_scope_type(&self, spoken_form: &str) -> Lookup<ScopeType> {
        self.scope_type_in(spoken_form, lists::SCOPE_TYPE_PLURAL)
    }

    fn scope_type_in(&self, spoken_form: &str, scope_list: &str) -> Lookup<ScopeType> {
        if let Lookup::Found(id) = self.lookup(scope_list, spoken_form) {
            return Lookup::Found(ScopeType::simple(id));
        }
        if let Lookup::Found(regex) = self.lookup(lists::CUSTOM_REGEX_SCOPE_TYPE, spoken_form) {
            return Lookup::Found(ScopeType::custom_regex(regex));
        }
        self.lookup(lists::PAIRED_DELIMITER, spoken_form)
            .found()
            .or_else(|| {
                self.lookup(lists::SELECTABLE_ONLY_PAIRED_DELIMITER, spoken_form)
                    .found()
            })
            .map(|delimiter| ScopeType::surrounding_pair(delimiter, None))
            .into()
    }

    /// `glyph <character>`
    pub fn glyph_scope_type(&self, spoken_form: &str, character: &str, plural: bool) -> Lookup<ScopeType> {
        let list = if plural {
            lists::GLYPH_SCOPE_TYPE_PLURAL
        } else {
            lists::GLYPH_SCOPE_TYPE
        };
        self.lookup(list, spoken_form)
            .map(|_| ScopeType::glyph(character))
    }

    // ------------------------------------------------------------------------
    // Marks
    // ------------------------------------------------------------------------

    pub fn special_mark(&self, spoken_form: &str) -> Lookup<Mark> {
        match self.lookup(lists::SPECIAL_MARK, spoken_form) {
            Lookup::Found(id) => compiler::build_special_mark(id),
            Lookup::NotFound => Lookup::NotFound,
        }
    }

    /// Decorated symbol from optional spoken color and shape words.
    pub fn decorated_symbol(
        &self,
        color: Option<&str>,
        shape: Option<&str>,
        character: &str,
    ) -> Result<Mark> {
        let color = color
            .map(|spoken| self.require(lists::HAT_COLOR, spoken))
            .transpose()?;
        let shape = shape
            .map(|spoken| self.require(lists::HAT_SHAPE, spoken))
            .transpose()?;
        Ok(compiler::build_decorated_symbol(color, shape, character))
    }

    /// `row 12`, `up 3`, `down 2`
    pub fn line_number(&self, direction: &str, number: u32) -> Result<Mark> {
        let id = self.require(lists::LINE_DIRECTION, direction)?;
        compiler::build_line_number(id, number)
    }

    // ------------------------------------------------------------------------
    // Modifiers and connectives
    // ------------------------------------------------------------------------

    pub fn simple_modifier(&self, spoken_form: &str) -> Lookup<Modifier> {
        self.lookup(lists::SIMPLE_MODIFIER, spoken_form)
            .found()
            .or_else(|| self.lookup(lists::START_END_MODIFIER, spoken_form).found())
            .and_then(Modifier::unit)
            .into()
    }

    pub fn head_tail(&self, spoken_form: &str, modifiers: Vec<Modifier>) -> Result<Modifier> {
        let id = self.require(lists::HEAD_TAIL_MODIFIER, spoken_form)?;
        compiler::build_head_tail(id, modifiers)
    }

    /// `next funk`, `previous 2 lines`, `3 tokens backward`
    pub fn relative_scope(
        &self,
        spoken_form: &str,
        scope_type: ScopeType,
        count: Option<u32>,
    ) -> Result<Modifier> {
        let id = match self.lookup(lists::PREVIOUS_NEXT_MODIFIER, spoken_form) {
            Lookup::Found(id) => id,
            Lookup::NotFound => self.require(lists::FORWARD_BACKWARD_MODIFIER, spoken_form)?,
        };
        compiler::build_relative_scope(scope_type, id, count)
    }

    /// Range connective and range type, either of which may be unspoken.
    pub fn range_connective(
        &self,
        connective: Option<&str>,
        range_type: Option<&str>,
    ) -> Result<RangeConnectiveWithType> {
        let connective = match connective {
            Some(spoken) => {
                let id = self.require(lists::RANGE_CONNECTIVE, spoken)?;
                RangeConnective::from_identifier(id).ok_or_else(|| CompileError::UnknownIdentifier {
                    kind: "range connective",
                    identifier: id.to_string(),
                })?
            }
            None => RangeConnective::default(),
        };
        let range_type = match range_type {
            Some(spoken) => match self.require(lists::RANGE_TYPE, spoken)? {
                "verticalRange" => Some(RangeType::Vertical),
                "continuousRange" => Some(RangeType::Continuous),
                other => {
                    return Err(CompileError::UnknownIdentifier {
                        kind: "range type",
                        identifier: other.to_string(),
                    })
                }
            },
            None => None,
        };
        Ok(RangeConnectiveWithType {
            connective,
            range_type,
        })
    }

    /// `before`/`after` as a target position
    pub fn position(&self, spoken_form: &str) -> Lookup<TargetPosition> {
        match self.lookup(lists::POSITION, spoken_form) {
            Lookup::Found("before") => Lookup::Found(TargetPosition::Before),
            Lookup::Found("after") => Lookup::Found(TargetPosition::After),
            _ => Lookup::NotFound,
        }
    }

    /// `to`, `before` or `after` as a destination insertion mode
    pub fn insertion_mode(&self, spoken_form: &str) -> Lookup<InsertionMode> {
        self.lookup(lists::INSERTION_MODE_TO, spoken_form)
            .found()
            .or_else(|| self.lookup(lists::POSITION, spoken_form).found())
            .and_then(InsertionMode::from_identifier)
            .into()
    }

    pub fn paired_delimiter(&self, spoken_form: &str) -> Lookup<&str> {
        self.lookup(lists::PAIRED_DELIMITER, spoken_form)
    }

    pub fn snippet(&self, spoken_form: &str) -> Lookup<&str> {
        self.lookup(lists::INSERTION_SNIPPET, spoken_form)
    }
}
