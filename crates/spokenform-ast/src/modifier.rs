//! Modifiers narrow or expand the selection produced by a mark.
//!
//! A primitive target applies its modifiers in declaration order.

use crate::scope::ScopeType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Modifier {
    StartOf,
    EndOf,
    InteriorOnly,
    ExcludeInterior,
    Visible,
    ContainingScope(ContainingScopeModifier),
    PreferredScope(ScopeModifier),
    EveryScope(ScopeModifier),
    OrdinalScope(OrdinalScopeModifier),
    RelativeScope(RelativeScopeModifier),
    ExtendThroughStartOf(HeadTailModifier),
    ExtendThroughEndOf(HeadTailModifier),
    Leading,
    Trailing,
    ToRawSelection,
    ModifyIfUntyped { modifier: Box<Modifier> },
    Cascading { modifiers: Vec<Modifier> },
    Range(RangeModifier),
    KeepContentFilter,
    KeepEmptyFilter,
    InferPreviousMark,
    Position { position: TargetPosition },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainingScopeModifier {
    pub scope_type: ScopeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestor_index: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeModifier {
    pub scope_type: ScopeType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdinalScopeModifier {
    pub scope_type: ScopeType,
    /// Negative values count from the end (`-1` is the last)
    pub start: i64,
    pub length: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_every: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeScopeModifier {
    pub scope_type: ScopeType,
    pub offset: u32,
    pub length: u32,
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_every: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadTailModifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<Vec<Modifier>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeModifier {
    pub anchor: Box<Modifier>,
    pub active: Box<Modifier>,
    pub exclude_anchor: bool,
    pub exclude_active: bool,
}

/// Insertion side attached to the first primitive of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPosition {
    Before,
    After,
    Start,
    End,
}

impl Modifier {
    /// Wire tag of this modifier.
    pub fn type_name(&self) -> &'static str {
        match self {
            Modifier::StartOf => "startOf",
            Modifier::EndOf => "endOf",
            Modifier::InteriorOnly => "interiorOnly",
            Modifier::ExcludeInterior => "excludeInterior",
            Modifier::Visible => "visible",
            Modifier::ContainingScope(_) => "containingScope",
            Modifier::PreferredScope(_) => "preferredScope",
            Modifier::EveryScope(_) => "everyScope",
            Modifier::OrdinalScope(_) => "ordinalScope",
            Modifier::RelativeScope(_) => "relativeScope",
            Modifier::ExtendThroughStartOf(_) => "extendThroughStartOf",
            Modifier::ExtendThroughEndOf(_) => "extendThroughEndOf",
            Modifier::Leading => "leading",
            Modifier::Trailing => "trailing",
            Modifier::ToRawSelection => "toRawSelection",
            Modifier::ModifyIfUntyped { .. } => "modifyIfUntyped",
            Modifier::Cascading { .. } => "cascading",
            Modifier::Range(_) => "range",
            Modifier::KeepContentFilter => "keepContentFilter",
            Modifier::KeepEmptyFilter => "keepEmptyFilter",
            Modifier::InferPreviousMark => "inferPreviousMark",
            Modifier::Position { .. } => "position",
        }
    }

    /// Modifiers that take no arguments, by wire tag.
    pub fn unit(type_name: &str) -> Option<Modifier> {
        Some(match type_name {
            "startOf" => Modifier::StartOf,
            "endOf" => Modifier::EndOf,
            "interiorOnly" => Modifier::InteriorOnly,
            "excludeInterior" => Modifier::ExcludeInterior,
            "visible" => Modifier::Visible,
            "leading" => Modifier::Leading,
            "trailing" => Modifier::Trailing,
            "toRawSelection" => Modifier::ToRawSelection,
            "keepContentFilter" => Modifier::KeepContentFilter,
            "keepEmptyFilter" => Modifier::KeepEmptyFilter,
            "inferPreviousMark" => Modifier::InferPreviousMark,
            "extendThroughStartOf" => Modifier::ExtendThroughStartOf(HeadTailModifier::default()),
            "extendThroughEndOf" => Modifier::ExtendThroughEndOf(HeadTailModifier::default()),
            _ => return None,
        })
    }

    pub fn scope_type(&self) -> Option<&ScopeType> {
        match self {
            Modifier::ContainingScope(m) => Some(&m.scope_type),
            Modifier::PreferredScope(m) | Modifier::EveryScope(m) => Some(&m.scope_type),
            Modifier::OrdinalScope(m) => Some(&m.scope_type),
            Modifier::RelativeScope(m) => Some(&m.scope_type),
            _ => None,
        }
    }
}
