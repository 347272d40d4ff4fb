//! Target tree
//!
//! ```text
//! Target ─┬─ Primitive { mark?, modifiers[] }
//!         ├─ Range { anchor: Primitive | Implicit, active: Primitive, ... }
//!         ├─ List { elements: (Primitive | Range)[] }   never a single element
//!         └─ Implicit                                    "the current selection"
//! ```

use crate::mark::Mark;
use crate::modifier::Modifier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Target {
    Primitive(PrimitiveTarget),
    Range(RangeTarget),
    List(ListTarget),
    Implicit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitiveTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark: Option<Mark>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
}

impl PrimitiveTarget {
    pub fn is_bare(&self) -> bool {
        self.mark.is_none() && self.modifiers.is_empty()
    }
}

/// Anchor of a range: a primitive, or the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RangeAnchor {
    Primitive(PrimitiveTarget),
    Implicit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeType {
    Continuous,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeTarget {
    pub anchor: RangeAnchor,
    #[serde(with = "crate::tagged::primitive")]
    pub active: PrimitiveTarget,
    pub exclude_anchor: bool,
    pub exclude_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_type: Option<RangeType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ListElement {
    Primitive(PrimitiveTarget),
    Range(RangeTarget),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTarget {
    pub elements: Vec<ListElement>,
}

impl From<ListElement> for Target {
    fn from(element: ListElement) -> Self {
        match element {
            ListElement::Primitive(primitive) => Target::Primitive(primitive),
            ListElement::Range(range) => Target::Range(range),
        }
    }
}

impl From<PrimitiveTarget> for Target {
    fn from(primitive: PrimitiveTarget) -> Self {
        Target::Primitive(primitive)
    }
}

impl From<RangeTarget> for Target {
    fn from(range: RangeTarget) -> Self {
        Target::Range(range)
    }
}

impl Target {
    pub fn is_list(&self) -> bool {
        matches!(self, Target::List(_))
    }

    /// Whether this is the current selection with nothing applied to it.
    pub fn is_selection(&self) -> bool {
        match self {
            Target::Implicit => true,
            Target::Primitive(primitive) => {
                matches!(primitive.mark, None | Some(Mark::Cursor))
            }
            _ => false,
        }
    }

    /// The first primitive reachable from this target: the target itself,
    /// the first list element, or a range's anchor.
    pub fn first_primitive_mut(&mut self) -> Option<&mut PrimitiveTarget> {
        match self {
            Target::Primitive(primitive) => Some(primitive),
            Target::Range(range) => range.first_primitive_mut(),
            Target::List(list) => list.elements.first_mut().and_then(|element| match element {
                ListElement::Primitive(primitive) => Some(primitive),
                ListElement::Range(range) => range.first_primitive_mut(),
            }),
            Target::Implicit => None,
        }
    }
}

impl RangeTarget {
    /// The anchor, promoting an implicit anchor to an empty primitive.
    pub fn first_primitive_mut(&mut self) -> Option<&mut PrimitiveTarget> {
        if matches!(self.anchor, RangeAnchor::Implicit) {
            self.anchor = RangeAnchor::Primitive(PrimitiveTarget::default());
        }
        match &mut self.anchor {
            RangeAnchor::Primitive(primitive) => Some(primitive),
            RangeAnchor::Implicit => None,
        }
    }
}
