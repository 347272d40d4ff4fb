//! Destinations: where an action puts its output.

use crate::target::Target;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertionMode {
    To,
    Before,
    After,
}

impl InsertionMode {
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "to" => Some(InsertionMode::To),
            "before" => Some(InsertionMode::Before),
            "after" => Some(InsertionMode::After),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InsertionMode::To => "to",
            InsertionMode::Before => "before",
            InsertionMode::After => "after",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Destination {
    Primitive(PrimitiveDestination),
    List(ListDestination),
    /// At the cursor
    Implicit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimitiveDestination {
    pub insertion_mode: InsertionMode,
    pub target: Target,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDestination {
    #[serde(with = "crate::tagged::primitive_vec")]
    pub destinations: Vec<PrimitiveDestination>,
}

impl From<PrimitiveDestination> for Destination {
    fn from(destination: PrimitiveDestination) -> Self {
        Destination::Primitive(destination)
    }
}

impl Destination {
    /// Every target this destination refers to, in order.
    pub fn targets(&self) -> Vec<&Target> {
        match self {
            Destination::Primitive(primitive) => vec![&primitive.target],
            Destination::List(list) => list.destinations.iter().map(|d| &d.target).collect(),
            Destination::Implicit => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::Mark;
    use crate::target::PrimitiveTarget;
    use serde_json::json;

    fn that() -> Target {
        Target::Primitive(PrimitiveTarget {
            mark: Some(Mark::That),
            modifiers: vec![],
        })
    }

    #[test]
    fn test_list_destination_tags_each_element() {
        let destination = Destination::List(ListDestination {
            destinations: vec![
                PrimitiveDestination {
                    insertion_mode: InsertionMode::After,
                    target: that(),
                },
                PrimitiveDestination {
                    insertion_mode: InsertionMode::To,
                    target: Target::Implicit,
                },
            ],
        });
        let value = json!({
            "type": "list",
            "destinations": [
                {"type": "primitive", "insertionMode": "after", "target": {"type": "primitive", "mark": {"type": "that"}}},
                {"type": "primitive", "insertionMode": "to", "target": {"type": "implicit"}}
            ]
        });
        assert_eq!(serde_json::to_value(&destination).unwrap(), value);
        assert_eq!(serde_json::from_value::<Destination>(value).unwrap(), destination);
        assert_eq!(destination.targets().len(), 2);
    }

    #[test]
    fn test_implicit_destination() {
        assert_eq!(
            serde_json::to_value(Destination::Implicit).unwrap(),
            json!({"type": "implicit"})
        );
        assert!(Destination::Implicit.targets().is_empty());
    }
}
