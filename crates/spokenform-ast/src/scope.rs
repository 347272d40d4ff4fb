//! Scope types
//!
//! On the wire every scope type is a record tagged by `type`. Any tag that is
//! not one of the structured kinds below names a simple scope type
//! (`namedFunction`, `line`, ...), so the enum goes through [`RawScopeType`]
//! rather than a derived tagged representation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurroundingPairDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawScopeType", into = "RawScopeType")]
pub enum ScopeType {
    Simple(String),
    SurroundingPair {
        delimiter: String,
        force_direction: Option<SurroundingPairDirection>,
        require_strong_containment: Option<bool>,
    },
    SurroundingPairInterior {
        delimiter: String,
        require_single_line: Option<bool>,
    },
    CustomRegex {
        regex: String,
        flags: Option<String>,
    },
    OneOf(Vec<ScopeType>),
    Glyph {
        character: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeTypeError {
    #[error("scope type '{kind}' is missing field '{field}'")]
    MissingField { kind: String, field: &'static str },
}

impl ScopeType {
    pub fn simple(name: impl Into<String>) -> Self {
        ScopeType::Simple(name.into())
    }

    pub fn surrounding_pair(
        delimiter: impl Into<String>,
        force_direction: Option<SurroundingPairDirection>,
    ) -> Self {
        ScopeType::SurroundingPair {
            delimiter: delimiter.into(),
            force_direction,
            require_strong_containment: None,
        }
    }

    pub fn custom_regex(regex: impl Into<String>) -> Self {
        ScopeType::CustomRegex {
            regex: regex.into(),
            flags: None,
        }
    }

    pub fn glyph(character: impl Into<String>) -> Self {
        ScopeType::Glyph {
            character: character.into(),
        }
    }

    /// The wire `type` tag.
    pub fn type_name(&self) -> &str {
        match self {
            ScopeType::Simple(name) => name,
            ScopeType::SurroundingPair { .. } => "surroundingPair",
            ScopeType::SurroundingPairInterior { .. } => "surroundingPairInterior",
            ScopeType::CustomRegex { .. } => "customRegex",
            ScopeType::OneOf(_) => "oneOf",
            ScopeType::Glyph { .. } => "glyph",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScopeType {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delimiter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    force_direction: Option<SurroundingPairDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    require_strong_containment: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    require_single_line: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    flags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scope_types: Option<Vec<ScopeType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    character: Option<String>,
}

fn required<T>(value: Option<T>, kind: &str, field: &'static str) -> Result<T, ScopeTypeError> {
    value.ok_or_else(|| ScopeTypeError::MissingField {
        kind: kind.to_string(),
        field,
    })
}

impl TryFrom<RawScopeType> for ScopeType {
    type Error = ScopeTypeError;

    fn try_from(raw: RawScopeType) -> Result<Self, Self::Error> {
        let kind = raw.kind.as_str();
        Ok(match kind {
            "surroundingPair" => ScopeType::SurroundingPair {
                delimiter: required(raw.delimiter, kind, "delimiter")?,
                force_direction: raw.force_direction,
                require_strong_containment: raw.require_strong_containment,
            },
            "surroundingPairInterior" => ScopeType::SurroundingPairInterior {
                delimiter: required(raw.delimiter, kind, "delimiter")?,
                require_single_line: raw.require_single_line,
            },
            "customRegex" => ScopeType::CustomRegex {
                regex: required(raw.regex, kind, "regex")?,
                flags: raw.flags,
            },
            "oneOf" => ScopeType::OneOf(required(raw.scope_types, kind, "scopeTypes")?),
            "glyph" => ScopeType::Glyph {
                character: required(raw.character, kind, "character")?,
            },
            _ => ScopeType::Simple(raw.kind),
        })
    }
}

impl From<ScopeType> for RawScopeType {
    fn from(scope_type: ScopeType) -> Self {
        let kind = scope_type.type_name().to_string();
        let raw = RawScopeType {
            kind,
            ..Default::default()
        };
        match scope_type {
            ScopeType::Simple(_) => raw,
            ScopeType::SurroundingPair {
                delimiter,
                force_direction,
                require_strong_containment,
            } => RawScopeType {
                delimiter: Some(delimiter),
                force_direction,
                require_strong_containment,
                ..raw
            },
            ScopeType::SurroundingPairInterior {
                delimiter,
                require_single_line,
            } => RawScopeType {
                delimiter: Some(delimiter),
                require_single_line,
                ..raw
            },
            ScopeType::CustomRegex { regex, flags } => RawScopeType {
                regex: Some(regex),
                flags,
                ..raw
            },
            ScopeType::OneOf(scope_types) => RawScopeType {
                scope_types: Some(scope_types),
                ..raw
            },
            ScopeType::Glyph { character } => RawScopeType {
                character: Some(character),
                ..raw
            },
        }
    }
}
