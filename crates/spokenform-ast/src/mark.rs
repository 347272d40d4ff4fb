//! Marks: what a primitive target points at before any modifier applies.

use crate::target::Target;
use serde::{Deserialize, Serialize};

/// Hat style used when no color was spoken.
pub const DEFAULT_HAT_COLOR: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    Cursor,
    That,
    Source,
    Keyboard,
    Nothing,
    LastCursorPosition,
    DecoratedSymbol(DecoratedSymbolMark),
    LineNumber(LineNumberMark),
    Range(RangeMark),
    Explicit(ExplicitMark),
    Target { target: Box<Target> },
}

/// A character decorated with a hat, e.g. `blue-fox a`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoratedSymbolMark {
    /// `color`, `color-shape`, `default` or `default-shape`
    pub symbol_color: String,
    pub character: String,
}

impl DecoratedSymbolMark {
    pub fn new(color: Option<&str>, shape: Option<&str>, character: impl Into<String>) -> Self {
        let color = color.unwrap_or(DEFAULT_HAT_COLOR);
        let symbol_color = match shape {
            Some(shape) => format!("{color}-{shape}"),
            None => color.to_string(),
        };
        Self {
            symbol_color,
            character: character.into(),
        }
    }

    /// `(color, shape)` split back out of `symbol_color`.
    pub fn style(&self) -> (&str, Option<&str>) {
        match self.symbol_color.split_once('-') {
            Some((color, shape)) => (color, Some(shape)),
            None => (self.symbol_color.as_str(), None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineNumberType {
    Absolute,
    Relative,
    Modulo100,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineNumberMark {
    pub line_number_type: LineNumberType,
    pub line_number: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeMark {
    pub anchor: Box<Mark>,
    pub active: Box<Mark>,
    pub exclude_anchor: bool,
    pub exclude_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplePosition {
    pub line: u32,
    pub character: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleRange {
    pub start: SimplePosition,
    pub end: SimplePosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplicitMark {
    pub editor_id: String,
    pub range: SimpleRange,
}
