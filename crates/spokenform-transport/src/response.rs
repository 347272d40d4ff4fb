//! What the engine sends back for a command.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Either the command ran, or the engine asks for it to be done locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawResponse", into = "RawResponse")]
pub enum CommandResponse {
    ReturnValue(Value),
    Fallback(Fallback),
}

/// Instructions for carrying out a command with local editor primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fallback {
    pub action: String,
    /// Outermost first; applied in reverse.
    #[serde(default)]
    pub modifiers: Vec<Value>,
    /// Action-specific fields such as `text`, `callee`, `left`, `right`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Fallback {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            modifiers: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: Value) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    /// String field from the action-specific part.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    return_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fallback: Option<Fallback>,
}

impl From<RawResponse> for CommandResponse {
    fn from(raw: RawResponse) -> Self {
        match raw.fallback {
            Some(fallback) => CommandResponse::Fallback(fallback),
            None => CommandResponse::ReturnValue(raw.return_value.unwrap_or(Value::Null)),
        }
    }
}

impl From<CommandResponse> for RawResponse {
    fn from(response: CommandResponse) -> Self {
        match response {
            CommandResponse::ReturnValue(value) => RawResponse {
                return_value: Some(value),
                fallback: None,
            },
            CommandResponse::Fallback(fallback) => RawResponse {
                return_value: None,
                fallback: Some(fallback),
            },
        }
    }
}

impl CommandResponse {
    /// Response carried in an RPC `returnValue`; no payload means no return value.
    pub fn from_value(value: Option<Value>) -> Result<Self, serde_json::Error> {
        match value {
            None | Some(Value::Null) => Ok(CommandResponse::ReturnValue(Value::Null)),
            Some(value) => serde_json::from_value(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fallback_keeps_action_fields() {
        let response: CommandResponse = serde_json::from_value(json!({
            "fallback": {"action": "insert", "modifiers": [], "text": "hello"}
        }))
        .unwrap();
        let CommandResponse::Fallback(fallback) = response else {
            panic!("expected fallback");
        };
        assert_eq!(fallback.action, "insert");
        assert_eq!(fallback.field("text"), Some("hello"));
    }

    #[test]
    fn test_return_value() {
        let response: CommandResponse = serde_json::from_value(json!({"returnValue": ["a", "b"]})).unwrap();
        assert_eq!(response, CommandResponse::ReturnValue(json!(["a", "b"])));
        assert_eq!(
            CommandResponse::from_value(None).unwrap(),
            CommandResponse::ReturnValue(Value::Null)
        );
    }

    #[test]
    fn test_fallback_serializes_flat() {
        let fallback = Fallback::new("wrapWithPairedDelimiter")
            .with_field("left", "(")
            .with_field("right", ")");
        assert_eq!(
            serde_json::to_value(CommandResponse::Fallback(fallback)).unwrap(),
            json!({"fallback": {"action": "wrapWithPairedDelimiter", "modifiers": [], "left": "(", "right": ")"}})
        );
    }
}
