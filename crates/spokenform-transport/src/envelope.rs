//! Command envelope: one spoken phrase, one command.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use spokenform_ast::ActionDescriptor;

/// Envelope format version understood by the engine
pub const COMMAND_VERSION: u32 = 7;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandEnvelope {
    version: u32,
    spoken_form: String,
    #[serde(default = "default_true")]
    use_pre_phrase_snapshot: bool,
    action: ActionDescriptor,
}

impl CommandEnvelope {
    pub fn new(spoken_form: impl Into<String>, action: ActionDescriptor) -> Self {
        Self {
            version: COMMAND_VERSION,
            spoken_form: spoken_form.into(),
            use_pre_phrase_snapshot: true,
            action,
        }
    }

    /// Envelope for the phrase `tracker` is currently in.
    pub fn for_phrase(tracker: &PhraseTracker, action: ActionDescriptor) -> Self {
        Self::new(tracker.current().unwrap_or_default(), action)
    }

    pub fn without_pre_phrase_snapshot(mut self) -> Self {
        self.use_pre_phrase_snapshot = false;
        self
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn spoken_form(&self) -> &str {
        &self.spoken_form
    }

    pub fn use_pre_phrase_snapshot(&self) -> bool {
        self.use_pre_phrase_snapshot
    }

    pub fn action(&self) -> &ActionDescriptor {
        &self.action
    }
}

/// Holds the transcript of the phrase being processed.
#[derive(Debug, Default)]
pub struct PhraseTracker {
    current: Mutex<Option<String>>,
}

impl PhraseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture `transcript` at the start of a phrase.
    pub fn begin_phrase(&self, transcript: impl Into<String>) {
        *self.current.lock() = Some(transcript.into());
    }

    pub fn end_phrase(&self) {
        *self.current.lock() = None;
    }

    pub fn current(&self) -> Option<String> {
        self.current.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use spokenform_ast::{SimpleActionName, Target};

    #[test]
    fn test_envelope_wire_shape() {
        let envelope = CommandEnvelope::new(
            "chuck this",
            ActionDescriptor::simple(SimpleActionName::Remove, Target::Implicit),
        );
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "version": 7,
                "spokenForm": "chuck this",
                "usePrePhraseSnapshot": true,
                "action": {"name": "remove", "target": {"type": "implicit"}}
            })
        );
    }

    #[test]
    fn test_snapshot_flag_defaults_to_true() {
        let envelope: CommandEnvelope = serde_json::from_value(json!({
            "version": 7,
            "spokenForm": "take that",
            "action": {"name": "setSelection", "target": {"type": "primitive", "mark": {"type": "that"}}}
        }))
        .unwrap();
        assert!(envelope.use_pre_phrase_snapshot());
    }

    #[test]
    fn test_spoken_form_is_captured_once() {
        let tracker = PhraseTracker::new();
        tracker.begin_phrase("copy air");
        let envelope = CommandEnvelope::for_phrase(
            &tracker,
            ActionDescriptor::simple(SimpleActionName::CopyToClipboard, Target::Implicit),
        );
        tracker.begin_phrase("paste");
        assert_eq!(envelope.spoken_form(), "copy air");
        tracker.end_phrase();
        assert_eq!(tracker.current(), None);
    }
}
