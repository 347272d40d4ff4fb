//! Command client: envelope, send, and local fallback in one call.

use crate::envelope::{CommandEnvelope, PhraseTracker};
use crate::fallback::{perform_fallback, Editor, FallbackError, Homophones};
use crate::response::CommandResponse;
use crate::rpc::{CommandTransport, RpcRequest, TransportError, COMMAND_ID};
use serde_json::Value;
use spokenform_ast::compiler::{validate_action, AmbiguousTargetError};
use spokenform_ast::ActionDescriptor;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Ambiguous(#[from] AmbiguousTargetError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("fallback failed: {0}")]
    Fallback(#[from] FallbackError),

    #[error("malformed command payload: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;

pub struct CommandClient<T: CommandTransport> {
    transport: T,
    phrases: Arc<PhraseTracker>,
    homophones: Homophones,
}

impl<T: CommandTransport> CommandClient<T> {
    pub fn new(transport: T, phrases: Arc<PhraseTracker>) -> Self {
        Self {
            transport,
            phrases,
            homophones: Homophones::new(),
        }
    }

    pub fn with_homophones(mut self, homophones: Homophones) -> Self {
        self.homophones = homophones;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn phrases(&self) -> &PhraseTracker {
        &self.phrases
    }

    /// Run `action` and wait for it; a fallback is carried out on `editor`.
    pub fn command_and_wait(&self, action: ActionDescriptor, editor: &mut dyn Editor) -> Result<()> {
        self.run(action, editor).map(|_| ())
    }

    /// Fire `action` without waiting, for commands that open modal UI.
    pub fn command_no_wait(&self, action: ActionDescriptor) -> Result<()> {
        let request = self.request(action)?.no_wait();
        self.transport.send(&request)?;
        Ok(())
    }

    /// Run `action` and return what it produced, locally or remotely.
    pub fn command_get(&self, action: ActionDescriptor, editor: &mut dyn Editor) -> Result<Value> {
        self.run(action, editor)
    }

    fn request(&self, action: ActionDescriptor) -> Result<RpcRequest> {
        if let Err(err) = validate_action(&action) {
            tracing::error!(action = %err.action, count = err.count, "ambiguous target");
            return Err(err.into());
        }
        let envelope = CommandEnvelope::for_phrase(&self.phrases, action);
        Ok(RpcRequest::new(COMMAND_ID, vec![serde_json::to_value(&envelope)?]))
    }

    fn run(&self, action: ActionDescriptor, editor: &mut dyn Editor) -> Result<Value> {
        let request = self.request(action)?;
        let return_value = self
            .transport
            .send(&request)?
            .and_then(|response| response.return_value);

        match CommandResponse::from_value(return_value)? {
            CommandResponse::ReturnValue(value) => Ok(value),
            CommandResponse::Fallback(fallback) => {
                tracing::debug!(action = %fallback.action, "running fallback locally");
                let text = perform_fallback(&fallback, editor, &self.homophones)?;
                Ok(text.map_or(Value::Null, |text| Value::Array(vec![Value::String(text)])))
            }
        }
    }
}
