//! Spokenform command transport
//!
//! Carries compiled commands to the editor engine and carries out the
//! engine's fallback answers locally.
//!
//! ```text
//!   ActionDescriptor ──► CommandEnvelope ──► RpcRequest ──► CommandTransport
//!   (+ PhraseTracker)     (version 7)                        (file RPC)
//!                                                                 │
//!        Editor ◄── FallbackPlan ◄── CommandResponse::Fallback ◄──┤
//!                                    CommandResponse::ReturnValue ◄┘
//! ```

pub mod client;
pub mod envelope;
pub mod fallback;
pub mod response;
pub mod rpc;

pub use client::{CommandClient, CommandError};
pub use envelope::{CommandEnvelope, PhraseTracker, COMMAND_VERSION};
pub use fallback::{
    perform_fallback, Editor, EditorError, EditorOp, FallbackError, FallbackPlan, FallbackStep, Homophones,
};
pub use response::{CommandResponse, Fallback};
pub use rpc::{CommandTransport, FileRpcTransport, RpcRequest, RpcResponse, TransportError};
