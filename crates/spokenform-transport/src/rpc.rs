//! Request/response RPC with the editor.
//!
//! ```text
//!   client                          communication dir                 editor
//!   ──────                          ─────────────────                 ──────
//!   remove stale response.json
//!   write request.json ───────────► request.json
//!   trigger() ─────────────────────────────────────────────────────► wake up
//!                                                     read request ◄──┘
//!                                   response.json ◄── write response
//!   poll until complete ◄────────── response.json
//!   remove both files
//! ```
//!
//! A response is complete once it ends with a newline. Its `uuid` must echo
//! the request's.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

pub const REQUEST_FILE: &str = "request.json";
pub const RESPONSE_FILE: &str = "response.json";

/// Command the engine registers for spoken commands.
pub const COMMAND_ID: &str = "spokenform.command";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcRequest {
    pub command_id: String,
    pub args: Vec<Value>,
    pub wait_for_finish: bool,
    pub return_command_output: bool,
    pub uuid: Uuid,
}

impl RpcRequest {
    pub fn new(command_id: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            command_id: command_id.into(),
            args,
            wait_for_finish: true,
            return_command_output: true,
            uuid: Uuid::new_v4(),
        }
    }

    pub fn no_wait(mut self) -> Self {
        self.wait_for_finish = false;
        self.return_command_output = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcResponse {
    pub uuid: Uuid,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub return_value: Option<Value>,
    #[serde(default)]
    pub warnings: Vec<Value>,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed RPC payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to wake the editor: {0}")]
    Trigger(#[source] io::Error),

    #[error("timed out after {0:?} waiting for a response")]
    Timeout(Duration),

    #[error("response uuid {found} does not match request {expected}")]
    UuidMismatch { expected: Uuid, found: Uuid },

    #[error("editor reported an error: {0}")]
    Remote(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// Sends RPC requests to the editor.
pub trait CommandTransport {
    /// Send `request`; without `wait_for_finish` this returns `None` as soon
    /// as the editor has been woken.
    fn send(&self, request: &RpcRequest) -> Result<Option<RpcResponse>>;
}

type Trigger = Box<dyn Fn() -> io::Result<()> + Send + Sync>;

/// Transport over a directory shared with the editor.
pub struct FileRpcTransport {
    dir: PathBuf,
    timeout: Duration,
    poll_interval: Duration,
    trigger: Trigger,
}

impl std::fmt::Debug for FileRpcTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileRpcTransport")
            .field("dir", &self.dir)
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl FileRpcTransport {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5);

    /// `trigger` wakes the editor after the request is written (a key press,
    /// a signal, ...).
    pub fn new(dir: impl Into<PathBuf>, trigger: impl Fn() -> io::Result<()> + Send + Sync + 'static) -> Self {
        Self {
            dir: dir.into(),
            timeout: Self::DEFAULT_TIMEOUT,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            trigger: Box::new(trigger),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn request_path(&self) -> PathBuf {
        self.dir.join(REQUEST_FILE)
    }

    pub fn response_path(&self) -> PathBuf {
        self.dir.join(RESPONSE_FILE)
    }

    fn write_request(&self, request: &RpcRequest) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| TransportError::Io {
            path: self.dir.clone(),
            source,
        })?;
        remove_if_present(&self.response_path())?;

        let path = self.request_path();
        let mut body = serde_json::to_string(request)?;
        body.push('\n');
        fs::write(&path, body).map_err(|source| TransportError::Io { path, source })
    }

    fn read_response(&self) -> Result<Option<RpcResponse>> {
        let path = self.response_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(TransportError::Io { path, source }),
        };
        if !raw.ends_with('\n') {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn await_response(&self) -> Result<RpcResponse> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(response) = self.read_response()? {
                return Ok(response);
            }
            if Instant::now() >= deadline {
                return Err(TransportError::Timeout(self.timeout));
            }
            std::thread::sleep(self.poll_interval);
        }
    }

    fn cleanup(&self) {
        for path in [self.request_path(), self.response_path()] {
            if let Err(err) = remove_if_present(&path) {
                tracing::warn!(error = %err, "failed to clean up RPC file");
            }
        }
    }
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(TransportError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl CommandTransport for FileRpcTransport {
    fn send(&self, request: &RpcRequest) -> Result<Option<RpcResponse>> {
        self.write_request(request)?;
        tracing::debug!(uuid = %request.uuid, command = %request.command_id, "request written");
        (self.trigger)().map_err(TransportError::Trigger)?;

        if !request.wait_for_finish {
            return Ok(None);
        }

        let result = self.await_response();
        self.cleanup();
        let response = result?;

        if response.uuid != request.uuid {
            return Err(TransportError::UuidMismatch {
                expected: request.uuid,
                found: response.uuid,
            });
        }
        for warning in &response.warnings {
            tracing::warn!(warning = %warning, "editor warning");
        }
        if let Some(error) = &response.error {
            let message = match error {
                Value::String(message) => message.clone(),
                other => other
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| other.to_string()),
            };
            return Err(TransportError::Remote(message));
        }
        Ok(Some(response))
    }
}
