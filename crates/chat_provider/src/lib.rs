//! Minimal provider-agnostic contract for one request/response completion call.
//!
//! This crate defines only the wire-level history items, the request/reply
//! envelopes and the failure taxonomy shared by every provider. It excludes
//! transport details, response-shape interpretation and session state.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier for one request cycle.
pub type RequestId = u64;

/// Error returned while constructing/configuring a provider before any request starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInitError {
    message: String,
}

impl ProviderInitError {
    /// Creates a new provider initialization error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the underlying error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ProviderInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProviderInitError {}

impl From<String> for ProviderInitError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ProviderInitError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Role vocabulary of the completion wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    System,
    User,
    Assistant,
}

impl WireRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One `{role, content}` history item sent to the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: WireRole,
    pub content: String,
}

impl WireMessage {
    #[must_use]
    pub fn new(role: WireRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(WireRole::System, content)
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(WireRole::User, content)
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(WireRole::Assistant, content)
    }
}

/// Input required to issue one completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub request_id: RequestId,
    pub model: String,
    pub messages: Vec<WireMessage>,
}

/// Decoded body of a successful (2xx, not explicitly rejected) response.
///
/// The body is kept as raw JSON; callers decide which fields carry assistant text.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionReply {
    pub body: Value,
}

impl CompletionReply {
    #[must_use]
    pub fn new(body: Value) -> Self {
        Self { body }
    }
}

/// Failure of one completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// Network failure or the request never produced a response.
    Transport(String),
    /// Non-2xx status. `detail` is the best message recovered from the body.
    Status { status: u16, detail: String },
    /// 2xx response carrying an explicit `ok: false` flag.
    Rejected { detail: Option<String> },
    /// Response body could not be decoded.
    Decode(String),
    /// The provider itself misbehaved (panic, missing settlement).
    Internal(String),
}

impl CompletionError {
    /// Secondary text shown under the apology bubble, when there is any.
    #[must_use]
    pub fn note(&self) -> Option<String> {
        match self {
            Self::Rejected { detail } => detail
                .as_deref()
                .map(str::trim)
                .filter(|detail| !detail.is_empty())
                .map(ToString::to_string),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "request error: {message}"),
            Self::Status { status, detail } if detail.trim().is_empty() => {
                write!(f, "Request failed with status {status}")
            }
            Self::Status { status, detail } => {
                write!(f, "Request failed with status {status}: {detail}")
            }
            Self::Rejected { detail: Some(detail) } => write!(f, "request rejected: {detail}"),
            Self::Rejected { detail: None } => write!(f, "request rejected"),
            Self::Decode(message) => write!(f, "invalid response body: {message}"),
            Self::Internal(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for CompletionError {}

/// Immutable metadata describing a completion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub provider_id: String,
    pub model_id: String,
}

/// Provider interface for executing one completion call.
///
/// `complete` blocks the calling worker until the call settles. The caller owns
/// threading; providers never touch session state.
pub trait CompletionProvider: Send + Sync + 'static {
    /// Returns provider/model identity metadata.
    fn profile(&self) -> ProviderProfile;

    /// Issues one request and returns its decoded reply or failure.
    fn complete(&self, request: CompletionRequest) -> Result<CompletionReply, CompletionError>;
}
