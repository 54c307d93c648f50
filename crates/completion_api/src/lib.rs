//! Transport-only client for the chat completion endpoint.
//!
//! This crate owns endpoint resolution, request building, status and `ok:false`
//! failure detection, error-body message parsing and assistant-text extraction
//! for one JSON request/response exchange. It holds no conversation state.

pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod payload;
pub mod url;

pub use client::{interpret_response, CompletionApiClient, RawResponse};
pub use config::CompletionApiConfig;
pub use error::CompletionApiError;
pub use extract::{extract_text, Extractor, EXTRACTORS};
pub use payload::{ChatMessage, ChatRequest};
pub use url::resolve_endpoint;
