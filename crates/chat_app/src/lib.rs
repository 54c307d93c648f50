//! Mini-app chat session: message log, request lifecycle and terminal front end.
//!
//! ## Provider bootstrap
//!
//! `MINIAPP_CHAT_PROVIDER` selects the completion provider:
//!
//! - `http` (default) posts to the configured completion endpoint
//! - `mock` answers every message with a preview reply after a short delay
//!
//! ## Configuration
//!
//! Set `MINIAPP_CHAT_CONFIG_PATH` to an optional UTF-8 JSON file with this
//! shape (every key optional):
//!
//! ```json
//! {
//!   "apiUrl": "https://chat.example.com/api/gpt/chat",
//!   "model": "gpt-4o-mini",
//!   "systemPrompt": "You are a helpful assistant.",
//!   "title": "Assistant",
//!   "timeoutSec": 60
//! }
//! ```
//!
//! Contract notes:
//! - Unknown JSON fields are rejected.
//! - `timeoutSec` must be > 0 when provided.
//! - `MINIAPP_CHAT_API_URL`, `MINIAPP_CHAT_MODEL` and
//!   `MINIAPP_CHAT_SYSTEM_PROMPT` override the file. Blank values are ignored.
//! - Without `apiUrl` the client posts to `/api/gpt/chat` on
//!   `MINIAPP_CHAT_ORIGIN` (default `http://127.0.0.1:8080`). Relative
//!   `apiUrl` values are joined onto the same origin.
//!
//! Every request replays the whole settled conversation behind one system
//! entry. The reply placeholder is never part of the wire history.

pub mod app;
pub mod bridge;
pub mod commands;
pub mod config;
pub mod projector;
pub mod providers;
pub mod reconciler;
pub mod reply;
pub mod runtime;
pub mod shell;
pub mod view;
