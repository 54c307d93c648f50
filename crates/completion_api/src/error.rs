use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionApiError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    /// Non-2xx response. Carries the message recovered from the body.
    #[error("HTTP {0}: {1}")]
    Status(u16, String),
    /// 2xx response with an explicit `ok: false` flag.
    #[error("request rejected{}", rejected_suffix(.0))]
    Rejected(Option<String>),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("transport runtime failure: {0}")]
    Runtime(String),
}

/// Best human-readable message for a failed response.
///
/// Lookup order: `error` (string), `error.message`/`error.code` (object),
/// top-level `message`, then the status reason phrase.
pub fn parse_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(error_detail)
        .unwrap_or_else(|| reason_phrase(status))
}

/// Message carried by a JSON error body, if any.
pub fn error_detail(value: &Value) -> Option<String> {
    let from_error = match value.get("error") {
        Some(Value::String(message)) => non_blank(message),
        Some(Value::Object(fields)) => fields
            .get("message")
            .and_then(Value::as_str)
            .and_then(non_blank)
            .or_else(|| fields.get("code").and_then(Value::as_str).and_then(non_blank)),
        _ => None,
    };

    from_error.or_else(|| value.get("message").and_then(Value::as_str).and_then(non_blank))
}

fn rejected_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}

fn reason_phrase(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("request failed")
        .to_string()
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
