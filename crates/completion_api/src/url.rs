use url::Url;

use crate::error::CompletionApiError;

/// Origin used when the caller does not provide one.
pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8080";

/// Same-origin path of the chat endpoint.
pub const DEFAULT_CHAT_PATH: &str = "/api/gpt/chat";

/// Resolve the chat endpoint URL.
///
/// Resolution rules:
/// 1) blank or absent `api_url` joins [`DEFAULT_CHAT_PATH`] onto the origin
/// 2) absolute `api_url` is used unchanged
/// 3) relative `api_url` is joined onto the origin
pub fn resolve_endpoint(api_url: Option<&str>, origin: &str) -> Result<Url, CompletionApiError> {
    let origin = match origin.trim() {
        "" => DEFAULT_ORIGIN,
        trimmed => trimmed,
    };
    let base = Url::parse(origin)
        .map_err(|error| CompletionApiError::InvalidEndpoint(format!("{origin}: {error}")))?;

    let target = api_url
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_CHAT_PATH);

    let endpoint = match Url::parse(target) {
        Ok(absolute) => absolute,
        Err(url::ParseError::RelativeUrlWithoutBase) => base
            .join(target)
            .map_err(|error| CompletionApiError::InvalidEndpoint(format!("{target}: {error}")))?,
        Err(error) => {
            return Err(CompletionApiError::InvalidEndpoint(format!(
                "{target}: {error}"
            )))
        }
    };

    if !matches!(endpoint.scheme(), "http" | "https") {
        return Err(CompletionApiError::InvalidEndpoint(format!(
            "{endpoint}: unsupported scheme"
        )));
    }
    Ok(endpoint)
}
