use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::config::CompletionApiConfig;
use crate::error::{error_detail, parse_error_message, CompletionApiError};
use crate::payload::ChatRequest;
use crate::url::resolve_endpoint;

/// Status and raw body of one endpoint response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug)]
pub struct CompletionApiClient {
    http: Client,
    config: CompletionApiConfig,
    endpoint: Url,
}

impl CompletionApiClient {
    pub fn new(config: CompletionApiConfig) -> Result<Self, CompletionApiError> {
        let endpoint = resolve_endpoint(config.api_url.as_deref(), &config.origin)?;
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            config,
            endpoint,
        })
    }

    pub fn config(&self) -> &CompletionApiConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn build_headers(&self) -> Result<HeaderMap, CompletionApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        for (key, value) in &self.config.extra_headers {
            let name = HeaderName::from_bytes(key.trim().to_ascii_lowercase().as_bytes())
                .map_err(|_| CompletionApiError::InvalidHeader(format!("invalid header key: {key}")))?;
            let value = HeaderValue::from_str(value.trim()).map_err(|_| {
                CompletionApiError::InvalidHeader(format!("invalid header value for {key}"))
            })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    pub fn build_request(
        &self,
        request: &ChatRequest,
    ) -> Result<reqwest::RequestBuilder, CompletionApiError> {
        let headers = self.build_headers()?;
        Ok(self
            .http
            .post(self.endpoint.clone())
            .headers(headers)
            .json(request))
    }

    /// Posts `request` and returns the raw status and body, whatever the status.
    pub async fn send(&self, request: &ChatRequest) -> Result<RawResponse, CompletionApiError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            model = %request.model,
            messages = request.messages.len(),
            "posting chat request"
        );

        let response = self.build_request(request)?.send().await.map_err(|error| {
            tracing::warn!(%error, "chat request failed before a response arrived");
            CompletionApiError::from(error)
        })?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(status, bytes = body.len(), "chat response received");
        Ok(RawResponse { status, body })
    }

    /// Posts `request` and returns the decoded body of a successful response.
    pub async fn complete(&self, request: &ChatRequest) -> Result<Value, CompletionApiError> {
        interpret_response(self.send(request).await?)
    }
}

/// Classifies a raw response.
///
/// Success requires a 2xx status, a JSON body, and no explicit `ok: false`.
pub fn interpret_response(response: RawResponse) -> Result<Value, CompletionApiError> {
    if !response.is_success() {
        let message = parse_error_message(response.status, &response.body);
        return Err(CompletionApiError::Status(response.status, message));
    }

    let body: Value = serde_json::from_str(&response.body)?;
    if body.get("ok").and_then(Value::as_bool) == Some(false) {
        return Err(CompletionApiError::Rejected(error_detail(&body)));
    }
    Ok(body)
}
