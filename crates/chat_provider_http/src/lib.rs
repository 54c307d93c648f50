//! HTTP-backed implementation of the shared `chat_provider` contract.
//!
//! This adapter turns one `CompletionRequest` into a `completion_api` POST and
//! classifies the response into a `CompletionReply` or `CompletionError`.

use std::sync::Arc;
use std::time::Duration;

use chat_provider::{
    CompletionError, CompletionProvider, CompletionReply, CompletionRequest, ProviderInitError,
    ProviderProfile,
};
use completion_api::{
    interpret_response, ChatMessage, ChatRequest, CompletionApiClient, CompletionApiConfig,
    CompletionApiError, RawResponse,
};

/// Stable provider identifier used by startup selection.
pub const HTTP_PROVIDER_ID: &str = "http";

/// Runtime configuration for the HTTP provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpProviderConfig {
    pub api_url: Option<String>,
    pub origin: Option<String>,
    pub timeout: Option<Duration>,
}

impl HttpProviderConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn into_completion_api_config(self) -> CompletionApiConfig {
        let mut config = CompletionApiConfig::new();

        if let Some(api_url) = self.api_url {
            config = config.with_api_url(api_url);
        }

        if let Some(origin) = self.origin {
            config = config.with_origin(origin);
        }

        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        config
    }
}

/// Blocking seam between the provider and the wire.
///
/// Returns the raw status and body; classification happens in the provider.
pub trait Transport: Send + Sync {
    fn post(&self, request: &ChatRequest) -> Result<RawResponse, CompletionApiError>;
}

#[derive(Debug)]
struct DefaultTransport {
    client: CompletionApiClient,
}

impl Transport for DefaultTransport {
    fn post(&self, request: &ChatRequest) -> Result<RawResponse, CompletionApiError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| {
                CompletionApiError::Runtime(format!("failed to initialize tokio runtime: {error}"))
            })?;

        runtime.block_on(self.client.send(request))
    }
}

/// `CompletionProvider` backed by `completion_api`.
pub struct HttpProvider {
    model: String,
    endpoint: Option<String>,
    transport: Arc<dyn Transport>,
}

impl HttpProvider {
    /// Creates a provider using the real HTTP transport.
    pub fn new(config: HttpProviderConfig, model: impl Into<String>) -> Result<Self, ProviderInitError> {
        let client =
            CompletionApiClient::new(config.into_completion_api_config()).map_err(map_init_error)?;
        let endpoint = Some(client.endpoint().to_string());

        Ok(Self {
            model: model.into(),
            endpoint,
            transport: Arc::new(DefaultTransport { client }),
        })
    }

    /// Creates a provider over a caller-supplied transport.
    #[must_use]
    pub fn with_transport(model: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            model: model.into(),
            endpoint: None,
            transport,
        }
    }

    /// Resolved endpoint URL, when the real transport is in use.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

impl CompletionProvider for HttpProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: HTTP_PROVIDER_ID.to_string(),
            model_id: self.model.clone(),
        }
    }

    fn complete(&self, request: CompletionRequest) -> Result<CompletionReply, CompletionError> {
        let request_id = request.request_id;
        let payload = ChatRequest::new(
            request.model,
            request
                .messages
                .into_iter()
                .map(|message| ChatMessage::new(message.role.as_str(), message.content))
                .collect(),
        );

        let outcome = self
            .transport
            .post(&payload)
            .and_then(interpret_response)
            .map(CompletionReply::new)
            .map_err(map_completion_error);

        if let Err(error) = &outcome {
            tracing::warn!(request_id, %error, "completion request failed");
        }
        outcome
    }
}

/// Maps transport failures onto the provider-neutral taxonomy.
pub fn map_completion_error(error: CompletionApiError) -> CompletionError {
    match error {
        CompletionApiError::Status(status, detail) => CompletionError::Status { status, detail },
        CompletionApiError::Rejected(detail) => CompletionError::Rejected { detail },
        CompletionApiError::Decode(error) => CompletionError::Decode(error.to_string()),
        CompletionApiError::Request(error) => CompletionError::Transport(error.to_string()),
        other @ (CompletionApiError::InvalidEndpoint(_)
        | CompletionApiError::InvalidHeader(_)
        | CompletionApiError::Runtime(_)) => CompletionError::Transport(other.to_string()),
    }
}

fn map_init_error(error: CompletionApiError) -> ProviderInitError {
    ProviderInitError::new(format!("Failed to initialize http provider: {error}"))
}
