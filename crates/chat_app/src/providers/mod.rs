use std::sync::Arc;

use chat_provider::{CompletionProvider, ProviderInitError};
use chat_provider_http::{HttpProvider, HttpProviderConfig, HTTP_PROVIDER_ID};
use chat_provider_mock::{MockProvider, MOCK_PROVIDER_ID};

use crate::config::AppConfig;

pub const DEFAULT_PROVIDER_ID: &str = HTTP_PROVIDER_ID;
pub const PROVIDER_ENV_VAR: &str = "MINIAPP_CHAT_PROVIDER";

pub fn provider_from_env(
    config: &AppConfig,
) -> Result<Arc<dyn CompletionProvider>, ProviderInitError> {
    let provider_id = std::env::var(PROVIDER_ENV_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    provider_for_id(provider_id.as_deref().unwrap_or(DEFAULT_PROVIDER_ID), config)
}

pub fn provider_for_id(
    provider_id: &str,
    config: &AppConfig,
) -> Result<Arc<dyn CompletionProvider>, ProviderInitError> {
    match provider_id {
        HTTP_PROVIDER_ID => {
            let provider = HttpProvider::new(http_config(config), config.model.clone())?;
            if let Some(endpoint) = provider.endpoint() {
                tracing::info!(endpoint, "http provider ready");
            }
            Ok(Arc::new(provider))
        }
        MOCK_PROVIDER_ID => Ok(Arc::new(
            MockProvider::preview().with_model(config.model.clone()),
        )),
        unknown => Err(ProviderInitError::new(format!(
            "Unsupported provider '{unknown}'. Available providers: {HTTP_PROVIDER_ID}, {MOCK_PROVIDER_ID}"
        ))),
    }
}

fn http_config(config: &AppConfig) -> HttpProviderConfig {
    let mut http = HttpProviderConfig::new();
    if let Some(api_url) = &config.api_url {
        http = http.with_api_url(api_url.clone());
    }
    if let Some(origin) = &config.origin {
        http = http.with_origin(origin.clone());
    }
    if let Some(timeout) = config.timeout {
        http = http.with_timeout(timeout);
    }
    http
}
