use std::collections::BTreeMap;
use std::time::Duration;

use crate::url::DEFAULT_ORIGIN;

/// Transport configuration for chat completion requests.
#[derive(Debug, Clone)]
pub struct CompletionApiConfig {
    /// Endpoint override. Absolute URLs are used as-is, relative ones are
    /// joined onto `origin`.
    pub api_url: Option<String>,
    /// Origin the default same-origin endpoint path is resolved against.
    pub origin: String,
    /// Additional headers merged into request headers.
    pub extra_headers: BTreeMap<String, String>,
    /// Optional request timeout.
    pub timeout: Option<Duration>,
}

impl Default for CompletionApiConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            origin: DEFAULT_ORIGIN.to_string(),
            extra_headers: BTreeMap::new(),
            timeout: None,
        }
    }
}

impl CompletionApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn insert_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }
}
