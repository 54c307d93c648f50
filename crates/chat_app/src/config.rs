//! Application configuration.
//!
//! Sources, later wins: built-in defaults, the optional JSON file named by
//! `MINIAPP_CHAT_CONFIG_PATH`, then individual env overrides. Blank values
//! count as absent everywhere.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_PATH_ENV_VAR: &str = "MINIAPP_CHAT_CONFIG_PATH";
pub const API_URL_ENV_VAR: &str = "MINIAPP_CHAT_API_URL";
pub const MODEL_ENV_VAR: &str = "MINIAPP_CHAT_MODEL";
pub const SYSTEM_PROMPT_ENV_VAR: &str = "MINIAPP_CHAT_SYSTEM_PROMPT";
pub const ORIGIN_ENV_VAR: &str = "MINIAPP_CHAT_ORIGIN";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a friendly and professional AI assistant that answers clearly and concisely.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Completion endpoint. `None` resolves to the same-origin default path.
    pub api_url: Option<String>,
    /// Origin relative endpoints are joined onto.
    pub origin: Option<String>,
    pub model: String,
    pub system_prompt: String,
    /// Header line shown above the conversation.
    pub title: Option<String>,
    pub timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            origin: None,
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            title: None,
            timeout: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config file {path}: timeoutSec must be > 0")]
    InvalidTimeout { path: PathBuf },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct ConfigFile {
    api_url: Option<String>,
    model: Option<String>,
    system_prompt: Option<String>,
    title: Option<String>,
    timeout_sec: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppConfigError> {
        let mut config = Self::default();

        if let Some(path) = non_blank(lookup(CONFIG_PATH_ENV_VAR)) {
            config.merge_file(Path::new(&path))?;
        }

        if let Some(api_url) = non_blank(lookup(API_URL_ENV_VAR)) {
            config.api_url = Some(api_url);
        }
        if let Some(origin) = non_blank(lookup(ORIGIN_ENV_VAR)) {
            config.origin = Some(origin);
        }
        if let Some(model) = non_blank(lookup(MODEL_ENV_VAR)) {
            config.model = model;
        }
        if let Some(system_prompt) = non_blank(lookup(SYSTEM_PROMPT_ENV_VAR)) {
            config.system_prompt = system_prompt;
        }

        Ok(config)
    }

    /// Overlays the values present in the JSON file at `path`.
    pub fn merge_file(&mut self, path: &Path) -> Result<(), AppConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| AppConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile =
            serde_json::from_str(&raw).map_err(|source| AppConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if file.timeout_sec == Some(0) {
            return Err(AppConfigError::InvalidTimeout {
                path: path.to_path_buf(),
            });
        }

        if let Some(api_url) = non_blank(file.api_url) {
            self.api_url = Some(api_url);
        }
        if let Some(model) = non_blank(file.model) {
            self.model = model;
        }
        if let Some(system_prompt) = non_blank(file.system_prompt) {
            self.system_prompt = system_prompt;
        }
        if let Some(title) = non_blank(file.title) {
            self.title = Some(title);
        }
        if let Some(timeout_sec) = file.timeout_sec {
            self.timeout = Some(Duration::from_secs(timeout_sec));
        }

        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
