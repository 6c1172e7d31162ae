//! Per-backend connection configuration

use super::api_key::standard_env_var;
use crate::error::{StepwiseError, StepwiseResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Connection timeout applied to every backend client
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Configuration for a specific backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name (ollama, perplexity, groq, openai, ...)
    pub name: String,
    /// Explicit API key; falls back to `<NAME>_API_KEY` when unset
    pub api_key: Option<String>,
    /// Whether a missing key is looked up in the process environment
    #[serde(default = "default_env_fallback")]
    pub env_fallback: bool,
    /// Base URL overriding the provider default
    pub base_url: Option<String>,
    /// Custom HTTP headers to include in requests
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_env_fallback() -> bool {
    true
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: "openai".to_string(),
            api_key: None,
            env_fallback: true,
            base_url: None,
            headers: HashMap::new(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl ProviderConfig {
    /// Create a new provider config
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Only use the explicit API key, never `<NAME>_API_KEY`
    ///
    /// For callers that already resolved the key from their own settings.
    pub fn without_env_fallback(mut self) -> Self {
        self.env_fallback = false;
        self
    }

    /// Get the effective base URL for this provider, without trailing slash
    pub fn get_base_url(&self) -> String {
        let base = match &self.base_url {
            Some(base_url) if !base_url.trim().is_empty() => base_url.trim().to_string(),
            _ => match self.name.as_str() {
                "ollama" => "http://localhost:11434".to_string(),
                "perplexity" => "https://api.perplexity.ai".to_string(),
                "groq" => "https://api.groq.com/openai/v1".to_string(),
                "openai" => "https://api.openai.com/v1".to_string(),
                _ => "http://localhost:8000".to_string(),
            },
        };
        base.trim_end_matches('/').to_string()
    }

    /// Get the effective API key (config first, then environment)
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(key) = &self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }

        if !self.env_fallback {
            return None;
        }
        std::env::var(standard_env_var(&self.name))
            .ok()
            .filter(|key| !key.is_empty())
    }

    /// Get the API key or fail with a configuration error
    pub fn require_api_key(&self) -> StepwiseResult<String> {
        self.get_api_key().ok_or_else(|| {
            StepwiseError::config(format!(
                "API key required for '{}'. Set {} or pass it explicitly",
                self.name,
                standard_env_var(&self.name)
            ))
        })
    }

    /// Connect timeout as a Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Build the HTTP client shared by every call of one backend
    pub fn build_http_client(&self) -> StepwiseResult<reqwest::Client> {
        let mut headers = reqwest::header::HeaderMap::new();
        for (key, value) in &self.headers {
            if let (Ok(name), Ok(val)) = (
                reqwest::header::HeaderName::from_bytes(key.as_bytes()),
                reqwest::header::HeaderValue::from_str(value),
            ) {
                headers.insert(name, val);
            }
        }

        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| {
                StepwiseError::llm_with_provider(
                    format!("Failed to create HTTP client: {}", e),
                    self.name.clone(),
                )
            })
    }
}
