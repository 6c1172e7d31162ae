//! Ollama backend (native chat API)

use crate::config::{ModelParameters, ProviderConfig};
use crate::error::StepwiseResult;
use crate::llm::handler::StepBackend;
use crate::llm::messages::Message;
use crate::llm::normalize::normalize_enveloped;
use crate::llm::options::CallOptions;
use crate::llm::step::Step;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::instrument;

use super::error_utils::{handle_http_error, handle_parse_error, handle_send_error};

/// Ollama backend talking to `/api/chat` with JSON-mode output
pub struct OllamaBackend {
    config: ProviderConfig,
    model_params: ModelParameters,
    http_client: Client,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    pub fn new(config: ProviderConfig, model_params: ModelParameters, http_client: Client) -> Self {
        Self {
            config,
            model_params,
            http_client,
        }
    }

    fn request_body(&self, messages: &[Message], max_tokens: u32, options: &CallOptions) -> Value {
        let mut body = json!({
            "model": self.model_params.model,
            "messages": messages,
            "stream": false,
            "format": "json",
            "options": {
                "num_predict": max_tokens,
                "temperature": self.model_params.resolve_temperature(options),
            },
        });
        if let Value::Object(map) = &mut body {
            for (key, value) in &options.extra {
                map.insert(key.clone(), value.clone());
            }
        }
        body
    }
}

#[async_trait]
impl StepBackend for OllamaBackend {
    fn name(&self) -> &'static str {
        "ollama"
    }

    #[instrument(skip(self, messages, options), level = "debug")]
    async fn request(
        &self,
        messages: &[Message],
        max_tokens: u32,
        options: &CallOptions,
    ) -> StepwiseResult<String> {
        let url = format!("{}/api/chat", self.config.get_base_url());
        let request_body = self.request_body(messages, max_tokens, options);

        tracing::debug!(
            "Ollama API request: {}",
            serde_json::to_string_pretty(&request_body).unwrap_or_default()
        );

        let response = self
            .http_client
            .post(&url)
            .timeout(self.model_params.resolve_timeout(options))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| handle_send_error(e, self.name()))?;

        if !response.status().is_success() {
            return Err(handle_http_error(response, self.name()).await);
        }

        // The whole body is handed to normalization, which unwraps `message.content`.
        let body = response
            .text()
            .await
            .map_err(|e| handle_parse_error(e, self.name()))?;

        tracing::debug!("Ollama API response: {}", body);
        Ok(body)
    }

    fn normalize(&self, raw: &str, is_final_answer: bool) -> StepwiseResult<Step> {
        Ok(normalize_enveloped(raw, is_final_answer))
    }
}
