//! Groq backend with schema-constrained output

use crate::config::{ModelParameters, ProviderConfig};
use crate::error::StepwiseResult;
use crate::llm::handler::StepBackend;
use crate::llm::messages::Message;
use crate::llm::normalize::normalize_structured;
use crate::llm::options::CallOptions;
use crate::llm::step::Step;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::instrument;

use super::error_utils::{handle_http_error, handle_parse_error, handle_send_error};
use super::openai_compat::{build_request_body, extract_content};

/// Name of the JSON schema sent with every request
pub const STEP_SCHEMA_NAME: &str = "reasoning_step";

/// Groq backend requesting strict JSON-schema output
pub struct GroqBackend {
    config: ProviderConfig,
    model_params: ModelParameters,
    http_client: Client,
}

impl GroqBackend {
    /// Create a new Groq backend
    pub fn new(config: ProviderConfig, model_params: ModelParameters, http_client: Client) -> Self {
        Self {
            config,
            model_params,
            http_client,
        }
    }

    /// `response_format` payload constraining replies to the step shape
    pub fn response_format() -> Value {
        json!({
            "type": "json_schema",
            "json_schema": {
                "name": STEP_SCHEMA_NAME,
                "strict": true,
                "schema": Step::json_schema(),
            }
        })
    }
}

#[async_trait]
impl StepBackend for GroqBackend {
    fn name(&self) -> &'static str {
        "groq"
    }

    #[instrument(skip(self, messages, options), level = "debug")]
    async fn request(
        &self,
        messages: &[Message],
        max_tokens: u32,
        options: &CallOptions,
    ) -> StepwiseResult<String> {
        let api_key = self.config.require_api_key()?;
        let url = format!("{}/chat/completions", self.config.get_base_url());
        let mut request_body = build_request_body(
            &self.model_params.model,
            messages,
            max_tokens,
            self.model_params.resolve_temperature(options),
            options,
        );
        if !options.extra.contains_key("response_format") {
            request_body["response_format"] = Self::response_format();
        }

        tracing::debug!(
            "Groq API request: {}",
            serde_json::to_string_pretty(&request_body).unwrap_or_default()
        );

        let response = self
            .http_client
            .post(&url)
            .timeout(self.model_params.resolve_timeout(options))
            .bearer_auth(api_key)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| handle_send_error(e, self.name()))?;

        if !response.status().is_success() {
            return Err(handle_http_error(response, self.name()).await);
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| handle_parse_error(e, self.name()))?;

        tracing::debug!(
            "Groq API response: {}",
            serde_json::to_string_pretty(&response_json).unwrap_or_default()
        );

        extract_content(&response_json, self.name())
    }

    fn normalize(&self, raw: &str, is_final_answer: bool) -> StepwiseResult<Step> {
        Ok(normalize_structured(raw, is_final_answer))
    }
}
