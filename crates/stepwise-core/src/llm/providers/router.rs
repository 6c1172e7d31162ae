//! Multi-provider router backend

use crate::config::{ModelParameters, ProviderConfig};
use crate::error::StepwiseResult;
use crate::llm::handler::StepBackend;
use crate::llm::messages::Message;
use crate::llm::options::CallOptions;
use crate::llm::provider_types::ModelRoute;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::instrument;

use super::error_utils::{handle_http_error, handle_parse_error, handle_send_error};
use super::openai_compat::{build_request_body, extract_content};

/// Routes a `provider/model` identifier to that upstream's
/// chat-completions compatible endpoint
pub struct RouterBackend {
    route: ModelRoute,
    config: ProviderConfig,
    model_params: ModelParameters,
    http_client: Client,
}

impl RouterBackend {
    /// Create a router backend
    ///
    /// `config.name` should be the upstream provider name so the API key
    /// falls back to `<PROVIDER>_API_KEY`. `config.base_url` overrides the
    /// upstream's default API base.
    pub fn new(
        route: ModelRoute,
        config: ProviderConfig,
        model_params: ModelParameters,
        http_client: Client,
    ) -> Self {
        Self {
            route,
            config,
            model_params,
            http_client,
        }
    }

    /// Build a router backend for `route`, failing early on a missing key
    pub fn connect(route: ModelRoute, config: ProviderConfig) -> StepwiseResult<Self> {
        if route.provider.requires_api_key() {
            config.require_api_key()?;
        }
        let http_client = config.build_http_client()?;
        let model_params = ModelParameters::new(route.model.clone());
        Ok(Self::new(route, config, model_params, http_client))
    }

    /// Effective API base, without trailing slash
    pub fn api_base(&self) -> String {
        match &self.config.base_url {
            Some(base) if !base.trim().is_empty() => base.trim().trim_end_matches('/').to_string(),
            _ => self.route.provider.default_api_base().to_string(),
        }
    }
}

#[async_trait]
impl StepBackend for RouterBackend {
    fn name(&self) -> &'static str {
        "router"
    }

    #[instrument(skip(self, messages, options), level = "debug")]
    async fn request(
        &self,
        messages: &[Message],
        max_tokens: u32,
        options: &CallOptions,
    ) -> StepwiseResult<String> {
        let url = format!("{}/chat/completions", self.api_base());
        let request_body = build_request_body(
            &self.model_params.model,
            messages,
            max_tokens,
            self.model_params.resolve_temperature(options),
            options,
        );

        tracing::debug!(
            route = %self.route,
            "Router API request: {}",
            serde_json::to_string_pretty(&request_body).unwrap_or_default()
        );

        let mut request = self
            .http_client
            .post(&url)
            .timeout(self.model_params.resolve_timeout(options))
            .header("Content-Type", "application/json")
            .json(&request_body);
        if let Some(api_key) = self.config.get_api_key() {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| handle_send_error(e, self.route.provider.name()))?;

        if !response.status().is_success() {
            return Err(handle_http_error(response, self.route.provider.name()).await);
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| handle_parse_error(e, self.route.provider.name()))?;

        tracing::debug!(
            "Router API response: {}",
            serde_json::to_string_pretty(&response_json).unwrap_or_default()
        );

        extract_content(&response_json, self.route.provider.name())
    }
}
