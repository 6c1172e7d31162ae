//! Perplexity backend

use crate::config::{ModelParameters, ProviderConfig};
use crate::error::{StepwiseError, StepwiseResult};
use crate::llm::handler::StepBackend;
use crate::llm::messages::{Message, MessageRole};
use crate::llm::options::CallOptions;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::instrument;

use super::error_utils::{
    handle_http_error, handle_parse_error, handle_send_error, provider_error_message,
};
use super::openai_compat::{build_request_body, extract_content};

/// Normalize a conversation into the strictly alternating shape Perplexity accepts
///
/// Consecutive user turns are joined with a newline, other consecutive
/// same-role turns keep only the first, system turns are never merged and a
/// trailing assistant turn is removed.
pub fn consolidate_messages(messages: &[Message]) -> Vec<Message> {
    let mut cleaned: Vec<Message> = Vec::with_capacity(messages.len());
    let mut last_role: Option<MessageRole> = None;

    for message in messages {
        if message.role == MessageRole::System {
            cleaned.push(message.clone());
            last_role = None;
            continue;
        }

        if last_role == Some(message.role) {
            if message.role == MessageRole::User {
                if let Some(previous) = cleaned.last_mut() {
                    previous.content.push('\n');
                    previous.content.push_str(&message.content);
                }
            }
            continue;
        }

        cleaned.push(message.clone());
        last_role = Some(message.role);
    }

    if cleaned
        .last()
        .is_some_and(|message| message.role == MessageRole::Assistant)
    {
        cleaned.pop();
    }

    cleaned
}

/// Perplexity chat-completions backend
pub struct PerplexityBackend {
    config: ProviderConfig,
    model_params: ModelParameters,
    http_client: Client,
}

impl PerplexityBackend {
    /// Create a new Perplexity backend
    pub fn new(config: ProviderConfig, model_params: ModelParameters, http_client: Client) -> Self {
        Self {
            config,
            model_params,
            http_client,
        }
    }
}

#[async_trait]
impl StepBackend for PerplexityBackend {
    fn name(&self) -> &'static str {
        "perplexity"
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
        let cleaned = consolidate_messages(messages);
        let request_body = build_request_body(
            &self.model_params.model,
            &cleaned,
            max_tokens,
            self.model_params.resolve_temperature(options),
            options,
        );

        tracing::debug!(
            "Perplexity API request: {}",
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

        if response.status() == StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            let message =
                provider_error_message(&body).unwrap_or_else(|| "Unknown error".to_string());
            return Err(StepwiseError::bad_request(message, self.name()));
        }

        if !response.status().is_success() {
            return Err(handle_http_error(response, self.name()).await);
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| handle_parse_error(e, self.name()))?;

        tracing::debug!(
            "Perplexity API response: {}",
            serde_json::to_string_pretty(&response_json).unwrap_or_default()
        );

        extract_content(&response_json, self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(messages: &[Message]) -> Vec<MessageRole> {
        messages.iter().map(|m| m.role).collect()
    }

    #[test]
    fn merges_consecutive_user_turns() {
        let cleaned = consolidate_messages(&[
            Message::system("sys"),
            Message::user("first"),
            Message::user("second"),
        ]);
        assert_eq!(roles(&cleaned), vec![MessageRole::System, MessageRole::User]);
        assert_eq!(cleaned[1].content, "first\nsecond");
    }

    #[test]
    fn keeps_first_of_repeated_assistant_turns() {
        let cleaned = consolidate_messages(&[
            Message::user("q"),
            Message::assistant("a1"),
            Message::assistant("a2"),
            Message::user("more"),
        ]);
        assert_eq!(cleaned.len(), 3);
        assert_eq!(cleaned[1].content, "a1");
    }

    #[test]
    fn drops_trailing_assistant() {
        let cleaned = consolidate_messages(&[
            Message::system("sys"),
            Message::user("q"),
            Message::assistant("ack"),
        ]);
        assert_eq!(roles(&cleaned), vec![MessageRole::System, MessageRole::User]);
    }

    #[test]
    fn never_merges_system() {
        let cleaned = consolidate_messages(&[
            Message::system("a"),
            Message::system("b"),
            Message::user("q"),
        ]);
        assert_eq!(cleaned.len(), 3);
        assert_eq!(cleaned[0].content, "a");
        assert_eq!(cleaned[1].content, "b");
    }

    #[test]
    fn consolidation_is_idempotent() {
        let input = vec![
            Message::system("sys"),
            Message::user("q"),
            Message::user("q2"),
            Message::assistant("ack"),
            Message::assistant("step 1"),
            Message::user("final please"),
            Message::assistant("trailing"),
        ];
        let once = consolidate_messages(&input);
        let twice = consolidate_messages(&once);
        assert_eq!(once, twice);
        assert_ne!(once.last().map(|m| m.role), Some(MessageRole::Assistant));
    }
}
