//! Shared request/response shapes for chat-completions compatible APIs

use crate::error::StepwiseResult;
use crate::llm::messages::Message;
use crate::llm::options::CallOptions;
use serde_json::{Value, json};

use super::error_utils::handle_parse_error;

/// Build a chat-completions request body
///
/// Always non-streaming; `options.extra` entries are merged last so they can
/// override anything set here.
pub fn build_request_body(
    model: &str,
    messages: &[Message],
    max_tokens: u32,
    temperature: f32,
    options: &CallOptions,
) -> Value {
    let mut body = json!({
        "model": model,
        "messages": messages,
        "max_tokens": max_tokens,
        "temperature": temperature,
        "stream": false,
    });

    if let Value::Object(map) = &mut body {
        for (key, value) in &options.extra {
            map.insert(key.clone(), value.clone());
        }
    }

    body
}

/// Extract `choices[0].message.content` from a chat-completions response
pub fn extract_content(response: &Value, provider: &str) -> StepwiseResult<String> {
    response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| handle_parse_error("missing choices[0].message.content", provider))
}
