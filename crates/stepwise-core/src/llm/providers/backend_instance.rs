//! Unified backend enum

use crate::error::{StepwiseError, StepwiseResult};
use crate::llm::handler::StepBackend;
use crate::llm::messages::Message;
use crate::llm::options::CallOptions;
use crate::llm::step::Step;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Backend selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Multi-provider router, addressed by `provider/model`
    #[default]
    Router,
    /// Local Ollama server
    Ollama,
    /// Perplexity
    Perplexity,
    /// Groq
    Groq,
}

impl BackendKind {
    /// Backend name as a string
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Router => "router",
            BackendKind::Ollama => "ollama",
            BackendKind::Perplexity => "perplexity",
            BackendKind::Groq => "groq",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = StepwiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "router" | "litellm" => Ok(BackendKind::Router),
            "ollama" => Ok(BackendKind::Ollama),
            "perplexity" => Ok(BackendKind::Perplexity),
            "groq" => Ok(BackendKind::Groq),
            other => Err(StepwiseError::invalid_input_field(
                format!("Unknown backend '{}'", other),
                "backend",
            )),
        }
    }
}

/// Unified backend enum that wraps all backend implementations
pub enum BackendInstance {
    Router(super::RouterBackend),
    Ollama(super::OllamaBackend),
    Perplexity(super::PerplexityBackend),
    Groq(super::GroqBackend),
}

impl BackendInstance {
    /// Which kind of backend this is
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Router(_) => BackendKind::Router,
            Self::Ollama(_) => BackendKind::Ollama,
            Self::Perplexity(_) => BackendKind::Perplexity,
            Self::Groq(_) => BackendKind::Groq,
        }
    }
}

#[async_trait]
impl StepBackend for BackendInstance {
    fn name(&self) -> &'static str {
        match self {
            Self::Router(b) => b.name(),
            Self::Ollama(b) => b.name(),
            Self::Perplexity(b) => b.name(),
            Self::Groq(b) => b.name(),
        }
    }

    async fn request(
        &self,
        messages: &[Message],
        max_tokens: u32,
        options: &CallOptions,
    ) -> StepwiseResult<String> {
        match self {
            Self::Router(b) => b.request(messages, max_tokens, options).await,
            Self::Ollama(b) => b.request(messages, max_tokens, options).await,
            Self::Perplexity(b) => b.request(messages, max_tokens, options).await,
            Self::Groq(b) => b.request(messages, max_tokens, options).await,
        }
    }

    fn normalize(&self, raw: &str, is_final_answer: bool) -> StepwiseResult<Step> {
        match self {
            Self::Router(b) => b.normalize(raw, is_final_answer),
            Self::Ollama(b) => b.normalize(raw, is_final_answer),
            Self::Perplexity(b) => b.normalize(raw, is_final_answer),
            Self::Groq(b) => b.normalize(raw, is_final_answer),
        }
    }
}

impl From<super::RouterBackend> for BackendInstance {
    fn from(backend: super::RouterBackend) -> Self {
        Self::Router(backend)
    }
}

impl From<super::OllamaBackend> for BackendInstance {
    fn from(backend: super::OllamaBackend) -> Self {
        Self::Ollama(backend)
    }
}

impl From<super::PerplexityBackend> for BackendInstance {
    fn from(backend: super::PerplexityBackend) -> Self {
        Self::Perplexity(backend)
    }
}

impl From<super::GroqBackend> for BackendInstance {
    fn from(backend: super::GroqBackend) -> Self {
        Self::Groq(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_names() {
        assert_eq!("router".parse::<BackendKind>().unwrap(), BackendKind::Router);
        assert_eq!("litellm".parse::<BackendKind>().unwrap(), BackendKind::Router);
        assert_eq!("GROQ".parse::<BackendKind>().unwrap(), BackendKind::Groq);
        assert!("anthropic".parse::<BackendKind>().is_err());
        assert_eq!(BackendKind::default(), BackendKind::Router);
    }
}
