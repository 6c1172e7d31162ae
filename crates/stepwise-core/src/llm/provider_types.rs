//! Upstream providers reachable through the router backend

use crate::error::{StepwiseError, StepwiseResult};
use serde::{Deserialize, Serialize};

/// Upstreams addressable through a routable model identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI (GPT models)
    OpenAI,
    /// Groq inference
    Groq,
    /// Perplexity (search-augmented)
    Perplexity,
    /// Ollama (local models, OpenAI-compatible endpoint)
    Ollama,
    /// OpenRouter
    OpenRouter,
    /// Mistral AI
    Mistral,
    /// DeepSeek
    DeepSeek,
}

impl LlmProvider {
    /// Get the provider name as a string
    pub fn name(&self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "openai",
            LlmProvider::Groq => "groq",
            LlmProvider::Perplexity => "perplexity",
            LlmProvider::Ollama => "ollama",
            LlmProvider::OpenRouter => "openrouter",
            LlmProvider::Mistral => "mistral",
            LlmProvider::DeepSeek => "deepseek",
        }
    }

    /// Base URL of the provider's chat-completions compatible API
    pub fn default_api_base(&self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "https://api.openai.com/v1",
            LlmProvider::Groq => "https://api.groq.com/openai/v1",
            LlmProvider::Perplexity => "https://api.perplexity.ai",
            LlmProvider::Ollama => "http://localhost:11434/v1",
            LlmProvider::OpenRouter => "https://openrouter.ai/api/v1",
            LlmProvider::Mistral => "https://api.mistral.ai/v1",
            LlmProvider::DeepSeek => "https://api.deepseek.com/v1",
        }
    }

    /// Whether requests must carry a bearer token
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LlmProvider::Ollama)
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for LlmProvider {
    type Err = StepwiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAI),
            "groq" => Ok(LlmProvider::Groq),
            "perplexity" | "pplx" => Ok(LlmProvider::Perplexity),
            "ollama" | "ollama_chat" => Ok(LlmProvider::Ollama),
            "openrouter" => Ok(LlmProvider::OpenRouter),
            "mistral" => Ok(LlmProvider::Mistral),
            "deepseek" => Ok(LlmProvider::DeepSeek),
            other => Err(StepwiseError::invalid_input_field(
                format!("Unknown provider '{}'", other),
                "model",
            )),
        }
    }
}

/// A routable model identifier such as `groq/llama-3.1-70b-versatile`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRoute {
    /// Upstream provider
    pub provider: LlmProvider,
    /// Model name as the upstream expects it
    pub model: String,
}

impl ModelRoute {
    /// Parse `provider/model`; a bare model name routes to OpenAI
    ///
    /// Only the first `/` separates the provider, so
    /// `openrouter/meta-llama/llama-3.1-8b-instruct` keeps its nested model path.
    pub fn parse(identifier: &str) -> StepwiseResult<Self> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(StepwiseError::invalid_input_field(
                "Model identifier must not be empty",
                "model",
            ));
        }

        let (provider, model) = match identifier.split_once('/') {
            Some((provider, model)) => (provider.parse()?, model),
            None => (LlmProvider::OpenAI, identifier),
        };

        if model.is_empty() {
            return Err(StepwiseError::invalid_input_field(
                format!("Model identifier '{}' has no model name", identifier),
                "model",
            ));
        }

        Ok(Self {
            provider,
            model: model.to_string(),
        })
    }
}

impl std::fmt::Display for ModelRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}
