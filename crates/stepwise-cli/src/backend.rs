//! Handler construction from CLI flags and the `.env` store

use stepwise_core::config::{EnvStore, ProviderConfig, keys, standard_env_var};
use stepwise_core::llm::providers::{GroqBackend, OllamaBackend, PerplexityBackend, RouterBackend};
use stepwise_core::{
    BackendInstance, BackendKind, ModelParameters, ModelRoute, RetryingHandler, StepwiseResult,
};

/// Values given on the command line that take precedence over the store
#[derive(Debug, Clone, Default)]
pub struct BackendOverrides {
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub api_base: Option<String>,
}

/// Resolved backend settings, without the credential
#[derive(Debug, Clone, PartialEq)]
pub struct BackendSelection {
    pub kind: BackendKind,
    pub model: String,
    pub api_base: Option<String>,
}

fn pick(explicit: &Option<String>, store: &EnvStore, key: &str) -> Option<String> {
    explicit
        .clone()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| store.get_non_empty(key))
}

/// Resolve model and endpoint for `kind`
pub fn resolve(
    kind: BackendKind,
    store: &EnvStore,
    overrides: &BackendOverrides,
) -> BackendSelection {
    let (model_key, base_key) = match kind {
        BackendKind::Router => (keys::MODEL, Some(keys::API_BASE)),
        BackendKind::Ollama => (keys::OLLAMA_MODEL, Some(keys::OLLAMA_URL)),
        BackendKind::Perplexity => (keys::PERPLEXITY_MODEL, None),
        BackendKind::Groq => (keys::GROQ_MODEL, None),
    };

    BackendSelection {
        kind,
        model: pick(&overrides.model, store, model_key).unwrap_or_default(),
        api_base: match base_key {
            Some(key) => pick(&overrides.api_base, store, key),
            None => overrides.api_base.clone(),
        },
    }
}

fn api_key_for(
    kind: BackendKind,
    model: &str,
    store: &EnvStore,
    overrides: &BackendOverrides,
) -> Option<String> {
    match kind {
        BackendKind::Router => pick(&overrides.api_key, store, keys::API_KEY).or_else(|| {
            ModelRoute::parse(model)
                .ok()
                .and_then(|route| store.get_non_empty(&standard_env_var(route.provider.name())))
        }),
        BackendKind::Ollama => overrides.api_key.clone(),
        BackendKind::Perplexity => pick(&overrides.api_key, store, keys::PERPLEXITY_API_KEY),
        BackendKind::Groq => pick(&overrides.api_key, store, keys::GROQ_API_KEY),
    }
}

// The store already consulted the process environment
fn provider_config(name: &str, api_key: Option<String>, api_base: Option<String>) -> ProviderConfig {
    let mut config = ProviderConfig::new(name).without_env_fallback();
    if let Some(key) = api_key {
        config = config.with_api_key(key);
    }
    if let Some(base) = api_base {
        config = config.with_base_url(base);
    }
    config
}

/// Build the retrying handler for the selected backend
pub fn build_handler(
    kind: BackendKind,
    store: &EnvStore,
    overrides: &BackendOverrides,
) -> StepwiseResult<RetryingHandler<BackendInstance>> {
    let selection = resolve(kind, store, overrides);
    let api_key = api_key_for(kind, &selection.model, store, overrides);

    tracing::debug!(
        backend = %selection.kind,
        model = %selection.model,
        api_base = selection.api_base.as_deref().unwrap_or("default"),
        "building handler"
    );

    let backend: BackendInstance = match kind {
        BackendKind::Router => {
            let route = ModelRoute::parse(&selection.model)?;
            let config = provider_config(route.provider.name(), api_key, selection.api_base);
            RouterBackend::connect(route, config)?.into()
        }
        other => {
            let config = provider_config(other.name(), api_key, selection.api_base);
            if other != BackendKind::Ollama {
                config.require_api_key()?;
            }
            let http_client = config.build_http_client()?;
            let params = ModelParameters::new(selection.model);
            match other {
                BackendKind::Ollama => OllamaBackend::new(config, params, http_client).into(),
                BackendKind::Perplexity => {
                    PerplexityBackend::new(config, params, http_client).into()
                }
                _ => GroqBackend::new(config, params, http_client).into(),
            }
        }
    };

    Ok(RetryingHandler::new(backend))
}
