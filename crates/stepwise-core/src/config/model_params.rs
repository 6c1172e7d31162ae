//! Model identifier and sampling defaults held by a handler

use crate::llm::CallOptions;
use crate::llm::options::{DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Immutable per-handler model settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Model identifier as understood by the backend
    pub model: String,
    /// Default temperature when a call does not set one
    pub temperature: Option<f32>,
    /// Default request timeout in seconds when a call does not set one
    pub timeout_secs: Option<u64>,
}

impl ModelParameters {
    /// Create parameters for a model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set the default temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the default timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Temperature for a call: call options, then handler default, then 0.2
    pub fn resolve_temperature(&self, options: &CallOptions) -> f32 {
        options
            .temperature
            .or(self.temperature)
            .unwrap_or(DEFAULT_TEMPERATURE)
    }

    /// Timeout for a call: call options, then handler default, then 30s
    pub fn resolve_timeout(&self, options: &CallOptions) -> Duration {
        options
            .timeout
            .or(self.timeout_secs.map(Duration::from_secs))
            .unwrap_or(DEFAULT_TIMEOUT)
    }
}
