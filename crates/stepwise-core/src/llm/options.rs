//! Per-call options passed to step handlers

use serde_json::{Map, Value};
use std::time::Duration;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Options for a single `make_api_call`
///
/// Every field is optional; unset fields fall back to the documented defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallOptions {
    /// Sampling temperature (default 0.2)
    pub temperature: Option<f32>,
    /// Request timeout (default 30s)
    pub timeout: Option<Duration>,
    /// Provider-specific body fields merged into the request verbatim
    pub extra: Map<String, Value>,
}

impl CallOptions {
    /// Create options with every field defaulted
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a provider-specific body field
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Effective temperature
    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    /// Effective timeout
    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }
}
