//! Reasoning session configuration

use crate::error::{StepwiseError, StepwiseResult};
use crate::llm::CallOptions;
use crate::reasoning::SystemPrompt;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of reasoning steps before the final-answer call
pub const DEFAULT_MAX_STEPS: u32 = 20;

/// Hard upper bound on the step budget
pub const MAX_STEPS_CAP: u32 = 20;

/// Default token budget for an ordinary step
pub const DEFAULT_MAX_TOKENS: u32 = 512;

/// Default token budget for the dedicated final-answer call
pub const DEFAULT_FINAL_ANSWER_TOKENS: u32 = 200;

/// Default pause before each step call
pub const DEFAULT_SLEEP_TIME: Duration = Duration::from_secs(1);

/// Tunables for one reasoning session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    /// Maximum number of reasoning steps (1..=20)
    pub max_steps: u32,
    /// Token budget for each reasoning step
    pub max_tokens: u32,
    /// Token budget for the final-answer call
    pub final_answer_tokens: u32,
    /// Sampling temperature (0..=2)
    pub temperature: f32,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Fixed pause before each step call, in seconds
    pub sleep_time_secs: f64,
    /// Where the reasoning instructions come from
    pub system_prompt: SystemPrompt,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            max_tokens: DEFAULT_MAX_TOKENS,
            final_answer_tokens: DEFAULT_FINAL_ANSWER_TOKENS,
            temperature: crate::llm::options::DEFAULT_TEMPERATURE,
            timeout_secs: crate::llm::options::DEFAULT_TIMEOUT.as_secs(),
            sleep_time_secs: DEFAULT_SLEEP_TIME.as_secs_f64(),
            system_prompt: SystemPrompt::default(),
        }
    }
}

impl ReasoningConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the step budget, capped at [`MAX_STEPS_CAP`]
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.min(MAX_STEPS_CAP);
        self
    }

    /// Set the per-step token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the final-answer token budget
    pub fn with_final_answer_tokens(mut self, tokens: u32) -> Self {
        self.final_answer_tokens = tokens;
        self
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the request timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the pause before each step call
    pub fn with_sleep_time(mut self, sleep_time: Duration) -> Self {
        self.sleep_time_secs = sleep_time.as_secs_f64();
        self
    }

    /// Set the instruction source
    pub fn with_system_prompt(mut self, system_prompt: SystemPrompt) -> Self {
        self.system_prompt = system_prompt;
        self
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Pre-call pause as a Duration
    pub fn sleep_time(&self) -> Duration {
        Duration::try_from_secs_f64(self.sleep_time_secs).unwrap_or(Duration::ZERO)
    }

    /// Options passed along with every handler call of the session
    pub fn call_options(&self) -> CallOptions {
        CallOptions::new()
            .with_temperature(self.temperature)
            .with_timeout(self.timeout())
    }

    /// Validate the configuration
    pub fn validate(&self) -> StepwiseResult<()> {
        if self.max_steps == 0 || self.max_steps > MAX_STEPS_CAP {
            return Err(StepwiseError::invalid_input_field(
                format!("max_steps must be between 1 and {}", MAX_STEPS_CAP),
                "max_steps",
            ));
        }
        if self.max_tokens == 0 {
            return Err(StepwiseError::invalid_input_field(
                "max_tokens must be greater than 0",
                "max_tokens",
            ));
        }
        if self.final_answer_tokens == 0 {
            return Err(StepwiseError::invalid_input_field(
                "final_answer_tokens must be greater than 0",
                "final_answer_tokens",
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(StepwiseError::invalid_input_field(
                "temperature must be between 0 and 2",
                "temperature",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(StepwiseError::invalid_input_field(
                "timeout must be greater than 0",
                "timeout_secs",
            ));
        }
        if !self.sleep_time_secs.is_finite() || self.sleep_time_secs < 0.0 {
            return Err(StepwiseError::invalid_input_field(
                "sleep time must be a non-negative number of seconds",
                "sleep_time_secs",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ReasoningConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_steps, 20);
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.final_answer_tokens, 200);
        assert_eq!(config.sleep_time(), Duration::from_secs(1));
    }

    #[test]
    fn step_budget_is_capped() {
        assert_eq!(ReasoningConfig::new().with_max_steps(50).max_steps, MAX_STEPS_CAP);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(ReasoningConfig::new().with_max_steps(0).validate().is_err());
        assert!(ReasoningConfig::new().with_temperature(2.5).validate().is_err());
        assert!(ReasoningConfig::new().with_temperature(f32::NAN).validate().is_err());
        assert!(ReasoningConfig::new().with_max_tokens(0).validate().is_err());
        assert!(ReasoningConfig::new().with_timeout_secs(0).validate().is_err());

        let mut config = ReasoningConfig::new();
        config.sleep_time_secs = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn call_options_carry_sampling_settings() {
        let options = ReasoningConfig::new()
            .with_temperature(0.7)
            .with_timeout_secs(12)
            .call_options();
        assert_eq!(options.temperature(), 0.7);
        assert_eq!(options.timeout(), Duration::from_secs(12));
    }

    #[test]
    fn deserializes_partial_config() {
        let config: ReasoningConfig = serde_json::from_str(r#"{"max_steps": 5}"#).unwrap();
        assert_eq!(config.max_steps, 5);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }
}
