//! Fixed-delay retry wrapper around a [`StepBackend`]

use crate::llm::handler::{StepBackend, StepHandler};
use crate::llm::messages::Message;
use crate::llm::options::CallOptions;
use crate::llm::step::Step;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Attempts per call
pub const MAX_ATTEMPTS: u32 = 3;

/// Pause between failed attempts
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Retry policy: a fixed number of attempts with a constant pause, no backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Pause after each failed attempt except the last
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            retry_delay: RETRY_DELAY,
        }
    }
}

/// A [`StepHandler`] that retries a backend and degrades to an error step
pub struct RetryingHandler<B> {
    backend: B,
    policy: RetryPolicy,
}

impl<B: StepBackend> RetryingHandler<B> {
    /// Wrap a backend with the default policy
    pub fn new(backend: B) -> Self {
        Self::with_policy(backend, RetryPolicy::default())
    }

    /// Wrap a backend with an explicit policy
    pub fn with_policy(backend: B, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    /// The wrapped backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The retry policy in effect
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

#[async_trait]
impl<B: StepBackend> StepHandler for RetryingHandler<B> {
    #[instrument(skip(self, messages, options))]
    async fn make_api_call(
        &self,
        messages: &[Message],
        max_tokens: u32,
        is_final_answer: bool,
        options: &CallOptions,
    ) -> Step {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            let outcome = match self.backend.request(messages, max_tokens, options).await {
                Ok(raw) => {
                    debug!(
                        provider = self.backend.name(),
                        attempt,
                        chars = raw.len(),
                        "received raw reply"
                    );
                    self.backend.normalize(&raw, is_final_answer)
                }
                Err(error) => Err(error),
            };

            match outcome {
                Ok(step) => {
                    if attempt > 1 {
                        info!(attempt, "request succeeded after retry");
                    }
                    return step;
                }
                Err(error) => {
                    if attempt < max_attempts {
                        warn!(
                            provider = self.backend.name(),
                            attempt,
                            max_attempts,
                            error = %error,
                            "request failed, retrying in {:.2}s",
                            self.policy.retry_delay.as_secs_f64()
                        );
                        last_error = Some(error);
                        sleep(self.policy.retry_delay).await;
                    } else {
                        tracing::error!(attempts = max_attempts, error = %error, "all attempts exhausted");
                        last_error = Some(error);
                    }
                }
            }
        }

        let message = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no error details".to_string());
        Step::error(&message, is_final_answer, max_attempts)
    }
}
