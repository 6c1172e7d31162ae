//! Step handler traits
//!
//! [`StepHandler`] is what the reasoning loop talks to. [`StepBackend`] is
//! what each provider implements: one transport attempt plus the
//! provider's response normalization. [`crate::llm::RetryingHandler`] joins
//! the two.

use crate::error::StepwiseResult;
use crate::llm::messages::Message;
use crate::llm::normalize::normalize_response;
use crate::llm::options::CallOptions;
use crate::llm::step::Step;
use async_trait::async_trait;
use std::sync::Arc;

/// Produces one normalized reasoning step per call
///
/// Implementations must always return a step; failures are expressed as
/// synthetic error steps rather than errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StepHandler: Send + Sync {
    /// Ask the backend for the next step of the conversation
    async fn make_api_call(
        &self,
        messages: &[Message],
        max_tokens: u32,
        is_final_answer: bool,
        options: &CallOptions,
    ) -> Step;
}

#[async_trait]
impl<T: StepHandler + ?Sized> StepHandler for Box<T> {
    async fn make_api_call(
        &self,
        messages: &[Message],
        max_tokens: u32,
        is_final_answer: bool,
        options: &CallOptions,
    ) -> Step {
        (**self)
            .make_api_call(messages, max_tokens, is_final_answer, options)
            .await
    }
}

#[async_trait]
impl<T: StepHandler + ?Sized> StepHandler for Arc<T> {
    async fn make_api_call(
        &self,
        messages: &[Message],
        max_tokens: u32,
        is_final_answer: bool,
        options: &CallOptions,
    ) -> Step {
        (**self)
            .make_api_call(messages, max_tokens, is_final_answer, options)
            .await
    }
}

/// One provider: transport plus response normalization
#[async_trait]
pub trait StepBackend: Send + Sync {
    /// Provider name used in logs and errors
    fn name(&self) -> &'static str;

    /// Perform a single transport attempt and return the raw reply
    async fn request(
        &self,
        messages: &[Message],
        max_tokens: u32,
        options: &CallOptions,
    ) -> StepwiseResult<String>;

    /// Turn a raw reply into a step; an error counts as a failed attempt
    fn normalize(&self, raw: &str, is_final_answer: bool) -> StepwiseResult<Step> {
        Ok(normalize_response(raw, is_final_answer))
    }
}
