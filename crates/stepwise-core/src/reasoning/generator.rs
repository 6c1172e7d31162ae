//! The stepwise generation loop

use super::prompt::FINAL_ANSWER_REQUEST;
use super::session::ReasoningSession;
use super::types::{FINAL_ANSWER_LABEL, ReasoningUpdate, StepRecord};
use crate::config::ReasoningConfig;
use crate::error::StepwiseResult;
use crate::llm::handler::StepHandler;
use crate::llm::messages::Message;
use async_stream::stream;
use futures::Stream;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{Instrument, info, info_span};

/// Start a session and return its update stream
///
/// Fails only on invalid input or a missing system prompt resource; once the
/// stream exists every element is renderable.
pub fn generate_response<'a, H>(
    prompt: &str,
    handler: &'a H,
    config: ReasoningConfig,
) -> StepwiseResult<impl Stream<Item = ReasoningUpdate> + Send + use<'a, H>>
where
    H: StepHandler + ?Sized,
{
    Ok(ReasoningSession::start(prompt, config)?.run(handler))
}

impl ReasoningSession {
    /// Drive the conversation, yielding a snapshot after every continued step
    ///
    /// The stream ends after the final-answer call; dropping it early cancels
    /// the session.
    pub fn run<'a, H>(
        self,
        handler: &'a H,
    ) -> impl Stream<Item = ReasoningUpdate> + Send + use<'a, H>
    where
        H: StepHandler + ?Sized,
    {
        let span = info_span!("reasoning_session", session_id = %self.id);

        stream! {
            let config = self.config.clone();
            let options = config.call_options();
            let sleep_time = config.sleep_time();
            let mut messages = self.initial_messages();
            let mut steps: Vec<StepRecord> = Vec::new();
            let mut total = Duration::ZERO;
            let mut step_count: u32 = 1;

            span.in_scope(|| info!(max_steps = config.max_steps, "reasoning started"));

            loop {
                if !sleep_time.is_zero() {
                    sleep(sleep_time).await;
                }

                let started = Instant::now();
                let step = handler
                    .make_api_call(&messages, config.max_tokens, false, &options)
                    .instrument(span.clone())
                    .await;
                let elapsed = started.elapsed();
                total += elapsed;

                span.in_scope(|| {
                    info!(
                        step = step_count,
                        title = %step.title,
                        next_action = %step.next_action,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "step completed"
                    )
                });

                steps.push(StepRecord::new(
                    format!("Step {}: {}", step_count, step.title),
                    step.content.clone(),
                    elapsed,
                ));
                messages.push(Message::assistant(step.to_json()));

                if step.is_final() || step_count >= config.max_steps {
                    break;
                }

                step_count += 1;
                yield ReasoningUpdate::partial(steps.clone());
            }

            messages.push(Message::user(FINAL_ANSWER_REQUEST));

            let started = Instant::now();
            let final_step = handler
                .make_api_call(&messages, config.final_answer_tokens, true, &options)
                .instrument(span.clone())
                .await;
            let elapsed = started.elapsed();
            total += elapsed;

            steps.push(StepRecord::new(FINAL_ANSWER_LABEL, final_step.content, elapsed));

            span.in_scope(|| {
                info!(
                    steps = steps.len(),
                    total_secs = total.as_secs_f64(),
                    "reasoning finished"
                )
            });

            yield ReasoningUpdate::complete(steps, total);
        }
    }
}
