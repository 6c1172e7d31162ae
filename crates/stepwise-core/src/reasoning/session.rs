//! Reasoning session setup

use super::prompt::{ACKNOWLEDGMENT, SystemPrompt};
use crate::config::ReasoningConfig;
use crate::error::{StepwiseError, StepwiseResult};
use crate::llm::messages::Message;
use tracing::debug;
use uuid::Uuid;

/// A validated session, ready to run
///
/// Everything that can fail happens in [`ReasoningSession::start`], so the
/// stream returned by [`ReasoningSession::run`](super::generator) only ever
/// yields renderable updates.
#[derive(Debug, Clone)]
pub struct ReasoningSession {
    pub(crate) id: Uuid,
    pub(crate) prompt: String,
    pub(crate) system_prompt: String,
    pub(crate) config: ReasoningConfig,
}

impl ReasoningSession {
    /// Validate the inputs and load the system instructions
    pub fn start(prompt: impl Into<String>, config: ReasoningConfig) -> StepwiseResult<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(StepwiseError::invalid_input_field(
                "Prompt must not be empty",
                "prompt",
            ));
        }
        config.validate()?;

        let system_prompt = config.system_prompt.load()?;
        let id = Uuid::new_v4();
        debug!(
            session_id = %id,
            custom_prompt = !matches!(config.system_prompt, SystemPrompt::Inline),
            "reasoning session prepared"
        );

        Ok(Self {
            id,
            prompt,
            system_prompt,
            config,
        })
    }

    /// Session identifier used in log spans
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn config(&self) -> &ReasoningConfig {
        &self.config
    }

    /// System instructions, user query and the assistant acknowledgment
    pub fn initial_messages(&self) -> Vec<Message> {
        vec![
            Message::system(self.system_prompt.clone()),
            Message::user(self.prompt.clone()),
            Message::assistant(ACKNOWLEDGMENT),
        ]
    }
}
