//! Reasoning instructions and fixed conversation turns

use crate::error::{StepwiseError, StepwiseResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Built-in reasoning instructions
pub const SYSTEM_PROMPT: &str = r#"You are an expert reasoner who works through problems one explicit step at a time.

For every step:
1. Give the step a short title describing what it does.
2. Explain the reasoning of the step in full. Do not skip over details or jump to conclusions.
3. Decide whether more reasoning is needed ("continue") or you are ready to answer ("final_answer").

Rules:
- Use at least 3 steps before giving a final answer.
- Start with a thorough decomposition of the problem.
- Be skeptical of your own reasoning. Actively look for mistakes, double-check calculations and re-read the question.
- Consider alternative hypotheses and explain why you accept or reject them.
- When a step reveals a mistake, say so and correct course in the following step.
- Acknowledge uncertainty where it exists and state how confident you are.

Reply with exactly one JSON object per message and nothing else:
{"title": "<step title>", "content": "<step reasoning>", "next_action": "continue" | "final_answer", "confidence": <0-100>}"#;

/// Assistant turn seeding the conversation after the user query
pub const ACKNOWLEDGMENT: &str = "Understood. I will now create a detailed reasoning chain following the given instructions, starting with a thorough problem decomposition.";

/// User turn requesting the answer once the reasoning loop ends
pub const FINAL_ANSWER_REQUEST: &str =
    "Please provide the final answer based on your reasoning above.";

/// Source of the system instructions for a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemPrompt {
    /// The built-in [`SYSTEM_PROMPT`]
    #[default]
    Inline,
    /// Instructions read from a text file when the session starts
    File(PathBuf),
}

impl SystemPrompt {
    /// Resolve the instruction text
    ///
    /// A missing file is reported as [`StepwiseError::ResourceMissing`], which
    /// callers treat as fatal.
    pub fn load(&self) -> StepwiseResult<String> {
        match self {
            Self::Inline => Ok(SYSTEM_PROMPT.to_string()),
            Self::File(path) => match std::fs::read_to_string(path) {
                Ok(text) => Ok(text),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(StepwiseError::resource_missing(path.display().to_string()))
                }
                Err(e) => Err(StepwiseError::io_with_path(
                    e.to_string(),
                    path.display().to_string(),
                )),
            },
        }
    }
}
