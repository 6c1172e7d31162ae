//! Records yielded by the reasoning stream

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Label prefix of the record produced by the final-answer call
pub const FINAL_ANSWER_LABEL: &str = "Final Answer";

/// One rendered entry of the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// `Step {n}: {title}` or `Final Answer`
    pub label: String,
    pub content: String,
    /// Wall-clock time of the handler call that produced the entry
    pub elapsed: Duration,
}

impl StepRecord {
    pub fn new(label: impl Into<String>, content: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            label: label.into(),
            content: content.into(),
            elapsed,
        }
    }

    /// Whether this entry should be highlighted as the answer
    pub fn is_final_answer(&self) -> bool {
        self.label.starts_with(FINAL_ANSWER_LABEL)
    }
}

/// Snapshot yielded by the reasoning stream
///
/// Every element carries all steps recorded so far. Only the last element
/// carries the total elapsed time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningUpdate {
    pub steps: Vec<StepRecord>,
    pub total_elapsed: Option<Duration>,
}

impl ReasoningUpdate {
    /// Intermediate snapshot
    pub fn partial(steps: Vec<StepRecord>) -> Self {
        Self {
            steps,
            total_elapsed: None,
        }
    }

    /// Terminal snapshot
    pub fn complete(steps: Vec<StepRecord>, total_elapsed: Duration) -> Self {
        Self {
            steps,
            total_elapsed: Some(total_elapsed),
        }
    }

    /// Whether this is the last element of the stream
    pub fn is_terminal(&self) -> bool {
        self.total_elapsed.is_some()
    }
}
