//! The normalized reasoning step record

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};

/// Title used for synthetic steps produced after the retry budget is spent
pub const ERROR_TITLE: &str = "Error";

/// Title used when the model reply could not be parsed as a step
pub const RAW_RESPONSE_TITLE: &str = "Raw Response";

/// Title used for steps remapped from the legacy `final_answer` shape
pub const FINAL_ANSWER_TITLE: &str = "Final Answer";

/// Continuation signal attached to every step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    /// The model wants to keep reasoning
    Continue,
    /// The model considers its reasoning complete
    FinalAnswer,
}

impl NextAction {
    /// Interpret a raw signal; anything other than `final_answer`
    /// (trimmed, case-insensitive) means the chain continues.
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("final_answer") {
            Self::FinalAnswer
        } else {
            Self::Continue
        }
    }

    /// Signal for a step that must end the chain when `is_final` is set
    pub fn forced(is_final: bool) -> Self {
        if is_final {
            Self::FinalAnswer
        } else {
            Self::Continue
        }
    }

    /// Wire name of the signal
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::FinalAnswer => "final_answer",
        }
    }
}

impl std::fmt::Display for NextAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NextAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&raw))
    }
}

/// One unit of model-produced reasoning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Short heading for the step
    pub title: String,
    /// Explanatory content
    pub content: String,
    /// Continuation signal
    pub next_action: NextAction,
    /// Self-reported confidence, 0-100
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_confidence"
    )]
    pub confidence: Option<u8>,
}

impl Step {
    /// Create a step without confidence
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        next_action: NextAction,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            next_action,
            confidence: None,
        }
    }

    /// Attach a confidence value, clamped to 0-100
    pub fn with_confidence(mut self, confidence: u8) -> Self {
        self.confidence = Some(confidence.min(100));
        self
    }

    /// Synthetic step returned once every attempt has failed
    pub fn error(error_msg: &str, is_final_answer: bool, attempts: u32) -> Self {
        let target = if is_final_answer {
            "final answer"
        } else {
            "step"
        };
        Self::new(
            ERROR_TITLE,
            format!(
                "Failed to generate {} after {} attempts. Error: {}",
                target, attempts, error_msg
            ),
            NextAction::forced(is_final_answer),
        )
    }

    /// Fallback step carrying an unparsable reply verbatim
    pub fn raw(content: impl Into<String>, next_action: NextAction) -> Self {
        Self::new(RAW_RESPONSE_TITLE, content, next_action)
    }

    /// Whether the step signals the end of the chain
    pub fn is_final(&self) -> bool {
        self.next_action == NextAction::FinalAnswer
    }

    /// Re-serialize the step the way it is fed back to the model
    pub fn to_json(&self) -> String {
        // A struct of strings and small integers always serializes
        serde_json::to_string(self).unwrap_or_else(|_| {
            json!({
                "title": self.title,
                "content": self.content,
                "next_action": self.next_action.as_str(),
            })
            .to_string()
        })
    }

    /// JSON schema used by backends with strict structured output
    pub fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "content": {"type": "string"},
                "next_action": {"type": "string", "enum": ["continue", "final_answer"]},
                "confidence": {"type": "integer", "minimum": 0, "maximum": 100}
            },
            "required": ["title", "content", "next_action", "confidence"],
            "additionalProperties": false
        })
    }
}

fn deserialize_confidence<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    // Models sometimes quote the number or append a percent sign
    let score = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().trim_end_matches('%').trim_end().parse().ok(),
        _ => None,
    };
    Ok(score
        .filter(|value: &f64| value.is_finite())
        .map(|value| value.clamp(0.0, 100.0).round() as u8))
}
