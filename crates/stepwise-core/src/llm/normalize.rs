//! Response normalization
//!
//! Turns whatever text a backend produced into a [`Step`]. Malformed output
//! is never an error here: it degrades to a `Raw Response` step carrying the
//! reply verbatim.

use crate::llm::step::{FINAL_ANSWER_TITLE, NextAction, Step};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Substring that marks a final-answer intent inside an unparsable reply
pub const FINAL_ANSWER_MARKER: &str = r#""next_action": "final_answer""#;

/// Confidence assigned to raw fallbacks from structured-output backends
pub const DEFAULT_STRUCTURED_CONFIDENCE: u8 = 50;

static CODE_FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A```[A-Za-z0-9_+-]*[ \t]*\r?\n?(.*?)\r?\n?[ \t]*```\z")
        .expect("valid code fence regex")
});

/// Remove a code fence enclosing the whole text, keeping its body
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    match CODE_FENCE_RE.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str().trim(),
        None => trimmed,
    }
}

/// Whether the reply declares a final answer even though it is not valid JSON
pub fn mentions_final_answer(raw: &str) -> bool {
    raw.to_lowercase().contains(FINAL_ANSWER_MARKER)
}

/// Strictly parse a step object from (possibly fenced) text
pub fn parse_step(text: &str) -> Result<Step, serde_json::Error> {
    let value: Value = serde_json::from_str(strip_code_fences(text))?;
    if !value.is_object() {
        return Err(serde::de::Error::custom("expected a JSON object"));
    }
    serde_json::from_value(value)
}

/// Fallback for replies that do not parse as a step
pub fn raw_fallback(raw: &str, is_final_answer: bool) -> Step {
    tracing::warn!(
        chars = raw.len(),
        "content is not a valid JSON step, returning raw response"
    );
    let next_action = NextAction::forced(is_final_answer || mentions_final_answer(raw));
    Step::raw(raw, next_action)
}

/// Default normalization: fence stripping, strict parse, raw fallback
pub fn normalize_response(raw: &str, is_final_answer: bool) -> Step {
    match parse_step(raw) {
        Ok(step) => step,
        Err(_) => raw_fallback(raw, is_final_answer),
    }
}

/// Normalization for backends that were asked for schema-constrained output
pub fn normalize_structured(raw: &str, is_final_answer: bool) -> Step {
    match parse_step(raw) {
        Ok(step) => step,
        Err(_) => raw_fallback(raw, is_final_answer).with_confidence(DEFAULT_STRUCTURED_CONFIDENCE),
    }
}

/// Normalization for the local chat backend
///
/// Unwraps the `message.content` envelope when present and accepts the
/// legacy `{"final_answer": ...}` shape before the default rules apply.
pub fn normalize_enveloped(body: &str, is_final_answer: bool) -> Step {
    let content = unwrap_envelope(body).unwrap_or_else(|| body.to_string());

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(strip_code_fences(&content)) {
        if let Some(answer) = map.get("final_answer") {
            let text = match answer {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Step::new(FINAL_ANSWER_TITLE, text, NextAction::FinalAnswer);
        }
    }

    normalize_response(&content, is_final_answer)
}

fn unwrap_envelope(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::step::{RAW_RESPONSE_TITLE, ERROR_TITLE};

    #[test]
    fn strips_enclosing_fences_only() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(
            strip_code_fences("before ```x``` after"),
            "before ```x``` after"
        );
    }

    #[test]
    fn parses_fenced_step() {
        let raw = "```json\n{\"title\": \"Count letters\", \"content\": \"s t r\", \"next_action\": \"continue\"}\n```";
        let step = normalize_response(raw, false);
        assert_eq!(step.title, "Count letters");
        assert_eq!(step.next_action, NextAction::Continue);
    }

    #[test]
    fn malformed_text_is_kept_verbatim() {
        for raw in [
            "",
            "   leading and trailing   ",
            "{\"title\": \"half",
            "[1, 2, 3]",
            r#"["t", "c", "continue"]"#,
            "```json\nnot json\n```",
            "plain prose answer",
        ] {
            let step = normalize_response(raw, false);
            assert_eq!(step.title, RAW_RESPONSE_TITLE);
            assert_eq!(step.content, raw);
            assert_eq!(step.next_action, NextAction::Continue);
        }
    }

    #[test]
    fn raw_fallback_honours_final_answer_phase() {
        let step = normalize_response("The answer is 3.", true);
        assert_eq!(step.title, RAW_RESPONSE_TITLE);
        assert_eq!(step.next_action, NextAction::FinalAnswer);
    }

    #[test]
    fn marker_in_malformed_text_forces_final_answer() {
        let raw = r#"not json at all but mentions "next_action": "final_answer""#;
        let step = normalize_response(raw, false);
        assert_eq!(step.title, RAW_RESPONSE_TITLE);
        assert_eq!(step.content, raw);
        assert_eq!(step.next_action, NextAction::FinalAnswer);

        assert!(mentions_final_answer(r#"{"NEXT_ACTION": "FINAL_ANSWER", oops"#));
    }

    #[test]
    fn structured_fallback_carries_default_confidence() {
        let step = normalize_structured("garbage", false);
        assert_eq!(step.confidence, Some(DEFAULT_STRUCTURED_CONFIDENCE));
        assert_eq!(step.content, "garbage");

        let step = normalize_structured(
            r#"{"title":"t","content":"c","next_action":"continue","confidence":70}"#,
            false,
        );
        assert_eq!(step.confidence, Some(70));
    }

    #[test]
    fn odd_confidence_keeps_the_step() {
        let step = normalize_response(
            r#"{"title":"Tally","content":"three","next_action":"continue","confidence":"very sure"}"#,
            false,
        );
        assert_eq!(step.title, "Tally");
        assert_eq!(step.confidence, None);
    }

    #[test]
    fn envelope_is_unwrapped() {
        let body = r#"{"model":"mistral","message":{"role":"assistant","content":"{\"title\":\"Plan\",\"content\":\"decompose\",\"next_action\":\"continue\"}"},"done":true}"#;
        let step = normalize_enveloped(body, false);
        assert_eq!(step.title, "Plan");
        assert_eq!(step.content, "decompose");
    }

    #[test]
    fn legacy_final_answer_key_is_remapped() {
        let body = r#"{"message":{"content":"{\"final_answer\": \"There are 3 Rs.\"}"}}"#;
        let step = normalize_enveloped(body, false);
        assert_eq!(step.title, FINAL_ANSWER_TITLE);
        assert_eq!(step.content, "There are 3 Rs.");
        assert!(step.is_final());
    }

    #[test]
    fn unparsable_envelope_content_falls_back() {
        let body = r#"{"message":{"content":"thinking out loud"}}"#;
        let step = normalize_enveloped(body, true);
        assert_eq!(step.title, RAW_RESPONSE_TITLE);
        assert_eq!(step.content, "thinking out loud");
        assert!(step.is_final());
        assert_ne!(step.title, ERROR_TITLE);
    }
}
