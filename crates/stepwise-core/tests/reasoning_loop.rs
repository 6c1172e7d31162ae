//! Integration tests for the reasoning loop
//!
//! Drives full sessions through scripted handlers and a mock HTTP upstream.

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::json;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use stepwise_core::{
    CallOptions, Message, ModelRoute, NextAction, ProviderConfig, ReasoningConfig,
    ReasoningUpdate, RetryingHandler, Step, StepBackend, StepHandler, StepwiseError,
    StepwiseResult, generate_response,
};
use stepwise_core::llm::providers::RouterBackend;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Plays back a fixed list of steps, each after an optional simulated latency
struct ScriptedHandler {
    script: Mutex<Vec<(Duration, Step)>>,
    calls: AtomicU32,
}

impl ScriptedHandler {
    fn new(mut script: Vec<(Duration, Step)>) -> Self {
        script.reverse();
        Self {
            script: Mutex::new(script),
            calls: AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StepHandler for ScriptedHandler {
    async fn make_api_call(
        &self,
        _messages: &[Message],
        _max_tokens: u32,
        is_final_answer: bool,
        _options: &CallOptions,
    ) -> Step {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop();
        match next {
            Some((latency, step)) => {
                tokio::time::sleep(latency).await;
                step
            }
            None => Step::error("script exhausted", is_final_answer, 1),
        }
    }
}

/// A backend whose transport never succeeds
struct UnreachableBackend;

#[async_trait]
impl StepBackend for UnreachableBackend {
    fn name(&self) -> &'static str {
        "unreachable"
    }

    async fn request(
        &self,
        _messages: &[Message],
        _max_tokens: u32,
        _options: &CallOptions,
    ) -> StepwiseResult<String> {
        Err(StepwiseError::http_with_status("connection refused", 503))
    }
}

fn instant(title: &str, content: &str, next_action: NextAction) -> (Duration, Step) {
    (Duration::ZERO, Step::new(title, content, next_action))
}

async fn collect(
    prompt: &str,
    handler: &(impl StepHandler + ?Sized),
    config: ReasoningConfig,
) -> Vec<ReasoningUpdate> {
    generate_response(prompt, handler, config)
        .expect("valid session")
        .collect()
        .await
}

#[tokio::test(start_paused = true)]
async fn test_strawberry_session() {
    let handler = ScriptedHandler::new(vec![
        instant("Spell the word", "s-t-r-a-w-b-e-r-r-y", NextAction::Continue),
        instant("Count", "r appears 3 times", NextAction::FinalAnswer),
        instant("Answer", "3", NextAction::FinalAnswer),
    ]);

    let updates = collect(
        "How many 'R's are in the word strawberry?",
        &handler,
        ReasoningConfig::default(),
    )
    .await;

    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].steps.len(), 1);
    assert_eq!(updates[0].total_elapsed, None);

    let last = &updates[1];
    let labels: Vec<_> = last.steps.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Step 1: Spell the word", "Step 2: Count", "Final Answer"]
    );
    assert_eq!(last.steps[2].content, "3");
    assert!(last.steps[2].is_final_answer());
    assert!(last.total_elapsed.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_first_step_already_final_still_asks_for_answer() {
    let handler = ScriptedHandler::new(vec![
        instant("Obvious", "it is 4", NextAction::FinalAnswer),
        instant("Answer", "4", NextAction::FinalAnswer),
    ]);

    let updates = collect("What is 2 + 2?", &handler, ReasoningConfig::default()).await;

    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].steps.len(), 2);
    assert_eq!(handler.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_always_failing_handler_runs_to_budget() {
    let handler = RetryingHandler::new(UnreachableBackend);
    let config = ReasoningConfig::default().with_max_steps(5);

    let updates = collect("q", &handler, config).await;

    assert_eq!(updates.len(), 5);
    assert!(updates[..4].iter().all(|u| u.total_elapsed.is_none()));

    let last = &updates[4];
    assert_eq!(last.steps.len(), 6);
    assert!(last.steps[..5].iter().all(|s| s.label.ends_with(": Error")));
    assert!(
        last.steps[5]
            .content
            .starts_with("Failed to generate final answer after 3 attempts. Error:")
    );
}

#[tokio::test(start_paused = true)]
async fn test_labels_increase_by_one() {
    let mut script: Vec<_> = (0..6)
        .map(|_| instant("Think", "more", NextAction::Continue))
        .collect();
    script.push(instant("Done", "ok", NextAction::FinalAnswer));
    script.push(instant("Answer", "42", NextAction::FinalAnswer));
    let handler = ScriptedHandler::new(script);

    let updates = collect("q", &handler, ReasoningConfig::default()).await;
    let last = updates.last().unwrap();

    for (index, record) in last.steps[..7].iter().enumerate() {
        assert!(record.label.starts_with(&format!("Step {}: ", index + 1)));
    }
    for (index, update) in updates[..updates.len() - 1].iter().enumerate() {
        assert_eq!(update.steps.len(), index + 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_total_time_covers_every_call() {
    let handler = ScriptedHandler::new(vec![
        (Duration::from_millis(1500), Step::new("a", "a", NextAction::Continue)),
        (Duration::from_millis(250), Step::new("b", "b", NextAction::FinalAnswer)),
        (Duration::from_millis(750), Step::new("c", "c", NextAction::FinalAnswer)),
    ]);

    let updates = collect("q", &handler, ReasoningConfig::default()).await;
    let last = updates.last().unwrap();

    let sum: Duration = last.steps.iter().map(|s| s.elapsed).sum();
    let total = last.total_elapsed.unwrap();
    assert!(total >= sum);
    assert_eq!(last.steps[0].elapsed, Duration::from_millis(1500));
    assert_eq!(total, Duration::from_millis(2500));
}

#[tokio::test(start_paused = true)]
async fn test_dropping_the_stream_stops_the_session() {
    let handler = ScriptedHandler::new(vec![
        instant("one", "1", NextAction::Continue),
        instant("two", "2", NextAction::Continue),
        instant("three", "3", NextAction::FinalAnswer),
    ]);

    {
        let stream = generate_response("q", &handler, ReasoningConfig::default()).unwrap();
        let first: Vec<_> = stream.take(1).collect().await;
        assert_eq!(first.len(), 1);
    }

    assert_eq!(handler.calls(), 1);
}

#[tokio::test]
async fn test_session_against_http_upstream() {
    let mock_server = MockServer::start().await;
    let replies = [
        r#"{"title":"Decompose","content":"spell it","next_action":"continue"}"#,
        "```json\n{\"title\":\"Count\",\"content\":\"three r\",\"next_action\":\"final_answer\"}\n```",
        "There are 3 R's in strawberry.",
    ];
    for reply in replies {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"index": 0, "message": {"role": "assistant", "content": reply}}]
            })))
            .up_to_n_times(1)
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let route = ModelRoute::parse("openai/gpt-4o-mini").unwrap();
    let config = ProviderConfig::new(route.provider.name())
        .without_env_fallback()
        .with_api_key("test-key")
        .with_base_url(mock_server.uri());
    let backend = RouterBackend::connect(route, config).unwrap();
    let handler = RetryingHandler::new(backend);
    let config = ReasoningConfig::default().with_sleep_time(Duration::ZERO);

    let updates = collect("How many 'R's are in the word strawberry?", &handler, config).await;

    let last = updates.last().unwrap();
    assert_eq!(updates.len(), 2);
    assert_eq!(last.steps[1].label, "Step 2: Count");
    assert_eq!(last.steps[2].content, "There are 3 R's in strawberry.");
}
