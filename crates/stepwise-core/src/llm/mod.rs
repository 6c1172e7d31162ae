//! LLM handler abstraction, step normalization and provider backends

pub mod handler;
pub mod messages;
pub mod normalize;
pub mod options;
pub mod provider_types;
pub mod providers;
pub mod retry;
pub mod step;

pub use handler::{StepBackend, StepHandler};
pub use messages::{Message, MessageRole};
pub use options::CallOptions;
pub use provider_types::{LlmProvider, ModelRoute};
pub use providers::{BackendInstance, BackendKind};
pub use retry::{RetryPolicy, RetryingHandler};
pub use step::{NextAction, Step};

#[cfg(test)]
pub use handler::MockStepHandler;
