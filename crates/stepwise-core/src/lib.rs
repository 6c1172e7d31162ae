//! Stepwise Core Library
//!
//! Drives multi-step "chain of thought" reasoning sessions against pluggable
//! LLM backends. Each backend reply is normalized into a [`Step`]; the
//! reasoning loop streams the growing transcript to the caller.

pub mod config;
pub mod error;
pub mod llm;
pub mod reasoning;

// Re-export commonly used types
pub use config::{EnvStore, ModelParameters, ProviderConfig, ReasoningConfig};
pub use error::{StepwiseError, StepwiseResult};
pub use llm::{
    BackendInstance, BackendKind, CallOptions, LlmProvider, Message, MessageRole, ModelRoute,
    NextAction, RetryPolicy, RetryingHandler, Step, StepBackend, StepHandler,
};
pub use reasoning::{
    ReasoningSession, ReasoningUpdate, StepRecord, SystemPrompt, generate_response,
};
