//! Stepwise reasoning sessions
//!
//! A session seeds the conversation with the system instructions, the user
//! query and an assistant acknowledgment, then asks the handler for one step
//! at a time until the model signals a final answer or the step budget runs
//! out. A last call produces the answer itself.

pub mod generator;
pub mod prompt;
pub mod session;
pub mod types;

pub use generator::generate_response;
pub use prompt::{ACKNOWLEDGMENT, FINAL_ANSWER_REQUEST, SYSTEM_PROMPT, SystemPrompt};
pub use session::ReasoningSession;
pub use types::{FINAL_ANSWER_LABEL, ReasoningUpdate, StepRecord};
