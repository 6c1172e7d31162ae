//! Provider-specific backends

pub mod backend_instance;
pub mod error_utils;
pub mod groq;
pub mod ollama;
pub mod openai_compat;
pub mod perplexity;
pub mod router;


pub use backend_instance::{BackendInstance, BackendKind};
pub use groq::GroqBackend;
pub use ollama::OllamaBackend;
pub use perplexity::{PerplexityBackend, consolidate_messages};
pub use router::RouterBackend;
