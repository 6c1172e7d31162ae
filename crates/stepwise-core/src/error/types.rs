//! Core error type for Stepwise

use thiserror::Error;

/// Result type alias for Stepwise operations
pub type StepwiseResult<T> = Result<T, StepwiseError>;

/// Main error type for Stepwise
#[derive(Error, Debug, Clone)]
pub enum StepwiseError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// LLM transport or response-shape errors
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        provider: Option<String>,
        context: Option<String>,
    },

    /// HTTP request errors
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
    },

    /// The provider rejected the request shape (HTTP 400)
    #[error("Bad request (400): {message}")]
    BadRequest { message: String, provider: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    /// A static resource required to start a session is missing
    #[error("Required resource not found: {path}")]
    ResourceMissing { path: String },
}

impl StepwiseError {
    /// Whether the error must abort the process instead of degrading
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ResourceMissing { .. })
    }

    /// Whether the provider rejected the request shape
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest { .. })
            || matches!(self, Self::Http { status_code: Some(400), .. })
    }

    /// HTTP status code attached to the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status_code, .. } => *status_code,
            Self::BadRequest { .. } => Some(400),
            _ => None,
        }
    }

    /// Provider name attached to the error, if any
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::Llm { provider, .. } => provider.as_deref(),
            Self::BadRequest { provider, .. } => Some(provider),
            _ => None,
        }
    }
}
