//! Constructor methods for StepwiseError

use super::types::StepwiseError;

impl StepwiseError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            provider: None,
            context: None,
        }
    }

    /// Create an LLM error with provider
    pub fn llm_with_provider(message: impl Into<String>, provider: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            provider: Some(provider.into()),
            context: None,
        }
    }

    /// Create an HTTP error with status code
    pub fn http_with_status(message: impl Into<String>, status_code: u16) -> Self {
        Self::Http {
            message: message.into(),
            url: None,
            status_code: Some(status_code),
        }
    }

    /// Create a bad request error carrying the provider's own message
    pub fn bad_request(message: impl Into<String>, provider: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            provider: provider.into(),
        }
    }

    /// Create a JSON error with message
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
        }
    }

    /// Create an IO error with path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create an invalid input error with field
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a missing-resource error
    pub fn resource_missing(path: impl Into<String>) -> Self {
        Self::ResourceMissing { path: path.into() }
    }

    /// Attach context to LLM and configuration errors; other variants are returned as-is
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let ctx = Some(context.into());
        match &mut self {
            Self::Config { context: c, .. } => *c = ctx,
            Self::Llm { context: c, .. } => *c = ctx,
            _ => {}
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_is_distinguished() {
        let err = StepwiseError::bad_request("Invalid model 'foo'", "perplexity");
        assert!(err.is_bad_request());
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.provider(), Some("perplexity"));
        assert_eq!(err.to_string(), "Bad request (400): Invalid model 'foo'");
    }

    #[test]
    fn only_missing_resources_are_fatal() {
        assert!(StepwiseError::resource_missing("system_prompt.txt").is_fatal());
        assert!(!StepwiseError::llm("boom").is_fatal());
        assert!(!StepwiseError::http_with_status("down", 503).is_fatal());
    }

    #[test]
    fn with_context_only_touches_contextual_variants() {
        let err = StepwiseError::llm("timeout").with_context("step 3");
        assert!(matches!(err, StepwiseError::Llm { context: Some(ref c), .. } if c == "step 3"));

        let err = StepwiseError::json("eof").with_context("ignored");
        assert!(matches!(err, StepwiseError::Json { .. }));
    }
}
