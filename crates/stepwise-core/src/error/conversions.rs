//! From trait implementations for StepwiseError conversions

use super::types::StepwiseError;

impl From<std::io::Error> for StepwiseError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
            path: None,
        }
    }
}

impl From<serde_json::Error> for StepwiseError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<reqwest::Error> for StepwiseError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        let url = error.url().map(|u| u.to_string());
        Self::Http {
            message: error.to_string(),
            url,
            status_code,
        }
    }
}

impl From<dotenv::Error> for StepwiseError {
    fn from(error: dotenv::Error) -> Self {
        Self::config_with_context(error.to_string(), "Reading .env store")
    }
}
