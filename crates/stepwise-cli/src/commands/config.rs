//! `.env` store commands

use crate::console::CLIConsole;
use colored::*;
use std::path::Path;
use stepwise_core::config::{EnvStore, mask_api_key};
use stepwise_core::{StepwiseError, StepwiseResult};

/// Value as shown to the user: secrets masked, empty values marked
pub fn display_value(key: &str, value: Option<&str>) -> String {
    match value {
        None | Some("") => "(not set)".to_string(),
        Some(value) if EnvStore::is_secret(key) => mask_api_key(value),
        Some(value) => value.to_string(),
    }
}

/// Show current settings
pub async fn show(env_file: &Path) -> StepwiseResult<()> {
    let console = CLIConsole::new(true);
    let store = EnvStore::load(env_file)?;

    console.print_header("Configuration");
    if env_file.exists() {
        console.success(&format!("Loaded settings from: {}", env_file.display()));
    } else {
        console.warn(&format!("Settings file not found: {}", env_file.display()));
        console.info("Using default settings");
    }

    for key in EnvStore::known_keys() {
        let value = store.get(key);
        println!(
            "  {:<20} {}",
            key.bold(),
            display_value(key, value.as_deref())
        );
    }
    Ok(())
}

/// Persist one setting
pub async fn set(env_file: &Path, key: &str, value: &str) -> StepwiseResult<()> {
    let console = CLIConsole::new(true);
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) || key.contains('=') {
        return Err(StepwiseError::invalid_input_field(
            format!("Invalid setting name '{}'", key),
            "key",
        ));
    }
    if value.contains(['\n', '\r']) {
        return Err(StepwiseError::invalid_input_field(
            format!("Value for {} must fit on one line", key),
            "value",
        ));
    }

    let mut store = EnvStore::load(env_file)?;
    if EnvStore::default_for(key).is_none() {
        console.warn(&format!("{} is not a recognized setting, saving anyway", key));
    }
    store.set(key, value);

    // Reject tunables that would make every later session fail
    store.clone().without_process_env().reasoning_config()?;

    store.save()?;
    tracing::info!(key, path = %env_file.display(), "setting saved");
    console.success(&format!(
        "{} = {} saved to {}",
        key,
        display_value(key, Some(value)),
        env_file.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_masked() {
        assert_eq!(
            display_value("GROQ_API_KEY", Some("gsk-1234567890abcdef")),
            "gsk-12...cdef"
        );
        assert_eq!(display_value("OLLAMA_MODEL", Some("mistral")), "mistral");
        assert_eq!(display_value("PERPLEXITY_API_KEY", Some("")), "(not set)");
    }

    #[tokio::test]
    async fn set_persists_to_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "# local settings\nOLLAMA_MODEL=mistral\n").unwrap();

        set(&path, "OLLAMA_MODEL", "llama3.1").await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "# local settings\nOLLAMA_MODEL=llama3.1\n");
    }

    #[tokio::test]
    async fn set_rejects_invalid_tunable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");

        assert!(set(&path, "STEPWISE_TEMPERATURE", "hot").await.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn set_rejects_multiline_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");

        let err = set(&path, "GROQ_API_KEY", "gsk_ab\ncd").await.unwrap_err();
        assert!(matches!(err, StepwiseError::InvalidInput { .. }));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn set_keeps_dollar_signs_in_secrets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");

        set(&path, "GROQ_API_KEY", "gsk_ab$cd").await.unwrap();

        let store = EnvStore::load(&path).unwrap().without_process_env();
        assert_eq!(store.get("GROQ_API_KEY").as_deref(), Some("gsk_ab$cd"));
    }
}
