//! `.env` key-value store for backend settings and credentials
//!
//! Values resolve from the process environment first, then the `.env` file,
//! then the documented defaults. Edits are written back to the same file,
//! preserving comments and unrelated lines.

use crate::config::reasoning::ReasoningConfig;
use crate::error::{StepwiseError, StepwiseResult};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Recognized keys
pub mod keys {
    pub const OLLAMA_URL: &str = "OLLAMA_URL";
    pub const OLLAMA_MODEL: &str = "OLLAMA_MODEL";
    pub const PERPLEXITY_API_KEY: &str = "PERPLEXITY_API_KEY";
    pub const PERPLEXITY_MODEL: &str = "PERPLEXITY_MODEL";
    pub const GROQ_API_KEY: &str = "GROQ_API_KEY";
    pub const GROQ_MODEL: &str = "GROQ_MODEL";
    pub const MODEL: &str = "STEPWISE_MODEL";
    pub const API_KEY: &str = "STEPWISE_API_KEY";
    pub const API_BASE: &str = "STEPWISE_API_BASE";
    pub const MAX_STEPS: &str = "STEPWISE_MAX_STEPS";
    pub const MAX_TOKENS: &str = "STEPWISE_MAX_TOKENS";
    pub const TEMPERATURE: &str = "STEPWISE_TEMPERATURE";
    pub const TIMEOUT: &str = "STEPWISE_TIMEOUT";
    pub const SLEEP_TIME: &str = "STEPWISE_SLEEP_TIME";
}

/// Known keys with their fallback defaults, in display order
const DEFAULTS: &[(&str, &str)] = &[
    (keys::MODEL, "ollama/mistral"),
    (keys::API_KEY, ""),
    (keys::API_BASE, ""),
    (keys::OLLAMA_URL, "http://localhost:11434"),
    (keys::OLLAMA_MODEL, "mistral"),
    (keys::PERPLEXITY_API_KEY, ""),
    (keys::PERPLEXITY_MODEL, "mistral-7b-instruct"),
    (keys::GROQ_API_KEY, ""),
    (keys::GROQ_MODEL, "mixtral-8x7b-32768"),
    (keys::MAX_STEPS, "20"),
    (keys::MAX_TOKENS, "512"),
    (keys::TEMPERATURE, "0.2"),
    (keys::TIMEOUT, "30"),
    (keys::SLEEP_TIME, "1"),
];

/// Key-value store backed by a `.env` file
#[derive(Debug, Clone)]
pub struct EnvStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
    use_process_env: bool,
}

impl EnvStore {
    /// Load the store from `path`; a missing file yields an empty store
    pub fn load(path: impl AsRef<Path>) -> StepwiseResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut values = BTreeMap::new();

        if path.exists() {
            for item in dotenv::from_path_iter(&path)? {
                let (key, value) = item?;
                values.insert(key, value);
            }
            debug!(path = %path.display(), entries = values.len(), "loaded env store");
        } else {
            debug!(path = %path.display(), "env store not found, using defaults");
        }

        Ok(Self {
            path,
            values,
            use_process_env: true,
        })
    }

    /// Ignore the process environment when resolving values
    pub fn without_process_env(mut self) -> Self {
        self.use_process_env = false;
        self
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Documented default for a known key
    pub fn default_for(key: &str) -> Option<&'static str> {
        DEFAULTS
            .iter()
            .find(|(known, _)| *known == key)
            .map(|(_, value)| *value)
    }

    /// Known keys in display order
    pub fn known_keys() -> impl Iterator<Item = &'static str> {
        DEFAULTS.iter().map(|(key, _)| *key)
    }

    /// Whether a key holds a credential
    pub fn is_secret(key: &str) -> bool {
        key.ends_with("_API_KEY")
    }

    /// Resolve a value: process environment, then file, then default
    pub fn get(&self, key: &str) -> Option<String> {
        if self.use_process_env {
            if let Ok(value) = std::env::var(key) {
                return Some(value);
            }
        }
        self.values
            .get(key)
            .cloned()
            .or_else(|| Self::default_for(key).map(str::to_string))
    }

    /// Resolve a value, treating empty strings as unset
    pub fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key).filter(|value| !value.trim().is_empty())
    }

    /// Set a value in memory; call [`EnvStore::save`] to persist it
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Write every stored value back to the file
    ///
    /// Existing lines keep their position; a key repeated in the file keeps
    /// only its first line. The written file is reloaded before returning.
    pub fn save(&self) -> StepwiseResult<()> {
        if let Some((key, _)) = self
            .values
            .iter()
            .find(|(_, value)| value.contains(['\n', '\r']))
        {
            return Err(StepwiseError::invalid_input_field(
                "Values cannot span multiple lines",
                key.clone(),
            ));
        }

        let existing = if self.path.exists() {
            fs::read_to_string(&self.path).map_err(|e| {
                StepwiseError::io_with_path(e.to_string(), self.path.display().to_string())
            })?
        } else {
            String::new()
        };

        let mut written = BTreeSet::new();
        let mut lines: Vec<String> = Vec::new();

        for line in existing.lines() {
            match line_key(line) {
                Some(key) if written.contains(key) => {}
                Some(key) => match self.values.get(key) {
                    Some(value) => {
                        lines.push(format_entry(key, value));
                        written.insert(key.to_string());
                    }
                    None => lines.push(line.to_string()),
                },
                None => lines.push(line.to_string()),
            }
        }
        for (key, value) in &self.values {
            if !written.contains(key) {
                lines.push(format_entry(key, value));
            }
        }

        let mut contents = lines.join("\n");
        contents.push('\n');

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, contents).map_err(|e| {
            StepwiseError::io_with_path(e.to_string(), self.path.display().to_string())
        })?;
        self.verify_saved()?;
        debug!(path = %self.path.display(), "saved env store");
        Ok(())
    }

    fn verify_saved(&self) -> StepwiseResult<()> {
        let context = format!("Verifying {}", self.path.display());
        let reloaded = Self::load(&self.path)
            .map_err(|e| StepwiseError::config_with_context(e.to_string(), context.clone()))?;
        match self
            .values
            .iter()
            .find(|(key, value)| reloaded.values.get(*key) != Some(*value))
        {
            Some((key, _)) => Err(StepwiseError::config_with_context(
                format!("Saved value for {} does not read back unchanged", key),
                context,
            )),
            None => Ok(()),
        }
    }

    /// Build the session configuration from the stored tunables
    pub fn reasoning_config(&self) -> StepwiseResult<ReasoningConfig> {
        let mut config = ReasoningConfig::new();
        if let Some(max_steps) = self.parse::<u32>(keys::MAX_STEPS)? {
            config = config.with_max_steps(max_steps);
        }
        if let Some(max_tokens) = self.parse::<u32>(keys::MAX_TOKENS)? {
            config = config.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = self.parse::<f32>(keys::TEMPERATURE)? {
            config = config.with_temperature(temperature);
        }
        if let Some(timeout) = self.parse::<u64>(keys::TIMEOUT)? {
            config = config.with_timeout_secs(timeout);
        }
        if let Some(sleep) = self.parse::<f64>(keys::SLEEP_TIME)? {
            let sleep = Duration::try_from_secs_f64(sleep).map_err(|_| {
                StepwiseError::config_with_context(
                    format!("Invalid {} value", keys::SLEEP_TIME),
                    format!("Parsing sleep time '{}'", sleep),
                )
            })?;
            config = config.with_sleep_time(sleep);
        }
        config.validate()?;
        Ok(config)
    }

    fn parse<T: FromStr>(&self, key: &str) -> StepwiseResult<Option<T>> {
        match self.get_non_empty(key) {
            None => Ok(None),
            Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
                StepwiseError::config_with_context(
                    format!("Invalid {} value", key),
                    format!("Parsing value '{}' from {}", raw, self.path.display()),
                )
            }),
        }
    }
}

fn line_key(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        return None;
    }
    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    let (key, _) = trimmed.split_once('=')?;
    let key = key.trim();
    (!key.is_empty()).then_some(key)
}

fn format_entry(key: &str, value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '\\' | '$'));
    if !needs_quotes {
        format!("{}={}", key, value)
    } else if !value.contains('\'') {
        // single quotes are read literally
        format!("{}='{}'", key, value)
    } else {
        let escaped = value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('$', "\\$");
        format!("{}=\"{}\"", key, escaped)
    }
}
