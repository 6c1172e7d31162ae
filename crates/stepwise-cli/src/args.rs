//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use stepwise_core::BackendKind;

/// Default `.env` store used across all CLI commands.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Default directory for session log files.
pub const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Parser)]
#[command(name = "stepwise")]
#[command(about = "Stepwise - chain-of-thought reasoning over pluggable LLM backends")]
#[command(
    long_about = r#"Stepwise - chain-of-thought reasoning over pluggable LLM backends

USAGE:
  stepwise ask "your question"                 # Reason with the default router model
  stepwise ask --backend groq "your question"  # Use a specific backend
  stepwise config show                         # Show settings (keys masked)
  stepwise config set GROQ_API_KEY gsk-...     # Persist a setting to .env"#
)]
#[command(version)]
pub struct Cli {
    /// Path to the `.env` store with backend settings and credentials
    #[arg(long, global = true, default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Directory for the session log file
    #[arg(long, global = true, default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,

    /// Do not write a log file
    #[arg(long, global = true)]
    pub no_log_file: bool,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a reasoning session for a single query
    Ask(AskArgs),

    /// Inspect or edit the `.env` store
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Clone, Debug)]
pub struct AskArgs {
    /// The question to reason about
    pub query: String,

    /// Backend to use: router, ollama, perplexity or groq
    #[arg(long, short, default_value = "router")]
    pub backend: BackendKind,

    /// Model override (`provider/model` for the router backend)
    #[arg(long, short)]
    pub model: Option<String>,

    /// API key override
    #[arg(long)]
    pub api_key: Option<String>,

    /// API base URL override
    #[arg(long)]
    pub api_base: Option<String>,

    /// Maximum number of reasoning steps (1-20)
    #[arg(long)]
    pub max_steps: Option<u32>,

    /// Token budget for each reasoning step
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Token budget for the final answer
    #[arg(long)]
    pub final_answer_tokens: Option<u32>,

    /// Sampling temperature (0-2)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Pause before each step call, in seconds
    #[arg(long)]
    pub sleep_time: Option<f64>,

    /// Read the reasoning instructions from a file instead of the built-in prompt
    #[arg(long)]
    pub system_prompt: Option<PathBuf>,
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Display current settings with credentials masked
    Show,

    /// Persist a setting to the `.env` store
    Set {
        /// Setting name, e.g. OLLAMA_MODEL
        key: String,
        /// New value
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_defaults_to_router() {
        let cli = Cli::try_parse_from(["stepwise", "ask", "How many 'R's are in strawberry?"])
            .unwrap();
        let Commands::Ask(args) = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(args.backend, BackendKind::Router);
        assert_eq!(args.query, "How many 'R's are in strawberry?");
        assert_eq!(cli.env_file, PathBuf::from(DEFAULT_ENV_FILE));
    }

    #[test]
    fn ask_accepts_backend_and_tunables() {
        let cli = Cli::try_parse_from([
            "stepwise",
            "--no-log-file",
            "ask",
            "--backend",
            "groq",
            "--max-steps",
            "5",
            "--temperature",
            "0.7",
            "--system-prompt",
            "prompts/sys.txt",
            "q",
        ])
        .unwrap();
        assert!(cli.no_log_file);
        let Commands::Ask(args) = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(args.backend, BackendKind::Groq);
        assert_eq!(args.max_steps, Some(5));
        assert_eq!(args.system_prompt, Some(PathBuf::from("prompts/sys.txt")));
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["stepwise", "ask", "--backend", "acme", "q"]).is_err());
    }

    #[test]
    fn config_set_takes_key_and_value() {
        let cli = Cli::try_parse_from(["stepwise", "config", "set", "OLLAMA_MODEL", "llama3.1"])
            .unwrap();
        match cli.command {
            Commands::Config {
                action: ConfigAction::Set { key, value },
            } => {
                assert_eq!(key, "OLLAMA_MODEL");
                assert_eq!(value, "llama3.1");
            }
            _ => panic!("expected config set"),
        }
    }
}
