//! Reasoning session command

use crate::args::AskArgs;
use crate::backend::{self, BackendOverrides};
use crate::console::CLIConsole;
use crate::render::TranscriptRenderer;
use futures::StreamExt;
use std::path::Path;
use std::time::Duration;
use stepwise_core::{
    EnvStore, ReasoningConfig, StepwiseError, StepwiseResult, SystemPrompt, generate_response,
};

/// Apply command-line tunables on top of the stored ones
pub fn reasoning_config(store: &EnvStore, args: &AskArgs) -> StepwiseResult<ReasoningConfig> {
    let mut config = store.reasoning_config()?;
    if let Some(max_steps) = args.max_steps {
        config.max_steps = max_steps;
    }
    if let Some(max_tokens) = args.max_tokens {
        config = config.with_max_tokens(max_tokens);
    }
    if let Some(tokens) = args.final_answer_tokens {
        config = config.with_final_answer_tokens(tokens);
    }
    if let Some(temperature) = args.temperature {
        config = config.with_temperature(temperature);
    }
    if let Some(timeout) = args.timeout {
        config = config.with_timeout_secs(timeout);
    }
    if let Some(sleep_time) = args.sleep_time {
        let sleep_time = Duration::try_from_secs_f64(sleep_time).map_err(|_| {
            StepwiseError::invalid_input_field(
                "sleep time must be a non-negative number of seconds",
                "sleep_time",
            )
        })?;
        config = config.with_sleep_time(sleep_time);
    }
    if let Some(path) = &args.system_prompt {
        config = config.with_system_prompt(SystemPrompt::File(path.clone()));
    }
    config.validate()?;
    Ok(config)
}

/// Run one reasoning session and print the transcript as it grows
pub async fn execute(args: &AskArgs, env_file: &Path, verbose: bool) -> StepwiseResult<()> {
    let mut console = CLIConsole::new(verbose);
    let store = EnvStore::load(env_file)?;
    let config = reasoning_config(&store, args)?;

    let overrides = BackendOverrides {
        model: args.model.clone(),
        api_key: args.api_key.clone(),
        api_base: args.api_base.clone(),
    };
    let selection = backend::resolve(args.backend, &store, &overrides);
    let handler = backend::build_handler(args.backend, &store, &overrides)?;

    console.info(&format!(
        "Backend: {} ({}), max steps: {}",
        selection.kind, selection.model, config.max_steps
    ));
    tracing::info!(
        query = %args.query,
        backend = %handler.backend().kind(),
        model = %selection.model,
        max_attempts = handler.policy().max_attempts,
        "received query"
    );

    let stream = generate_response(&args.query, &handler, config)?;
    let mut stream = Box::pin(stream);
    let mut renderer = TranscriptRenderer::new();
    let mut stdout = std::io::stdout();

    console.start_progress("Generating response...");
    while let Some(update) = stream.next().await {
        console.suspend(|| renderer.render(&update, &mut stdout))?;
        if let Some(total) = update.total_elapsed {
            tracing::info!(total_secs = total.as_secs_f64(), "final answer generated");
        } else {
            console.update_progress(&format!("Thinking... ({} steps so far)", renderer.printed()));
        }
    }
    console.finish_progress();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{Cli, Commands};
    use clap::Parser;

    fn ask_args(extra: &[&str]) -> AskArgs {
        let mut argv = vec!["stepwise", "ask"];
        argv.extend_from_slice(extra);
        argv.push("q");
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Ask(args) => args,
            _ => unreachable!(),
        }
    }

    fn empty_store() -> (tempfile::TempDir, EnvStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = EnvStore::load(dir.path().join(".env"))
            .unwrap()
            .without_process_env();
        (dir, store)
    }

    #[test]
    fn flags_override_stored_tunables() {
        let (_dir, store) = empty_store();
        let args = ask_args(&["--max-steps", "4", "--sleep-time", "0"]);
        let config = reasoning_config(&store, &args).unwrap();
        assert_eq!(config.max_steps, 4);
        assert_eq!(config.sleep_time(), Duration::ZERO);
        assert_eq!(config.max_tokens, 512);
    }

    #[test]
    fn out_of_range_steps_are_rejected() {
        let (_dir, store) = empty_store();
        assert!(reasoning_config(&store, &ask_args(&["--max-steps", "25"])).is_err());
        assert!(reasoning_config(&store, &ask_args(&["--temperature", "3"])).is_err());
    }

    #[test]
    fn system_prompt_flag_selects_file_source() {
        let (_dir, store) = empty_store();
        let config = reasoning_config(&store, &ask_args(&["--system-prompt", "sys.txt"])).unwrap();
        assert_eq!(config.system_prompt, SystemPrompt::File("sys.txt".into()));
    }
}
