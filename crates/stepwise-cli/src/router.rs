//! Command routing logic for CLI

use crate::args::{Cli, Commands, ConfigAction};
use crate::commands;
use stepwise_core::StepwiseResult;

/// Route CLI commands to their respective handlers
pub async fn route(cli: &Cli) -> StepwiseResult<()> {
    match &cli.command {
        Commands::Ask(args) => commands::ask::execute(args, &cli.env_file, cli.verbose).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&cli.env_file).await,
            ConfigAction::Set { key, value } => {
                commands::config::set(&cli.env_file, key, value).await
            }
        },
    }
}
