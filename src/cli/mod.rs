//! Command line interface for the release pipeline.
//!
//! Argument parsing, command dispatch and user feedback.

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command, RuntimeConfig};
pub use output::OutputManager;

use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute(&args).await
}

/// Execute parsed arguments and return the process exit code
pub async fn execute(args: &Args) -> Result<i32> {
    let config = RuntimeConfig::from(args);

    match args.command() {
        Command::Help => commands::execute_help(&config),
        Command::Clean => commands::execute_clean(args, &config).await,
        command => match command.stage() {
            Some(stage) => commands::execute_stage(args, stage, &config).await,
            None => commands::execute_help(&config),
        },
    }
}
