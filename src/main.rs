mod commands;
mod domain;
mod services;
#[cfg(test)]
mod test_support;

use std::process::ExitCode;

use crate::commands::base_commands::{CliArgs, Commands};
use crate::commands::convert_cmd::convert_command;
use crate::commands::simulate_cmd::simulate_command;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    match args.command {
        Commands::Convert { input, output_dir } => {
            convert_command(&args.api, &input, &output_dir).await
        }
        Commands::Simulate { inputs, chart } => {
            simulate_command(&args.api, &inputs, chart.as_deref()).await
        }
        Commands::Completions { shell } => {
            let mut command = CliArgs::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
            ExitCode::SUCCESS
        }
    }
}
