// Relabel - CLI Entry Point

use std::fmt::Display;

use anyhow::{anyhow, Result};
use clap::Parser;
use serde::Serialize;

use relabel::cli::{Cli, Commands};
use relabel::commands;
use relabel::utils::init_logging;
use relabel::{AppResult, CommandResponse};

/// Print a command result as text or as a JSON envelope. Failures still
/// return an error so the process exits non-zero.
fn emit<T: Serialize + Display>(result: AppResult<T>, json: bool) -> Result<()> {
    if !json {
        println!("{}", result?);
        return Ok(());
    }

    let response = CommandResponse::from(result);
    println!("{}", serde_json::to_string_pretty(&response)?);
    match response.error {
        Some(message) => Err(anyhow!(message)),
        None => Ok(()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.resolve_config()?;

    match &cli.command {
        Commands::Run { .. } => emit(commands::run(config).await, cli.json),
        Commands::Status { .. } => emit(commands::status(&config), cli.json),
        Commands::Check { .. } => emit(commands::check(&config).await, cli.json),
    }
}
