//! `sieve`: compile filter params JSON into driver query documents.
//!
//! Usage:
//!   sieve compile request.json --options --diagnostics
//!   echo '{"query": {...}}' | sieve check

mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::commands::{CheckArgs, CompileArgs};
use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "sieve", version)]
#[command(about = "Compile search/filter params into query documents")]
struct Cli {
    /// Configuration file (defaults to ./sieve.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile params into a filter document
    Compile(CompileArgs),
    /// Validate that params yield at least one clause
    Check(CheckArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.validate().map_err(anyhow::Error::msg)?;

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    tracing::debug!(
        version = %config.compile.version,
        required = config.compile.required,
        "Configuration loaded"
    );

    let output = match &cli.command {
        Command::Compile(args) => commands::run_compile(args, &config)?,
        Command::Check(args) => commands::run_check(args, &config)?,
    };
    println!("{output}");

    Ok(())
}
