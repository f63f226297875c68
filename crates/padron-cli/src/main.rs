//! Padrón CLI - terminal front end for the demographics report
//!
//! Drives a [`padron_core::QueryController`] and renders each
//! [`padron_core::View`] it produces.

mod cli;
mod commands;
mod output;
mod progress;
mod render;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<ExitCode> {
    // Initialize tracing; quiet by default so logs don't interleave with the report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Create async runtime
    let runtime = tokio::runtime::Runtime::new()?;

    // Execute the command
    let success = runtime.block_on(commands::execute(cli))?;

    Ok(if success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
