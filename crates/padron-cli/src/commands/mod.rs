//! Command implementations

mod config;
mod interactive;
mod search;

use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use padron_client::HttpDemographicsSource;
use padron_core::config::{CliConfigOverrides, LayeredConfig};
use padron_core::QueryController;

/// Config file picked up from the working directory when `--config` is absent
const DEFAULT_CONFIG_FILE: &str = "padron.toml";

/// Execute a CLI command. Returns `false` when the command should exit non-zero.
pub async fn execute(cli: Cli) -> Result<bool> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Search(args) => search::execute(args, &output, &config).await,
        Commands::Interactive => interactive::execute(&output, &config).await,
        Commands::Config => config::execute(&output, &config),
    }
}

/// Defaults, then the config file, then `PADRON_*` variables, then flags
fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    let file = cli.config.clone().or_else(|| {
        let path = PathBuf::from(DEFAULT_CONFIG_FILE);
        path.exists().then_some(path)
    });
    if let Some(path) = file {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config
        .update_from_cli(CliConfigOverrides {
            endpoint: cli.endpoint.clone(),
            timeout_secs: cli.timeout,
            top_nationalities: cli.top,
            locale: cli.locale,
        })
        .context("Invalid command-line option")?;

    tracing::debug!(endpoint = %config.endpoint.value, timeout_secs = config.timeout_secs.value, "Configuration loaded");

    Ok(config)
}

/// Controller talking to the configured endpoint
fn build_controller(config: &LayeredConfig) -> Result<QueryController> {
    let source = HttpDemographicsSource::new(&config.endpoint.value)
        .context("Failed to configure the demographics endpoint")?;

    Ok(QueryController::new(Arc::new(source)).with_timeout(config.timeout()))
}
