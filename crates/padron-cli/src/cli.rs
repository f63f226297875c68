use clap::{Parser, Subcommand};
use padron_core::format::NumberLocale;
use std::path::PathBuf;

/// Padrón - municipal demographics lookup
#[derive(Parser, Debug)]
#[command(name = "padron")]
#[command(about = "Population totals, national/foreign split and top nationalities by municipality", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./padron.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Demographics service endpoint URL
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Show only the first N nationalities of the ranking
    #[arg(long, global = true, value_name = "N")]
    pub top: Option<usize>,

    /// Number formatting locale (en or es)
    #[arg(long, global = true)]
    pub locale: Option<NumberLocale>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up one municipality and print its report
    Search(SearchArgs),

    /// Read municipality names from stdin, one search per line
    Interactive,

    /// Show the effective configuration and where each value comes from
    Config,
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Municipality name; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub municipality: Vec<String>,
}
