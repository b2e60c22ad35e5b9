//! Command-line interface.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::fetch::FetchArgs;
use commands::serve::ServeArgs;

#[derive(Parser)]
#[command(name = "popular-repos-analyzer")]
#[command(about = "Popular GitHub repositories with cached LLM analysis", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this YAML file instead of config/*.yaml
    #[arg(short, long, global = true, env = "ANALYZER_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the repository catalog over HTTP
    Serve(ServeArgs),

    /// Build the catalog once and print it
    Fetch(FetchArgs),
}

/// Print `err` to stderr (as JSON in JSON mode) and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
