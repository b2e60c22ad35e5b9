//! Implementation of the `fetch` command.
//!
//! Runs the catalog once against a fresh in-memory cache and prints it.
//! Nothing is kept after the process exits; the daily warm-up lives in
//! `serve`.

use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

use crate::cli::output::{list_table, output, truncate, CommandOutput};
use crate::domain::models::CatalogResponse;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{LogConfig, LoggerImpl};
use crate::infrastructure::setup::build_catalog;

const SUMMARY_WIDTH: usize = 80;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Number of repositories to return (defaults to default_repo_limit)
    #[arg(long, short)]
    pub limit: Option<usize>,
}

#[derive(Debug, serde::Serialize)]
#[serde(transparent)]
pub struct FetchOutput(pub CatalogResponse);

impl CommandOutput for FetchOutput {
    fn to_human(&self) -> String {
        let catalog = &self.0;
        if catalog.repositories.is_empty() {
            return "No repositories found.".to_string();
        }

        let mut table = list_table(&["repository", "stars", "category", "summary"]);
        for repo in &catalog.repositories {
            table.add_row(vec![
                repo.full_name.clone(),
                repo.stargazers_count.to_string(),
                repo.category.clone(),
                truncate(&repo.summary, SUMMARY_WIDTH),
            ]);
        }

        format!(
            "{} of {} repositories (limit {}) at {}\n{table}",
            catalog.count,
            catalog.total_available,
            catalog.limit,
            catalog.timestamp.to_rfc3339(),
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: FetchArgs, config_path: Option<&Path>, json_mode: bool) -> Result<()> {
    let config = ConfigLoader::load_from(config_path)?;
    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))?;

    let catalog = build_catalog(&config)?;
    let response = catalog
        .list(args.limit)
        .await
        .context("Failed to fetch repository catalog")?;

    output(&FetchOutput(response), json_mode);
    Ok(())
}
