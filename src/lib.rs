//! Popular Repos Analyzer
//!
//! Serves the list of popular GitHub repositories, each enriched with an
//! LLM-produced category and summary. Upstream and LLM calls are kept to a
//! minimum by a time-windowed list cache and a per-version analysis cache.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and port traits
//! - **Service Layer** (`services`): cache policy, LLM analysis, enhancement
//! - **Infrastructure Layer** (`infrastructure`): HTTP clients, KV store,
//!   HTTP server, configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use popular_repos_analyzer::infrastructure::{config::ConfigLoader, setup::build_catalog};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let catalog = build_catalog(&config)?;
//!     let response = catalog.list(Some(10)).await?;
//!     println!("{}", serde_json::to_string_pretty(&response)?);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    CatalogResponse, Config, EnhancedRepository, Repository, RepositoryAnalysis,
    SimplifiedRepository,
};
pub use domain::{AnalysisError, CacheError, CatalogError, EnhanceError, FetchError, LlmError};
pub use infrastructure::config::ConfigLoader;
pub use services::{CacheStore, CatalogService, EnhancementOrchestrator, LlmClient};
