//! Wiring of the production service graph from a loaded [`Config`].

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::domain::models::Config;
use crate::domain::ports::{Clock, SystemClock};
use crate::infrastructure::kv::MemoryKvStore;
use crate::infrastructure::llm::HttpChatProvider;
use crate::infrastructure::upstream::HttpRepositorySource;
use crate::services::{
    CacheStore, CatalogService, EnhancementOrchestrator, LlmClient, RefreshWindowPolicy,
    RepositoryListFetcher, RetryPolicy,
};

/// Build the cache adapter, with no backend when caching is disabled.
pub fn build_cache(config: &Config) -> CacheStore {
    if config.cache.enabled {
        CacheStore::new(Arc::new(MemoryKvStore::new(config.cache.max_capacity)))
    } else {
        warn!("cache disabled, every lookup will miss");
        CacheStore::disabled()
    }
}

/// Build the catalog service backed by HTTP adapters and the in-memory cache.
pub fn build_catalog(config: &Config) -> Result<CatalogService> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let cache = Arc::new(build_cache(config));

    let source = HttpRepositorySource::new(&config.upstream)
        .context("Failed to build upstream HTTP client")?;
    let provider =
        HttpChatProvider::new(&config.llm).context("Failed to build LLM HTTP client")?;

    let llm_client = LlmClient::new(
        Arc::new(provider),
        &config.llm,
        RetryPolicy::from(&config.retry),
    );

    let fetcher = RepositoryListFetcher::new(
        Arc::clone(&cache),
        Arc::new(source),
        RefreshWindowPolicy::from(config.refresh),
        Arc::clone(&clock),
        &config.cache,
    );
    let orchestrator = EnhancementOrchestrator::new(
        cache,
        Arc::new(llm_client),
        Duration::from_secs(config.cache.analysis_ttl_secs),
    );

    if config.llm.api_key.is_none() {
        warn!("no LLM API key configured, listing requests will fail until LLM_API_KEY is set");
    }

    info!(
        upstream = %config.upstream.url,
        llm_endpoint = %config.llm.api_endpoint,
        cache_enabled = config.cache.enabled,
        "catalog service ready"
    );

    Ok(CatalogService::new(
        fetcher,
        orchestrator,
        config.default_repo_limit,
        config.llm.api_key.clone(),
        clock,
    ))
}
