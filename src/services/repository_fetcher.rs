use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::domain::errors::FetchError;
use crate::domain::models::{CacheConfig, Repository};
use crate::domain::ports::{Clock, RepositorySource};
use crate::services::cache_store::CacheStore;
use crate::services::refresh_policy::RefreshWindowPolicy;

/// Cache-first access to the popular-repository list.
///
/// A cached list is trusted unless the refresh window says a forced refresh
/// is due. Upstream failures propagate: without the list there is nothing to
/// serve.
pub struct RepositoryListFetcher {
    cache: Arc<CacheStore>,
    source: Arc<dyn RepositorySource>,
    policy: RefreshWindowPolicy,
    clock: Arc<dyn Clock>,
    list_key: String,
    list_ttl: Duration,
}

impl RepositoryListFetcher {
    pub fn new(
        cache: Arc<CacheStore>,
        source: Arc<dyn RepositorySource>,
        policy: RefreshWindowPolicy,
        clock: Arc<dyn Clock>,
        config: &CacheConfig,
    ) -> Self {
        Self {
            cache,
            source,
            policy,
            clock,
            list_key: config.popular_repos_key.clone(),
            list_ttl: Duration::from_secs(config.popular_repos_ttl_secs),
        }
    }

    #[instrument(skip(self), fields(key = %self.list_key))]
    pub async fn fetch_list(&self) -> Result<Vec<Repository>, FetchError> {
        let now = self.clock.now();
        let last_refresh = self.cache.last_refresh(&self.list_key).await;
        let force_refresh = self.policy.should_force_refresh(now, last_refresh.as_deref());

        if force_refresh {
            info!(
                last_refresh = last_refresh.as_deref().unwrap_or("never"),
                "refresh window open, bypassing cached popular repositories"
            );
        } else if let Some(cached) = self.cache.get_popular_repos(&self.list_key).await {
            debug!(count = cached.len(), "using cached popular repositories");
            return Ok(cached);
        }

        let repositories = self.source.fetch_popular().await?;
        info!(count = repositories.len(), "fetched popular repositories from upstream");

        self.cache
            .store_popular_repos(&self.list_key, &repositories, self.list_ttl, self.clock.now())
            .await;

        Ok(repositories)
    }
}
