use std::sync::Arc;
use tracing::{info, instrument};

use crate::domain::errors::CatalogError;
use crate::domain::models::{CatalogResponse, SimplifiedRepository};
use crate::domain::ports::Clock;
use crate::services::enhancement::EnhancementOrchestrator;
use crate::services::repository_fetcher::RepositoryListFetcher;

/// Produces the listing served by the HTTP endpoint and the `fetch` command.
pub struct CatalogService {
    fetcher: RepositoryListFetcher,
    orchestrator: EnhancementOrchestrator,
    default_limit: usize,
    api_key: Option<String>,
    clock: Arc<dyn Clock>,
}

impl CatalogService {
    pub fn new(
        fetcher: RepositoryListFetcher,
        orchestrator: EnhancementOrchestrator,
        default_limit: usize,
        api_key: Option<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            fetcher,
            orchestrator,
            default_limit,
            api_key,
            clock,
        }
    }

    pub const fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Fetch, trim to `limit`, enhance and simplify the popular list.
    #[instrument(skip(self))]
    pub async fn list(&self, limit: Option<usize>) -> Result<CatalogResponse, CatalogError> {
        let limit = limit.unwrap_or(self.default_limit);
        if limit == 0 {
            return Err(CatalogError::InvalidLimit);
        }

        let mut repositories = self.fetcher.fetch_list().await?;
        let total_available = repositories.len();
        repositories.truncate(limit);

        let enhanced = self
            .orchestrator
            .enhance(repositories, self.api_key.as_deref())
            .await?;

        let repositories: Vec<SimplifiedRepository> =
            enhanced.into_iter().map(SimplifiedRepository::from).collect();

        info!(
            count = repositories.len(),
            total_available, limit, "served repository catalog"
        );

        Ok(CatalogResponse {
            count: repositories.len(),
            repositories,
            total_available,
            limit,
            timestamp: self.clock.now(),
        })
    }
}
