use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use crate::domain::errors::{AnalysisError, EnhanceError};
use crate::domain::models::{EnhancedRepository, Repository, RepositoryAnalysis};
use crate::domain::ports::RepositoryAnalyzer;
use crate::services::cache_store::{analysis_cache_key, CacheStore};

/// Attaches an analysis to every repository, reusing cached analyses.
///
/// Repositories are processed concurrently and independently: one failing
/// analysis becomes a fallback for that entry only. Output order matches
/// input order.
pub struct EnhancementOrchestrator {
    cache: Arc<CacheStore>,
    analyzer: Arc<dyn RepositoryAnalyzer>,
    analysis_ttl: Duration,
}

impl EnhancementOrchestrator {
    pub fn new(
        cache: Arc<CacheStore>,
        analyzer: Arc<dyn RepositoryAnalyzer>,
        analysis_ttl: Duration,
    ) -> Self {
        Self {
            cache,
            analyzer,
            analysis_ttl,
        }
    }

    /// Enhance `repositories` with analyses.
    ///
    /// Fails before any per-repository work when `api_key` is missing or blank.
    #[instrument(skip_all, fields(count = repositories.len()))]
    pub async fn enhance(
        &self,
        repositories: Vec<Repository>,
        api_key: Option<&str>,
    ) -> Result<Vec<EnhancedRepository>, EnhanceError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(EnhanceError::MissingApiKey)?;

        let enhanced = join_all(
            repositories
                .into_iter()
                .map(|repository| self.enhance_one(repository, api_key)),
        )
        .await;

        info!(count = enhanced.len(), "enhanced repositories");
        Ok(enhanced)
    }

    async fn enhance_one(&self, repository: Repository, api_key: &str) -> EnhancedRepository {
        let analysis = match self.analysis_for(&repository, api_key).await {
            Ok(analysis) => analysis,
            Err(err) => {
                error!(
                    repository = %repository.full_name,
                    error = %err,
                    "error enhancing repository, using fallback"
                );
                RepositoryAnalysis::unavailable(&repository.name)
            }
        };

        EnhancedRepository {
            repository,
            analysis,
        }
    }

    async fn analysis_for(
        &self,
        repository: &Repository,
        api_key: &str,
    ) -> Result<RepositoryAnalysis, AnalysisError> {
        let key = analysis_cache_key(&repository.full_name, &repository.updated_at);

        if let Some(cached) = self.cache.get_analysis(&key).await {
            debug!(repository = %repository.full_name, "using cached analysis");
            return Ok(cached);
        }

        debug!(repository = %repository.full_name, "analyzing repository");
        let analysis = self.analyzer.analyze(repository, api_key).await?;
        self.cache
            .store_analysis(&key, &analysis, self.analysis_ttl)
            .await;

        Ok(analysis)
    }
}
