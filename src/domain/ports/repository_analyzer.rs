use async_trait::async_trait;

use crate::domain::errors::AnalysisError;
use crate::domain::models::{Repository, RepositoryAnalysis};

/// Port producing an analysis for one repository.
///
/// The LLM-backed implementation absorbs provider failures into a fallback
/// analysis and always returns `Ok`; an `Err` here signals a failure the
/// analyzer itself could not degrade, which the enhancement orchestrator
/// turns into a per-repository fallback.
#[async_trait]
pub trait RepositoryAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        repository: &Repository,
        api_key: &str,
    ) -> Result<RepositoryAnalysis, AnalysisError>;
}
