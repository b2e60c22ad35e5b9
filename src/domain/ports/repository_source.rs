use async_trait::async_trait;

use crate::domain::errors::FetchError;
use crate::domain::models::Repository;

/// Port for the upstream popular-repository list.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    async fn fetch_popular(&self) -> Result<Vec<Repository>, FetchError>;
}
