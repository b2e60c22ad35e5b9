pub mod analysis_parser;
pub mod cache_store;
pub mod cache_warmer;
pub mod catalog;
pub mod enhancement;
pub mod llm_client;
pub mod refresh_policy;
pub mod repository_fetcher;
pub mod retry_policy;

pub use analysis_parser::{AnalysisParser, ExtractionStrategy, PartialAnalysis};
pub use cache_store::{analysis_cache_key, refresh_marker_key, CacheStore};
pub use cache_warmer::CacheWarmer;
pub use catalog::CatalogService;
pub use enhancement::EnhancementOrchestrator;
pub use llm_client::LlmClient;
pub use refresh_policy::RefreshWindowPolicy;
pub use repository_fetcher::RepositoryListFetcher;
pub use retry_policy::RetryPolicy;
