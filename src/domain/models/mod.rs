pub mod analysis;
pub mod catalog;
pub mod config;
pub mod repository;

pub use analysis::{RepositoryAnalysis, UNKNOWN_CATEGORY};
pub use catalog::CatalogResponse;
pub use config::{
    CacheConfig, Config, LlmConfig, LoggingConfig, RefreshConfig, RetryConfig, ServerConfig,
    UpstreamConfig,
};
pub use repository::{
    normalize_topics, EnhancedRepository, License, Owner, PopularRepositoriesResponse,
    Repository, SimplifiedLicense, SimplifiedOwner, SimplifiedRepository,
};
