//! Upstream popular-repository list adapters.

mod popular_repos_client;

pub use popular_repos_client::HttpRepositorySource;
