use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient};
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::errors::FetchError;
use crate::domain::models::{PopularRepositoriesResponse, Repository, UpstreamConfig};
use crate::domain::ports::RepositorySource;

/// Upstream popular-repository list over HTTP.
pub struct HttpRepositorySource {
    http_client: ReqwestClient,
    url: String,
}

impl HttpRepositorySource {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl RepositorySource for HttpRepositorySource {
    async fn fetch_popular(&self) -> Result<Vec<Repository>, FetchError> {
        debug!(url = %self.url, "GET popular repositories");

        let response = self
            .http_client
            .get(&self.url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown").to_string()
            } else {
                body
            };
            warn!(status = status.as_u16(), body = %body, "popular repos API error");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: PopularRepositoriesResponse = response
            .json()
            .await
            .map_err(|err| FetchError::Decode(err.to_string()))?;

        Ok(payload.repositories)
    }
}
