//! Daily cache warm-up.
//!
//! Sleeps until the refresh window opens, then builds the catalog once so the
//! forced list refresh and the LLM analyses happen before the first client
//! request of the day. Failures are logged and the next day is tried again.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::domain::errors::CatalogError;
use crate::domain::ports::Clock;
use crate::services::catalog::CatalogService;
use crate::services::refresh_policy::RefreshWindowPolicy;

pub struct CacheWarmer {
    catalog: Arc<CatalogService>,
    policy: RefreshWindowPolicy,
    clock: Arc<dyn Clock>,
    limit: usize,
}

impl CacheWarmer {
    pub fn new(
        catalog: Arc<CatalogService>,
        policy: RefreshWindowPolicy,
        clock: Arc<dyn Clock>,
        limit: usize,
    ) -> Self {
        Self {
            catalog,
            policy,
            clock,
            limit,
        }
    }

    /// Time left until the next window opening.
    pub fn delay_until_next_window(&self) -> Duration {
        let now = self.clock.now();
        (self.policy.next_opening(now) - now)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Build the catalog once, returning how many repositories were analyzed.
    pub async fn warm(&self) -> Result<usize, CatalogError> {
        let response = self.catalog.list(Some(self.limit)).await?;
        info!(
            count = response.count,
            total_available = response.total_available,
            "cache warmed"
        );
        Ok(response.count)
    }

    /// Warm the cache at every window opening until the task is aborted.
    pub async fn run(self) {
        loop {
            let delay = self.delay_until_next_window();
            info!(delay_secs = delay.as_secs(), "next cache warm-up scheduled");
            tokio::time::sleep(delay).await;

            if let Err(err) = self.warm().await {
                error!(error = %err, "cache warm-up failed");
            }
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
