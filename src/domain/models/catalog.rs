use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::repository::SimplifiedRepository;

/// Body of a successful repository listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub repositories: Vec<SimplifiedRepository>,
    pub count: usize,
    /// Size of the full popular list before the limit was applied
    pub total_available: usize,
    pub limit: usize,
    pub timestamp: DateTime<Utc>,
}
