use serde::{Deserialize, Serialize};

/// Category used whenever no real category could be produced.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Category and summary produced by the LLM for one repository version.
///
/// Immutable once cached: a new `updated_at` yields a new cache key rather
/// than an update to an existing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryAnalysis {
    pub category: String,
    pub summary: String,
}

impl RepositoryAnalysis {
    pub fn new(category: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            summary: summary.into(),
        }
    }

    /// Placeholder used when analysis could not be produced at all
    /// (provider unreachable, orchestration failure).
    pub fn unavailable(repository_name: &str) -> Self {
        Self::new(
            UNKNOWN_CATEGORY,
            format!("Analysis unavailable for {repository_name}. Please try again later."),
        )
    }

    /// Summary placeholder used when the provider answered but no summary
    /// could be extracted from its output.
    pub fn missing_summary(repository_name: &str) -> String {
        format!("Could not extract summary for {repository_name}")
    }
}
