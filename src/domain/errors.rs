//! Domain errors for the analysis pipeline.

use thiserror::Error;

/// Failures of the key-value backend.
///
/// These never escape [`crate::services::CacheStore`]; they are logged there
/// and collapsed into a miss or a no-op.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures of a single chat-completion attempt.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provider answered with a non-success status. Not retried.
    #[error("LLM API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a response (connect, timeout, reset).
    #[error("LLM transport error: {0}")]
    Transport(String),

    /// A success status whose body lacks `choices[0].message.content`.
    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),
}

impl LlmError {
    /// Returns true if this error is transient and should be retried
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Failures fetching the upstream popular-repository list.
///
/// Unlike analysis failures these abort the whole request.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch popular repositories: Popular repos API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to fetch popular repositories: {0}")]
    Transport(String),

    #[error("Failed to fetch popular repositories: invalid response body: {0}")]
    Decode(String),
}

/// A repository analyzer failed outright instead of degrading to a fallback.
#[derive(Debug, Error)]
#[error("Analysis failed for {repository}: {reason}")]
pub struct AnalysisError {
    pub repository: String,
    pub reason: String,
}

impl AnalysisError {
    pub fn new(repository: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            repository: repository.into(),
            reason: reason.to_string(),
        }
    }
}

/// Failures that abort a batch enhancement before any per-repository work.
#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("LLM API key is not configured. Set LLM_API_KEY or llm.api_key in the configuration.")]
    MissingApiKey,
}

/// Failures of a full catalog request.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid limit parameter. Must be a positive number.")]
    InvalidLimit,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Enhance(#[from] EnhanceError),
}

impl CatalogError {
    /// Returns true if the caller supplied bad input (as opposed to an
    /// upstream or configuration failure)
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidLimit)
    }
}
