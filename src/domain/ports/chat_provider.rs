use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::LlmError;

/// One message of a chat-completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system" or "user"
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat-completion request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
}

/// Port for the external chat-completion provider.
///
/// A call is exactly one HTTP attempt; retrying is the caller's concern.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send `request` authorised with `api_key` and return the text of the
    /// first choice.
    async fn complete(&self, request: &ChatRequest, api_key: &str) -> Result<String, LlmError>;
}
