use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::errors::LlmError;
use crate::domain::models::LlmConfig;
use crate::domain::ports::{ChatProvider, ChatRequest};

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat-completions client.
///
/// One `complete` call is one POST; retries are layered above it.
pub struct HttpChatProvider {
    http_client: ReqwestClient,
    endpoint: String,
}

impl HttpChatProvider {
    pub fn new(config: &LlmConfig) -> Result<Self, reqwest::Error> {
        info!(
            endpoint = %config.api_endpoint,
            model = %config.model,
            timeout_secs = config.timeout_secs,
            "initializing chat-completions client"
        );

        let http_client = ReqwestClient::builder()
            .pool_max_idle_per_host(10)
            .timeout(Duration::from_secs(config.timeout_secs))
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            http_client,
            endpoint: config.api_endpoint.clone(),
        })
    }

    async fn handle_response(response: Response) -> Result<String, LlmError> {
        let status = response.status();
        debug!(%status, "chat-completions response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown").to_string()
            } else {
                body
            };
            warn!(status = status.as_u16(), body = %body, "LLM API error");
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|err| LlmError::MalformedResponse(err.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| {
                LlmError::MalformedResponse("missing choices[0].message.content".to_string())
            })
    }
}

#[async_trait]
impl ChatProvider for HttpChatProvider {
    async fn complete(&self, request: &ChatRequest, api_key: &str) -> Result<String, LlmError> {
        debug!(endpoint = %self.endpoint, "POST chat completion");

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|err| LlmError::Transport(err.to_string()))?;

        Self::handle_response(response).await
    }
}
