//! LLM-backed repository analysis.
//!
//! Formats a repository into a bounded prompt, sends it through a
//! [`ChatProvider`] under a [`RetryPolicy`], and extracts the analysis with
//! an [`AnalysisParser`]. [`LlmClient::analyze`] absorbs every failure into
//! a fallback analysis, so an unreachable provider never fails a listing.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::domain::errors::{AnalysisError, LlmError};
use crate::domain::models::{LlmConfig, Repository, RepositoryAnalysis};
use crate::domain::ports::{ChatMessage, ChatProvider, ChatRequest, RepositoryAnalyzer};
use crate::services::analysis_parser::AnalysisParser;
use crate::services::retry_policy::RetryPolicy;

/// Approximate characters per token used for input budgeting.
pub const CHARS_PER_TOKEN: usize = 4;

/// Appended after a blank line when input was cut to fit the budget.
pub const TRUNCATION_MARKER: &str = "[Input truncated to fit token limit]";

/// System prompt sent with every analysis request.
pub const ANALYSIS_PROMPT: &str = "You are an expert software engineer reviewing GitHub repositories. \
Based on the repository information, README and file tree provided, classify the repository \
and describe it briefly.

Respond ONLY in JSON format with exactly these fields:
{\"category\": \"<one short category such as Frontend, Backend, DevOps & Automation, \
Machine Learning, Developer Tools, Mobile, Data, Security, Blockchain & Web3, Education>\", \
\"summary\": \"<two or three sentences on what the project does and who it is for>\"}";

/// Estimated token count: `ceil(chars / 4)`.
pub fn estimate_tokens(input: &str) -> usize {
    input.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Cut `input` to at most `max_tokens` estimated tokens.
///
/// Input within budget is returned unchanged. Otherwise the first
/// `max_tokens * 4` characters are kept and the truncation marker is
/// appended after a blank line.
pub fn truncate_input(input: &str, max_tokens: usize) -> String {
    if estimate_tokens(input) <= max_tokens {
        return input.to_string();
    }

    let budget = max_tokens.saturating_mul(CHARS_PER_TOKEN);
    let mut truncated: String = input.chars().take(budget).collect();
    truncated.push_str("\n\n");
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

/// Render a repository as LLM input.
pub fn format_repository(repository: &Repository) -> String {
    fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
        value.filter(|v| !v.is_empty()).unwrap_or(placeholder)
    }

    format!(
        "Repository Information:\n\
         Name: {}\n\
         Description: {}\n\
         Language: {}\n\
         Stars: {}\n\
         \n\
         README:\n\
         {}\n\
         \n\
         File Tree Structure:\n\
         {}",
        repository.full_name,
        or_placeholder(repository.description.as_deref(), "No description provided"),
        or_placeholder(repository.language.as_deref(), "Not specified"),
        repository.stargazers_count,
        or_placeholder(repository.readme.as_deref(), "No README found"),
        or_placeholder(repository.tree.as_deref(), "No file tree available"),
    )
}

/// Repository analyzer backed by a chat-completion provider.
pub struct LlmClient {
    provider: Arc<dyn ChatProvider>,
    retry_policy: RetryPolicy,
    parser: AnalysisParser,
    model: String,
    max_tokens: u32,
    max_input_tokens: usize,
}

impl LlmClient {
    pub fn new(provider: Arc<dyn ChatProvider>, config: &LlmConfig, retry_policy: RetryPolicy) -> Self {
        Self {
            provider,
            retry_policy,
            parser: AnalysisParser::default(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            max_input_tokens: config.max_input_tokens,
        }
    }

    /// Replace the default parser.
    #[must_use]
    pub fn with_parser(mut self, parser: AnalysisParser) -> Self {
        self.parser = parser;
        self
    }

    /// Request body for `input`, already truncated by the caller.
    pub fn build_request(&self, input: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage::system(ANALYSIS_PROMPT), ChatMessage::user(input)],
        }
    }

    /// Truncate `input` and send it, retrying transport failures.
    pub async fn call(&self, input: &str, api_key: &str) -> Result<String, LlmError> {
        let input = truncate_input(input, self.max_input_tokens);
        let request = self.build_request(&input);

        self.retry_policy
            .execute(|| self.provider.complete(&request, api_key))
            .await
    }

    /// Extract an analysis from raw model output.
    pub fn parse(&self, raw: &str, repository_name: &str) -> RepositoryAnalysis {
        self.parser.parse(raw, repository_name)
    }

    /// Analyze one repository; never fails.
    #[instrument(skip(self, repository, api_key), fields(repository = %repository.full_name))]
    pub async fn analyze(&self, repository: &Repository, api_key: &str) -> RepositoryAnalysis {
        let input = format_repository(repository);

        match self.call(&input, api_key).await {
            Ok(raw) => {
                debug!(response_len = raw.len(), "received LLM response");
                self.parse(&raw, &repository.name)
            }
            Err(err) => {
                error!(error = %err, "LLM analysis failed, using fallback");
                RepositoryAnalysis::unavailable(&repository.name)
            }
        }
    }
}

#[async_trait]
impl RepositoryAnalyzer for LlmClient {
    async fn analyze(
        &self,
        repository: &Repository,
        api_key: &str,
    ) -> Result<RepositoryAnalysis, AnalysisError> {
        Ok(Self::analyze(self, repository, api_key).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Provider that replays a fixed script of outcomes and records requests.
    struct ScriptedProvider {
        outcomes: Mutex<Vec<Result<String, LlmError>>>,
        requests: Mutex<Vec<ChatRequest>>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(mut outcomes: Vec<Result<String, LlmError>>) -> Self {
            outcomes.reverse();
            Self {
                outcomes: Mutex::new(outcomes),
                requests: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ChatProvider for ScriptedProvider {
        async fn complete(&self, request: &ChatRequest, _api_key: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            self.outcomes
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(LlmError::Transport("script exhausted".to_string())))
        }
    }

    fn client(provider: Arc<ScriptedProvider>, max_input_tokens: usize) -> LlmClient {
        let config = LlmConfig {
            max_input_tokens,
            ..LlmConfig::default()
        };
        LlmClient::new(provider, &config, RetryPolicy::new(3, 1, 2, 5))
    }

    fn repository() -> Repository {
        let mut repo = Repository::new("repo", "user/repo", "2023-06-15T12:00:00Z");
        repo.description = Some("A test repository".to_string());
        repo.language = Some("Rust".to_string());
        repo.stargazers_count = 100;
        repo.readme = Some("# Test Repo".to_string());
        repo.tree = Some("src/\n  main.rs".to_string());
        repo
    }

    #[test]
    fn test_truncate_exact_boundary_is_unchanged() {
        let input = "a".repeat(400);
        assert_eq!(truncate_input(&input, 100), input);
    }

    #[test]
    fn test_truncate_over_budget_appends_marker() {
        let input = "a".repeat(401);
        let truncated = truncate_input(&input, 100);

        assert!(truncated.starts_with(&"a".repeat(400)));
        assert!(truncated.ends_with("\n\n[Input truncated to fit token limit]"));
        assert!(!truncated.contains(&"a".repeat(401)));
    }

    #[test]
    fn test_truncate_is_idempotent_within_budget() {
        let once = truncate_input("short input", 100);
        assert_eq!(truncate_input(&once, 100), once);
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let input = "é".repeat(400);
        assert_eq!(truncate_input(&input, 100), input);
    }

    #[test]
    fn test_format_repository_layout() {
        let formatted = format_repository(&repository());

        assert_eq!(
            formatted,
            "Repository Information:\nName: user/repo\nDescription: A test repository\n\
             Language: Rust\nStars: 100\n\nREADME:\n# Test Repo\n\n\
             File Tree Structure:\nsrc/\n  main.rs"
        );
    }

    #[test]
    fn test_format_repository_placeholders() {
        let mut repo = Repository::new("bare", "user/bare", "2023-06-15T12:00:00Z");
        repo.description = Some(String::new());

        let formatted = format_repository(&repo);

        assert!(formatted.contains("Description: No description provided"));
        assert!(formatted.contains("Language: Not specified"));
        assert!(formatted.contains("Stars: 0"));
        assert!(formatted.contains("README:\nNo README found"));
        assert!(formatted.contains("File Tree Structure:\nNo file tree available"));
    }

    #[test]
    fn test_prompt_asks_for_json_fields() {
        assert!(ANALYSIS_PROMPT.contains("JSON format"));
        assert!(ANALYSIS_PROMPT.contains("category"));
        assert!(ANALYSIS_PROMPT.contains("summary"));
    }

    #[tokio::test]
    async fn test_call_sends_truncated_input_with_system_prompt() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("ok".to_string())]));
        let client = client(Arc::clone(&provider), 10);

        let result = client.call(&"x".repeat(100), "test-key").await.unwrap();
        assert_eq!(result, "ok");

        let requests = provider.requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.model, "deepseek-chat");
        assert_eq!(request.max_tokens, 4000);
        assert_eq!(request.messages[0], ChatMessage::system(ANALYSIS_PROMPT));
        assert_eq!(request.messages[1].role, "user");
        assert!(request.messages[1].content.contains(TRUNCATION_MARKER));
    }

    #[tokio::test]
    async fn test_analyze_parses_provider_output() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(
            r#"{"category":"Backend","summary":"An HTTP server"}"#.to_string(),
        )]));
        let client = client(provider, 30_000);

        let analysis = client.analyze(&repository(), "test-key").await;

        assert_eq!(analysis, RepositoryAnalysis::new("Backend", "An HTTP server"));
    }

    #[tokio::test]
    async fn test_analyze_absorbs_status_error_without_retry() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(LlmError::Status {
            status: 400,
            body: "Bad Request".to_string(),
        })]));
        let client = client(Arc::clone(&provider), 30_000);

        let analysis = client.analyze(&repository(), "test-key").await;

        assert_eq!(analysis, RepositoryAnalysis::unavailable("repo"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_analyze_absorbs_exhausted_retries() {
        let provider = Arc::new(ScriptedProvider::new(Vec::new()));
        let client = client(Arc::clone(&provider), 30_000);

        let analysis = client.analyze(&repository(), "test-key").await;

        assert_eq!(analysis.category, "Unknown");
        assert_eq!(
            analysis.summary,
            "Analysis unavailable for repo. Please try again later."
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
    }
}
