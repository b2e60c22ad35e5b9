use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Number of repositories returned when a request names no limit
    #[serde(default = "default_repo_limit")]
    pub default_repo_limit: usize,

    /// Cache lifetimes and keys
    #[serde(default)]
    pub cache: CacheConfig,

    /// Daily refresh window for the popular-repository list
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Upstream popular-repository list endpoint
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// LLM provider configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Retry policy for LLM transport failures
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

const fn default_repo_limit() -> usize {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_repo_limit: default_repo_limit(),
            cache: CacheConfig::default(),
            refresh: RefreshConfig::default(),
            upstream: UpstreamConfig::default(),
            llm: LlmConfig::default(),
            retry: RetryConfig::default(),
            logging: LoggingConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// When false the cache adapter runs without a backend and every lookup misses
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Lifetime of a cached repository analysis, in seconds
    #[serde(default = "default_analysis_ttl_secs")]
    pub analysis_ttl_secs: u64,

    /// Lifetime of the cached popular-repository list, in seconds
    #[serde(default = "default_popular_repos_ttl_secs")]
    pub popular_repos_ttl_secs: u64,

    /// Key under which the popular-repository list is stored
    #[serde(default = "default_popular_repos_key")]
    pub popular_repos_key: String,

    /// Maximum entries held by the in-memory backend
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

const fn default_true() -> bool {
    true
}

const fn default_analysis_ttl_secs() -> u64 {
    864_000 // 10 days
}

const fn default_popular_repos_ttl_secs() -> u64 {
    86_400 // 1 day
}

fn default_popular_repos_key() -> String {
    "popular-repos".to_string()
}

const fn default_max_capacity() -> u64 {
    10_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            analysis_ttl_secs: default_analysis_ttl_secs(),
            popular_repos_ttl_secs: default_popular_repos_ttl_secs(),
            popular_repos_key: default_popular_repos_key(),
            max_capacity: default_max_capacity(),
        }
    }
}

/// Refresh window configuration (UTC)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RefreshConfig {
    /// Hour (0-23) at which the daily window opens
    #[serde(default = "default_refresh_hour")]
    pub hour: u32,

    /// Minute (0-59) within `hour` at which the window opens
    #[serde(default = "default_refresh_buffer_minutes")]
    pub buffer_minutes: u32,
}

const fn default_refresh_hour() -> u32 {
    2
}

const fn default_refresh_buffer_minutes() -> u32 {
    5
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            hour: default_refresh_hour(),
            buffer_minutes: default_refresh_buffer_minutes(),
        }
    }
}

/// Upstream list endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpstreamConfig {
    /// URL returning `{ "repositories": [...] }`
    #[serde(default = "default_upstream_url")]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_upstream_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_upstream_url() -> String {
    "https://popular.forgithub.com/index.json".to_string()
}

const fn default_upstream_timeout_secs() -> u64 {
    30
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LlmConfig {
    /// Chat-completion endpoint
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// `max_tokens` sent with every request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Input budget; longer inputs are truncated before sending
    #[serde(default = "default_max_input_tokens")]
    pub max_input_tokens: usize,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer token; also read from the `LLM_API_KEY` environment variable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_api_endpoint() -> String {
    "https://api.deepseek.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

const fn default_max_tokens() -> u32 {
    4000
}

const fn default_max_input_tokens() -> usize {
    30_000
}

const fn default_llm_timeout_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_endpoint: default_api_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            max_input_tokens: default_max_input_tokens(),
            timeout_secs: default_llm_timeout_secs(),
            api_key: None,
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Retries after the initial attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Multiplier applied per attempt
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: u32,

    /// Upper bound on any single delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_delay_ms() -> u64 {
    1000
}

const fn default_backoff_factor() -> u32 {
    2
}

const fn default_max_delay_ms() -> u64 {
    60_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            backoff_factor: default_backoff_factor(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Raise the default level to debug (cache hits/misses, refresh decisions)
    #[serde(default)]
    pub verbose: bool,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            verbose: false,
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Attach permissive CORS headers to every response
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Rebuild the catalog each day when the refresh window opens
    #[serde(default = "default_true")]
    pub warm_cache: bool,

    /// Number of repositories analyzed by the daily warm-up
    #[serde(default = "default_warm_limit")]
    pub warm_limit: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8787
}

const fn default_warm_limit() -> usize {
    500
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_true(),
            warm_cache: default_true(),
            warm_limit: default_warm_limit(),
        }
    }
}
