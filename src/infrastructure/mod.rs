//! Infrastructure layer module
//!
//! Concrete adapters for the domain ports and process-level concerns:
//! - In-memory TTL key-value store (moka)
//! - Chat-completions and upstream list HTTP clients (reqwest)
//! - HTTP server (axum)
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)

pub mod config;
pub mod http;
pub mod kv;
pub mod llm;
pub mod logging;
pub mod setup;
pub mod upstream;
