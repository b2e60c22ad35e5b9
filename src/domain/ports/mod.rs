//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that infrastructure adapters implement:
//! - KvStore: key-value backend with per-entry TTL
//! - ChatProvider: one chat-completion attempt against the LLM provider
//! - RepositorySource: upstream popular-repository list
//! - RepositoryAnalyzer: analysis of a single repository
//! - Clock: current UTC time
//!
//! Services depend on these traits only, which keeps them testable with
//! in-process fakes.

pub mod chat_provider;
pub mod clock;
pub mod kv_store;
pub mod repository_analyzer;
pub mod repository_source;

pub use chat_provider::{ChatMessage, ChatProvider, ChatRequest};
pub use clock::{Clock, SystemClock};
pub use kv_store::KvStore;
pub use repository_analyzer::RepositoryAnalyzer;
pub use repository_source::RepositorySource;
