//! Domain layer for the popular-repository analyzer
//!
//! Core models, error types and the port traits the services depend on.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{AnalysisError, CacheError, CatalogError, EnhanceError, FetchError, LlmError};
