//! Layered analyzer configuration.
//!
//! Defaults, then `config/analyzer.yaml` and `config/local.yaml`, then
//! `ANALYZER_*` environment overrides and `LLM_API_KEY`, merged with figment
//! and validated before use.

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
