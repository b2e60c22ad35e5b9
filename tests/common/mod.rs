//! Common test utilities for integration tests
//!
//! In-process fakes of the port traits with call counters, plus repository
//! fixtures shared across test files.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use popular_repos_analyzer::domain::errors::{AnalysisError, CacheError, FetchError};
use popular_repos_analyzer::domain::models::{Repository, RepositoryAnalysis};
use popular_repos_analyzer::domain::ports::{
    Clock, KvStore, RepositoryAnalyzer, RepositorySource,
};

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Fixed UTC instant.
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

/// Repository fixture with the payload fields the LLM formatter reads.
pub fn repository(name: &str, updated_at: &str) -> Repository {
    let mut repo = Repository::new(name, format!("user/{name}"), updated_at);
    repo.description = Some(format!("{name} description"));
    repo.language = Some("Rust".to_string());
    repo.stargazers_count = 100;
    repo
}

/// Clock frozen at a settable instant.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Upstream list returning a fixed list, or failing, and counting calls.
pub struct StaticSource {
    repositories: Mutex<Vec<Repository>>,
    fail: bool,
    pub calls: AtomicUsize,
}

impl StaticSource {
    pub fn new(repositories: Vec<Repository>) -> Self {
        Self {
            repositories: Mutex::new(repositories),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            repositories: Mutex::new(Vec::new()),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn replace(&self, repositories: Vec<Repository>) {
        *self.repositories.lock().unwrap() = repositories;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RepositorySource for StaticSource {
    async fn fetch_popular(&self) -> Result<Vec<Repository>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(FetchError::Status {
                status: 500,
                body: "Internal Server Error".to_string(),
            });
        }
        Ok(self.repositories.lock().unwrap().clone())
    }
}

/// Analyzer returning `Fresh <name>` analyses, failing for configured names.
pub struct ScriptedAnalyzer {
    failing: Vec<String>,
    pub calls: AtomicUsize,
}

impl ScriptedAnalyzer {
    pub fn new() -> Self {
        Self {
            failing: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_for(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(ToString::to_string).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fresh(name: &str) -> RepositoryAnalysis {
        RepositoryAnalysis::new("Fresh", format!("Fresh analysis of {name}"))
    }
}

#[async_trait]
impl RepositoryAnalyzer for ScriptedAnalyzer {
    async fn analyze(
        &self,
        repository: &Repository,
        _api_key: &str,
    ) -> Result<RepositoryAnalysis, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Finish out of order so ordering bugs would show.
        if repository.name.ends_with('a') {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        if self.failing.contains(&repository.name) {
            return Err(AnalysisError::new(&repository.full_name, "analyzer exploded"));
        }
        Ok(Self::fresh(&repository.name))
    }
}

/// HashMap-backed KV store counting writes per key.
#[derive(Default)]
pub struct CountingKvStore {
    entries: Mutex<HashMap<String, String>>,
    writes: Mutex<HashMap<String, usize>>,
}

impl CountingKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes_to(&self, key: &str) -> usize {
        self.writes.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    pub fn total_writes(&self) -> usize {
        self.writes.lock().unwrap().values().sum()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl KvStore for CountingKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, value: String, _ttl: Duration) -> Result<(), CacheError> {
        self.entries.lock().unwrap().insert(key.to_string(), value);
        *self.writes.lock().unwrap().entry(key.to_string()).or_default() += 1;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

