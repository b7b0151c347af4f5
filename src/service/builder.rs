//! Builder for configuring service instances

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::StatsService;
use crate::cache::{CacheStore, FileStorage, MemoryStorage, Storage};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::stats::github::DEFAULT_BASE_URL;
use crate::stats::{
    DEFAULT_TIMEOUT, DEFAULT_TTL, EndpointConfig, GitHubRestSource, JsonFetcher, LeetCodeSource,
    StatsPipeline,
};
use crate::{Result, VitrineError};

const SECS_PER_HOUR: u64 = 60 * 60;

/// Main entry point for creating service instances.
pub struct Vitrine;

impl Vitrine {
    /// Create a new builder for configuring the service.
    pub fn builder() -> VitrineBuilder {
        VitrineBuilder::new()
    }
}

/// Builder for configuring service instances.
///
/// ```rust,no_run
/// # use vitrine::Vitrine;
/// # use std::time::Duration;
/// # async fn run() -> vitrine::Result<()> {
/// let service = Vitrine::builder()
///     .store_path("/tmp/vitrine/store.json")
///     .github_timeout(Duration::from_secs(5))
///     .build()?;
///
/// let stats = service.github_stats("octocat").await;
/// println!("{} repos", stats.total_repos);
/// # Ok(())
/// # }
/// ```
pub struct VitrineBuilder {
    storage: Option<Arc<dyn Storage>>,
    store_path: Option<PathBuf>,
    clock: Option<Arc<dyn Clock>>,
    ttl: Duration,
    user_agent: Option<String>,
    github_base_url: String,
    github_timeout: Duration,
    recent_repos: usize,
    leetcode_endpoints: Vec<EndpointConfig>,
}

impl Default for VitrineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VitrineBuilder {
    pub fn new() -> Self {
        Self {
            storage: None,
            store_path: None,
            clock: None,
            ttl: DEFAULT_TTL,
            user_agent: None,
            github_base_url: DEFAULT_BASE_URL.to_string(),
            github_timeout: DEFAULT_TIMEOUT,
            recent_repos: crate::stats::github::DEFAULT_RECENT_REPOS,
            leetcode_endpoints: EndpointConfig::defaults(),
        }
    }

    /// Seed a builder from a loaded [`Config`].
    pub fn from_config(config: &Config) -> Self {
        let mut builder = Self::new()
            .ttl(Duration::from_secs(
                config.cache.ttl_hours.saturating_mul(SECS_PER_HOUR),
            ))
            .github_base_url(&config.github.base_url)
            .github_timeout(Duration::from_secs(config.github.timeout_secs))
            .recent_repos(config.github.recent_repos)
            .leetcode_endpoints(config.leetcode.endpoints.clone());
        if let Some(ref path) = config.cache.path {
            builder = builder.store_path(path);
        }
        builder
    }

    /// Use an explicit storage backend (overrides `store_path`).
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Keep the cache in memory only.
    pub fn in_memory(self) -> Self {
        self.storage(Arc::new(MemoryStorage::new()))
    }

    /// Location of the file store (default: `~/.cache/vitrine/store.json`).
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// Clock for cache timestamps and streak derivation.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// TTL for fetched records (default 24 hours).
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// `User-Agent` sent upstream (default `vitrine/<version>`).
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// GitHub API base URL (for testing with wiremock or GitHub Enterprise).
    pub fn github_base_url(mut self, url: impl Into<String>) -> Self {
        self.github_base_url = url.into();
        self
    }

    /// Per-request timeout for GitHub calls.
    pub fn github_timeout(mut self, timeout: Duration) -> Self {
        self.github_timeout = timeout;
        self
    }

    /// Number of recent repositories to include.
    pub fn recent_repos(mut self, n: usize) -> Self {
        self.recent_repos = n;
        self
    }

    /// Replace the LeetCode candidate list (priority order).
    pub fn leetcode_endpoints(mut self, endpoints: Vec<EndpointConfig>) -> Self {
        self.leetcode_endpoints = endpoints;
        self
    }

    /// Build the service.
    ///
    /// Fails on a zero TTL, a zero timeout, an empty LeetCode candidate
    /// list, or an endpoint without a URL.
    pub fn build(self) -> Result<StatsService> {
        if self.ttl.is_zero() {
            return Err(VitrineError::Configuration(
                "cache TTL must be non-zero".to_string(),
            ));
        }
        if self.github_timeout.is_zero() {
            return Err(VitrineError::Configuration(
                "GitHub timeout must be non-zero".to_string(),
            ));
        }
        if self.leetcode_endpoints.is_empty() {
            return Err(VitrineError::NoCandidate);
        }
        if let Some(ep) = self.leetcode_endpoints.iter().find(|ep| ep.url.trim().is_empty()) {
            return Err(VitrineError::Configuration(format!(
                "endpoint '{}' has no URL",
                ep.name
            )));
        }
        if let Some(ep) = self.leetcode_endpoints.iter().find(|ep| ep.timeout_secs == 0) {
            return Err(VitrineError::Configuration(format!(
                "endpoint '{}' has a zero timeout",
                ep.name
            )));
        }

        let clock: Arc<dyn Clock> = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let storage: Arc<dyn Storage> = match (self.storage, self.store_path) {
            (Some(storage), _) => storage,
            (None, Some(path)) => Arc::new(FileStorage::new(path)),
            (None, None) => Arc::new(FileStorage::at_default_path()),
        };
        let cache = Arc::new(CacheStore::with_clock(storage, clock.clone()));

        let user_agent = self.user_agent.unwrap_or_else(crate::version::user_agent);
        let fetcher = JsonFetcher::new(&user_agent)?;

        let github = StatsPipeline::new(cache.clone())
            .with_ttl(self.ttl)
            .with_source(Arc::new(
                GitHubRestSource::with_base_url(fetcher.clone(), self.github_base_url)
                    .timeout(self.github_timeout)
                    .recent_repos(self.recent_repos),
            ));

        let mut leetcode = StatsPipeline::new(cache.clone()).with_ttl(self.ttl);
        for endpoint in self.leetcode_endpoints {
            leetcode.add_source(Arc::new(LeetCodeSource::new(
                endpoint,
                fetcher.clone(),
                clock.clone(),
            )));
        }

        Ok(StatsService::new(cache, github, leetcode))
    }
}
