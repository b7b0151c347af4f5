//! Service facade consumed by page renderers.

mod builder;

pub use builder::{Vitrine, VitrineBuilder};

use std::sync::Arc;

use crate::cache::CacheStore;
use crate::stats::{FetchOutcome, StatsPipeline};
use crate::types::{GitHubStats, LeetCodeStats};

/// The two stats entry points plus the cache they share.
///
/// Both entry points are total: they always resolve to a usable record
/// (live, cached, or the static fallback) and never return an error.
pub struct StatsService {
    cache: Arc<CacheStore>,
    github: StatsPipeline<GitHubStats>,
    leetcode: StatsPipeline<LeetCodeStats>,
}

impl StatsService {
    pub(crate) fn new(
        cache: Arc<CacheStore>,
        github: StatsPipeline<GitHubStats>,
        leetcode: StatsPipeline<LeetCodeStats>,
    ) -> Self {
        Self {
            cache,
            github,
            leetcode,
        }
    }

    /// GitHub summary for `username`.
    pub async fn github_stats(&self, username: &str) -> GitHubStats {
        self.github.fetch(username).await
    }

    /// LeetCode summary for `username`.
    pub async fn leetcode_stats(&self, username: &str) -> LeetCodeStats {
        self.leetcode.fetch(username).await
    }

    /// Like [`github_stats()`](Self::github_stats), also reporting the origin.
    pub async fn github_outcome(&self, username: &str) -> FetchOutcome<GitHubStats> {
        self.github.fetch_outcome(username).await
    }

    /// Like [`leetcode_stats()`](Self::leetcode_stats), also reporting the origin.
    pub async fn leetcode_outcome(&self, username: &str) -> FetchOutcome<LeetCodeStats> {
        self.leetcode.fetch_outcome(username).await
    }

    /// The shared cache (for explicit eviction).
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn github_pipeline(&self) -> &StatsPipeline<GitHubStats> {
        &self.github
    }

    pub fn leetcode_pipeline(&self) -> &StatsPipeline<LeetCodeStats> {
        &self.leetcode
    }
}
