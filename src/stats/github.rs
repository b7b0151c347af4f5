//! GitHub REST source.
//!
//! Two unauthenticated requests per fetch:
//!
//! - `GET {base}/users/{user}`: profile counters
//! - `GET {base}/users/{user}/repos?sort=updated&per_page={n}`: recent repos
//!
//! Both must succeed. Star and fork totals are summed over the returned
//! repositories.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::http::{JsonFetcher, path_segment};
use super::{DEFAULT_TIMEOUT, StatsSource};
use crate::types::{GitHubStats, RepoSummary};
use crate::{Result, VitrineError};

/// Default GitHub API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Default number of recent repositories requested.
pub const DEFAULT_RECENT_REPOS: usize = 6;

/// GitHub's `per_page` ceiling.
const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
struct UserPayload {
    public_repos: Option<u64>,
    followers: Option<u64>,
    following: Option<u64>,
    public_gists: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RepoPayload {
    name: String,
    stargazers_count: Option<u64>,
    forks_count: Option<u64>,
    language: Option<String>,
    updated_at: Option<String>,
    html_url: Option<String>,
}

/// Candidate source backed by the GitHub REST API.
#[derive(Clone)]
pub struct GitHubRestSource {
    fetcher: JsonFetcher,
    base_url: String,
    timeout: Duration,
    recent_repos: usize,
}

impl GitHubRestSource {
    /// Source against the public API.
    pub fn new(fetcher: JsonFetcher) -> Self {
        Self::with_base_url(fetcher, DEFAULT_BASE_URL)
    }

    /// Source against a custom base URL (for testing with wiremock).
    pub fn with_base_url(fetcher: JsonFetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            recent_repos: DEFAULT_RECENT_REPOS,
        }
    }

    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Number of recent repositories to request (clamped to 1..=100).
    pub fn recent_repos(mut self, n: usize) -> Self {
        self.recent_repos = n.clamp(1, MAX_PER_PAGE);
        self
    }
}

#[async_trait]
impl StatsSource<GitHubStats> for GitHubRestSource {
    fn name(&self) -> &str {
        "github-rest"
    }

    async fn fetch(&self, subject: &str) -> Result<GitHubStats> {
        let profile_url = format!("{}/users/{}", self.base_url, path_segment(subject)?);
        let user: UserPayload = self.fetcher.get_json(&profile_url, self.timeout).await?;
        let repos: Vec<RepoPayload> = self
            .fetcher
            .get_json(
                &format!(
                    "{profile_url}/repos?sort=updated&per_page={}",
                    self.recent_repos
                ),
                self.timeout,
            )
            .await?;
        normalize(user, repos, self.recent_repos)
    }
}

/// Map the REST payloads into the canonical record.
fn normalize(user: UserPayload, repos: Vec<RepoPayload>, limit: usize) -> Result<GitHubStats> {
    let total_repos = user.public_repos.ok_or_else(|| {
        VitrineError::MalformedPayload("user payload has no public_repos".to_string())
    })?;

    let recent_repos: Vec<RepoSummary> = repos
        .into_iter()
        .take(limit)
        .map(|repo| RepoSummary {
            stars: repo.stargazers_count.unwrap_or(0),
            forks: repo.forks_count.unwrap_or(0),
            language: repo.language,
            updated_at: repo.updated_at.unwrap_or_default(),
            url: repo.html_url.unwrap_or_default(),
            name: repo.name,
        })
        .collect();

    Ok(GitHubStats {
        total_repos,
        total_stars: recent_repos.iter().map(|r| r.stars).sum(),
        total_forks: recent_repos.iter().map(|r| r.forks).sum(),
        followers: user.followers.unwrap_or(0),
        following: user.following.unwrap_or(0),
        public_gists: user.public_gists.unwrap_or(0),
        recent_repos,
    })
}
