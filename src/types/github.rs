//! Code-hosting profile summary.

use serde::{Deserialize, Serialize};

/// One recently updated repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoSummary {
    pub name: String,
    pub stars: u64,
    pub forks: u64,
    /// Primary language as detected upstream; `None` when none was detected.
    pub language: Option<String>,
    /// Last update, ISO-8601 as served upstream.
    pub updated_at: String,
    pub url: String,
}

/// GitHub profile statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubStats {
    pub total_repos: u64,
    /// Stars summed over `recent_repos`.
    pub total_stars: u64,
    /// Forks summed over `recent_repos`.
    pub total_forks: u64,
    pub followers: u64,
    pub following: u64,
    pub public_gists: u64,
    /// Most recently updated repositories, newest first.
    pub recent_repos: Vec<RepoSummary>,
}

impl GitHubStats {
    /// Static record served when no cache entry exists and every endpoint
    /// failed.
    pub fn fallback() -> Self {
        Self {
            total_repos: 25,
            total_stars: 48,
            total_forks: 12,
            followers: 15,
            following: 20,
            public_gists: 3,
            recent_repos: vec![RepoSummary {
                name: "portfolio-website".to_string(),
                stars: 5,
                forks: 2,
                language: Some("TypeScript".to_string()),
                updated_at: "2025-01-01T00:00:00Z".to_string(),
                url: "https://github.com/dhruba001/portfolio-website".to_string(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_stable() {
        assert_eq!(GitHubStats::fallback(), GitHubStats::fallback());
        assert_eq!(GitHubStats::fallback().recent_repos.len(), 1);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(GitHubStats::fallback()).unwrap();
        assert_eq!(json["totalRepos"], 25);
        assert_eq!(json["publicGists"], 3);
        assert_eq!(json["recentRepos"][0]["updatedAt"], "2025-01-01T00:00:00Z");
    }
}
