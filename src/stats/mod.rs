//! Stats fetch pipelines.
//!
//! A [`StatsPipeline`] turns a subject identifier into a canonical record:
//! cache lookup, then an ordered list of [`StatsSource`] candidates, then
//! the record type's static fallback. Each source owns its endpoint URLs,
//! its timeout and its normalization from the upstream payload shape, so
//! the pipeline never inspects URLs or payloads itself.
//!
//! Sources shipped with the crate:
//!
//! | record           | source                         | upstream shape       |
//! |------------------|--------------------------------|----------------------|
//! | `GitHubStats`    | [`github::GitHubRestSource`]   | REST user + repos    |
//! | `LeetCodeStats`  | [`leetcode::LeetCodeSource`]   | submission summary   |
//! | `LeetCodeStats`  | [`leetcode::LeetCodeSource`]   | flat counters        |

pub mod derive;
pub mod github;
pub mod http;
pub mod leetcode;
pub mod pipeline;

pub use derive::{ActivityCalendar, acceptance_rate};
pub use github::GitHubRestSource;
pub use http::JsonFetcher;
pub use leetcode::{EndpointConfig, LeetCodeFormat, LeetCodeSource};
pub use pipeline::{DEFAULT_TTL, FetchOutcome, StatsPipeline};

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Result;
use crate::types::{GitHubStats, LeetCodeStats};

/// Default per-candidate request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A canonical record that can be cached and has a static fallback.
pub trait StatsRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Service name, used for cache keys, logs and metric labels.
    const SERVICE: &'static str;

    /// Record served when no cache entry exists and every source failed.
    fn fallback() -> Self;
}

impl StatsRecord for GitHubStats {
    const SERVICE: &'static str = "github";

    fn fallback() -> Self {
        GitHubStats::fallback()
    }
}

impl StatsRecord for LeetCodeStats {
    const SERVICE: &'static str = "leetcode";

    fn fallback() -> Self {
        LeetCodeStats::fallback()
    }
}

/// One candidate endpoint for a record type.
///
/// `fetch` issues the request(s), validates the payload and normalizes it.
/// Any error makes the pipeline move on to the next candidate.
#[async_trait]
pub trait StatsSource<T>: Send + Sync {
    /// Source name for logging/metrics.
    fn name(&self) -> &str;

    /// Fetch and normalize the record for `subject`.
    async fn fetch(&self, subject: &str) -> Result<T>;
}
