//! Vitrine - data layer for a personal portfolio site
//!
//! This crate fetches the GitHub and LeetCode summaries shown on the page,
//! caches them with a time-to-live in a small key/value store, and always
//! resolves to a usable record: live data, a cached copy, or a built-in
//! static fallback. Page renderers never see an error.
//!
//! # Example
//!
//! ```rust,no_run
//! use vitrine::Vitrine;
//!
//! #[tokio::main]
//! async fn main() -> vitrine::Result<()> {
//!     let service = Vitrine::builder().build()?;
//!
//!     let github = service.github_stats("dhruba001").await;
//!     println!("{} repos, {} stars", github.total_repos, github.total_stars);
//!
//!     let leetcode = service.leetcode_stats("dhruba_001").await;
//!     println!(
//!         "{}/{} solved, streak {}",
//!         leetcode.total_solved, leetcode.total_questions, leetcode.current_streak
//!     );
//!     Ok(())
//! }
//! ```
//!
//! # Explicit outcome
//!
//! ```rust,no_run
//! use vitrine::{FetchOutcome, Vitrine};
//!
//! # async fn run() -> vitrine::Result<()> {
//! let service = Vitrine::builder().in_memory().build()?;
//! match service.leetcode_outcome("dhruba_001").await {
//!     FetchOutcome::Cached(_) => println!("served from cache"),
//!     FetchOutcome::Fetched { source, .. } => println!("fetched from {source}"),
//!     FetchOutcome::Fallback(_) => println!("every endpoint failed"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod service;
pub mod stats;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use cache::CacheStore;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{Result, VitrineError};
pub use service::{StatsService, Vitrine, VitrineBuilder};
pub use stats::{FetchOutcome, StatsPipeline, StatsRecord, StatsSource};
pub use version::{GIT_BRANCH, GIT_SHA, PKG_VERSION, git_dirty, user_agent, version_string};

pub use types::{DifficultyStats, GitHubStats, LeetCodeStats, RepoSummary};
