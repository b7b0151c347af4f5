//! Canonical stats records returned to callers.
//!
//! Whatever candidate endpoint supplied the raw data, callers only ever see
//! these shapes. Every numeric field is always populated.

mod github;
mod leetcode;

pub use github::{GitHubStats, RepoSummary};
pub use leetcode::{DifficultyStats, LeetCodeStats};
pub(crate) use leetcode::{
    DEFAULT_TOTAL_EASY, DEFAULT_TOTAL_HARD, DEFAULT_TOTAL_MEDIUM, DEFAULT_TOTAL_QUESTIONS, UNRANKED,
};
