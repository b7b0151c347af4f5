//! Coding-judge profile summary.

use serde::{Deserialize, Serialize};

/// Sentinel ranking when upstream does not report one.
pub(crate) const UNRANKED: u64 = 999_999;
/// Problem-set size used when upstream does not report one.
pub(crate) const DEFAULT_TOTAL_QUESTIONS: u64 = 3671;
pub(crate) const DEFAULT_TOTAL_EASY: u64 = 895;
pub(crate) const DEFAULT_TOTAL_MEDIUM: u64 = 1911;
pub(crate) const DEFAULT_TOTAL_HARD: u64 = 865;

/// Solved/total counters for one difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyStats {
    pub solved: u64,
    pub total: u64,
}

impl DifficultyStats {
    pub fn new(solved: u64, total: u64) -> Self {
        Self { solved, total }
    }
}

/// LeetCode profile statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetCodeStats {
    pub total_solved: u64,
    pub total_questions: u64,
    /// Accepted percentage, rounded to one decimal place.
    pub acceptance_rate: f64,
    /// Global ranking; [`UNRANKED`] when unknown.
    pub ranking: u64,
    pub easy: DifficultyStats,
    pub medium: DifficultyStats,
    pub hard: DifficultyStats,
    /// Consecutive active days ending today.
    pub current_streak: u32,
    /// Longest run of consecutive active days.
    pub longest_streak: u32,
}

impl LeetCodeStats {
    /// Static record served when no cache entry exists and every endpoint
    /// failed.
    pub fn fallback() -> Self {
        Self {
            total_solved: 7,
            total_questions: DEFAULT_TOTAL_QUESTIONS,
            // 7 of 12 submissions accepted
            acceptance_rate: 58.3,
            ranking: 5_000_001,
            easy: DifficultyStats::new(6, DEFAULT_TOTAL_EASY),
            medium: DifficultyStats::new(1, DEFAULT_TOTAL_MEDIUM),
            hard: DifficultyStats::new(0, DEFAULT_TOTAL_HARD),
            current_streak: 3,
            longest_streak: 5,
        }
    }
}
