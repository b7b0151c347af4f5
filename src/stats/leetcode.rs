//! LeetCode sources.
//!
//! LeetCode has no public stats API, so several community mirrors are tried
//! in order. They answer in one of two shapes, each with its own
//! normalization:
//!
//! - [`LeetCodeFormat::SubmissionSummary`]: `totalSolved`,
//!   `totalSubmissions[]` and a `submissionCalendar`; acceptance rate and
//!   streaks are derived.
//! - [`LeetCodeFormat::Flat`]: flat counters, optionally with
//!   `acceptanceRate` and streaks precomputed; a `status: "error"` body
//!   marks an unknown user.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::derive::{ActivityCalendar, acceptance_rate, round_one_decimal};
use super::http::{JsonFetcher, path_segment};
use super::{DEFAULT_TIMEOUT, StatsSource};
use crate::clock::Clock;
use crate::types::{
    DEFAULT_TOTAL_EASY, DEFAULT_TOTAL_HARD, DEFAULT_TOTAL_MEDIUM, DEFAULT_TOTAL_QUESTIONS,
    DifficultyStats, LeetCodeStats, UNRANKED,
};
use crate::{Result, VitrineError};

/// Placeholder replaced by the subject in endpoint URLs.
pub const SUBJECT_PLACEHOLDER: &str = "{subject}";

/// Upstream payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeetCodeFormat {
    SubmissionSummary,
    Flat,
}

/// One LeetCode candidate endpoint.
///
/// Deserializable from the `[[leetcode.endpoints]]` config table:
///
/// ```toml
/// [[leetcode.endpoints]]
/// name = "faisalshohag"
/// url = "https://leetcode-api-faisalshohag.vercel.app/{subject}"
/// format = "submission-summary"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub name: String,
    /// URL template; `{subject}` is replaced by the username. Without a
    /// placeholder the username is appended as a path segment.
    pub url: String,
    pub format: LeetCodeFormat,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl EndpointConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>, format: LeetCodeFormat) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            format,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Set the request timeout (whole seconds, at least one).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Concrete URL for `subject`, which is escaped as one path segment.
    pub fn url_for(&self, subject: &str) -> Result<String> {
        let segment = path_segment(subject)?;
        Ok(if self.url.contains(SUBJECT_PLACEHOLDER) {
            self.url.replace(SUBJECT_PLACEHOLDER, &segment)
        } else {
            format!("{}/{segment}", self.url.trim_end_matches('/'))
        })
    }

    /// The default candidate list, in priority order.
    pub fn defaults() -> Vec<EndpointConfig> {
        vec![
            EndpointConfig::new(
                "faisalshohag",
                "https://leetcode-api-faisalshohag.vercel.app/{subject}",
                LeetCodeFormat::SubmissionSummary,
            ),
            EndpointConfig::new(
                "leetcode-stats-api",
                "https://leetcode-stats-api.herokuapp.com/{subject}",
                LeetCodeFormat::Flat,
            ),
            EndpointConfig::new(
                "alfa",
                "https://alfa-leetcode-api.onrender.com/{subject}",
                LeetCodeFormat::Flat,
            ),
        ]
    }
}

// ============================================================================
// Payload shapes
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionCount {
    difficulty: Option<String>,
    submissions: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryPayload {
    errors: Option<Value>,
    total_solved: Option<u64>,
    total_questions: Option<u64>,
    ranking: Option<u64>,
    easy_solved: Option<u64>,
    total_easy: Option<u64>,
    medium_solved: Option<u64>,
    total_medium: Option<u64>,
    hard_solved: Option<u64>,
    total_hard: Option<u64>,
    #[serde(default)]
    total_submissions: Vec<SubmissionCount>,
    submission_calendar: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlatPayload {
    status: Option<String>,
    message: Option<String>,
    total_solved: Option<u64>,
    total_questions: Option<u64>,
    acceptance_rate: Option<f64>,
    ranking: Option<u64>,
    easy_solved: Option<u64>,
    total_easy: Option<u64>,
    medium_solved: Option<u64>,
    total_medium: Option<u64>,
    hard_solved: Option<u64>,
    total_hard: Option<u64>,
    current_streak: Option<u32>,
    longest_streak: Option<u32>,
    submission_calendar: Option<Value>,
}

/// Upstream zero or absent → the given default.
fn or_default(value: Option<u64>, default: u64) -> u64 {
    value.filter(|&v| v > 0).unwrap_or(default)
}

fn calendar_of(raw: Option<&Value>) -> ActivityCalendar {
    raw.and_then(ActivityCalendar::parse).unwrap_or_default()
}

// ============================================================================
// Normalization
// ============================================================================

fn normalize_summary(payload: SummaryPayload, today: u64) -> Result<LeetCodeStats> {
    if let Some(errors) = payload.errors {
        return Err(VitrineError::MalformedPayload(format!(
            "upstream reported errors: {errors}"
        )));
    }
    let total_solved = payload.total_solved.ok_or_else(|| {
        VitrineError::MalformedPayload("summary payload has no totalSolved".to_string())
    })?;

    // Prefer the "All" row; fall back to the first row.
    let attempted = payload
        .total_submissions
        .iter()
        .find(|row| row.difficulty.as_deref() == Some("All"))
        .or_else(|| payload.total_submissions.first())
        .and_then(|row| row.submissions)
        .unwrap_or(0);

    let calendar = calendar_of(payload.submission_calendar.as_ref());
    let current_streak = calendar.current_streak(today);

    Ok(LeetCodeStats {
        total_solved,
        total_questions: or_default(payload.total_questions, DEFAULT_TOTAL_QUESTIONS),
        acceptance_rate: acceptance_rate(total_solved, attempted),
        ranking: or_default(payload.ranking, UNRANKED),
        easy: DifficultyStats::new(
            payload.easy_solved.unwrap_or(0),
            or_default(payload.total_easy, DEFAULT_TOTAL_EASY),
        ),
        medium: DifficultyStats::new(
            payload.medium_solved.unwrap_or(0),
            or_default(payload.total_medium, DEFAULT_TOTAL_MEDIUM),
        ),
        hard: DifficultyStats::new(
            payload.hard_solved.unwrap_or(0),
            or_default(payload.total_hard, DEFAULT_TOTAL_HARD),
        ),
        current_streak,
        longest_streak: calendar.longest_streak().max(current_streak),
    })
}

fn normalize_flat(payload: FlatPayload, today: u64) -> Result<LeetCodeStats> {
    if payload.status.as_deref() == Some("error") {
        return Err(VitrineError::MalformedPayload(format!(
            "upstream reported error: {}",
            payload.message.as_deref().unwrap_or("unknown")
        )));
    }
    let total_solved = payload.total_solved.ok_or_else(|| {
        VitrineError::MalformedPayload("flat payload has no totalSolved".to_string())
    })?;

    let calendar = calendar_of(payload.submission_calendar.as_ref());
    let current_streak = payload
        .current_streak
        .unwrap_or_else(|| calendar.current_streak(today));
    let longest_streak = payload
        .longest_streak
        .unwrap_or_else(|| calendar.longest_streak())
        .max(current_streak);

    Ok(LeetCodeStats {
        total_solved,
        total_questions: or_default(payload.total_questions, DEFAULT_TOTAL_QUESTIONS),
        acceptance_rate: payload.acceptance_rate.map(round_one_decimal).unwrap_or(0.0),
        ranking: or_default(payload.ranking, UNRANKED),
        easy: DifficultyStats::new(
            payload.easy_solved.unwrap_or(0),
            or_default(payload.total_easy, DEFAULT_TOTAL_EASY),
        ),
        medium: DifficultyStats::new(
            payload.medium_solved.unwrap_or(0),
            or_default(payload.total_medium, DEFAULT_TOTAL_MEDIUM),
        ),
        hard: DifficultyStats::new(
            payload.hard_solved.unwrap_or(0),
            or_default(payload.total_hard, DEFAULT_TOTAL_HARD),
        ),
        current_streak,
        longest_streak,
    })
}

/// Decode `payload` according to `format` and normalize it.
pub fn normalize(format: LeetCodeFormat, payload: Value, today: u64) -> Result<LeetCodeStats> {
    if !payload.is_object() {
        return Err(VitrineError::MalformedPayload(
            "expected a JSON object".to_string(),
        ));
    }
    match format {
        LeetCodeFormat::SubmissionSummary => {
            normalize_summary(serde_json::from_value(payload)?, today)
        }
        LeetCodeFormat::Flat => normalize_flat(serde_json::from_value(payload)?, today),
    }
}

// ============================================================================
// Source
// ============================================================================

/// Candidate source for one configured LeetCode endpoint.
pub struct LeetCodeSource {
    endpoint: EndpointConfig,
    fetcher: JsonFetcher,
    clock: Arc<dyn Clock>,
}

impl LeetCodeSource {
    pub fn new(endpoint: EndpointConfig, fetcher: JsonFetcher, clock: Arc<dyn Clock>) -> Self {
        Self {
            endpoint,
            fetcher,
            clock,
        }
    }
}

#[async_trait]
impl StatsSource<LeetCodeStats> for LeetCodeSource {
    fn name(&self) -> &str {
        &self.endpoint.name
    }

    async fn fetch(&self, subject: &str) -> Result<LeetCodeStats> {
        let payload: Value = self
            .fetcher
            .get_json(
                &self.endpoint.url_for(subject)?,
                Duration::from_secs(self.endpoint.timeout_secs),
            )
            .await?;
        normalize(self.endpoint.format, payload, self.clock.today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TODAY: u64 = 20_000;

    fn day_secs(offset: u64) -> String {
        ((TODAY - offset) * 86_400).to_string()
    }

    #[test]
    fn url_template_substitution() {
        let ep = EndpointConfig::new("a", "https://x.test/{subject}/stats", LeetCodeFormat::Flat);
        assert_eq!(ep.url_for("bob").unwrap(), "https://x.test/bob/stats");
        let bare = EndpointConfig::new("b", "https://y.test/", LeetCodeFormat::Flat);
        assert_eq!(bare.url_for("bob").unwrap(), "https://y.test/bob");
    }

    #[test]
    fn subject_stays_inside_its_segment() {
        let ep = EndpointConfig::new("a", "https://x.test/{subject}/stats", LeetCodeFormat::Flat);
        assert_eq!(
            ep.url_for("bob/../admin?x=1").unwrap(),
            "https://x.test/bob%2F..%2Fadmin%3Fx=1/stats"
        );
        assert!(matches!(ep.url_for(".."), Err(VitrineError::InvalidSubject(_))));
    }

    #[test]
    fn defaults_are_ordered() {
        let names: Vec<_> = EndpointConfig::defaults()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["faisalshohag", "leetcode-stats-api", "alfa"]);
    }

    #[test]
    fn summary_derives_rate_and_streaks() {
        let mut calendar = serde_json::Map::new();
        calendar.insert(day_secs(0), json!(3));
        calendar.insert(day_secs(1), json!(2));
        calendar.insert(day_secs(2), json!(0));
        calendar.insert(day_secs(3), json!(5));
        let payload = json!({
            "totalSolved": 7,
            "totalQuestions": 3500,
            "ranking": 123456,
            "easySolved": 6, "totalEasy": 900,
            "mediumSolved": 1, "totalMedium": 1900,
            "hardSolved": 0, "totalHard": 850,
            "totalSubmissions": [
                {"difficulty": "All", "count": 7, "submissions": 12},
                {"difficulty": "Easy", "count": 6, "submissions": 10}
            ],
            "submissionCalendar": calendar,
        });
        let stats = normalize(LeetCodeFormat::SubmissionSummary, payload, TODAY).unwrap();
        assert_eq!(stats.acceptance_rate, 58.3);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 2);
        assert_eq!(stats.ranking, 123456);
        assert_eq!(stats.easy, DifficultyStats::new(6, 900));
    }

    #[test]
    fn summary_zero_submissions_is_zero_rate() {
        let payload = json!({"totalSolved": 0, "totalSubmissions": []});
        let stats = normalize(LeetCodeFormat::SubmissionSummary, payload, TODAY).unwrap();
        assert_eq!(stats.acceptance_rate, 0.0);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.total_questions, DEFAULT_TOTAL_QUESTIONS);
        assert_eq!(stats.ranking, UNRANKED);
        assert_eq!(stats.hard, DifficultyStats::new(0, DEFAULT_TOTAL_HARD));
    }

    #[test]
    fn summary_with_errors_is_malformed() {
        let payload = json!({"errors": [{"message": "user does not exist"}]});
        let err = normalize(LeetCodeFormat::SubmissionSummary, payload, TODAY).unwrap_err();
        assert!(matches!(err, VitrineError::MalformedPayload(_)));
    }

    #[test]
    fn flat_uses_supplied_metrics() {
        let payload = json!({
            "status": "success",
            "totalSolved": 40,
            "acceptanceRate": 61.234,
            "currentStreak": 4,
            "longestStreak": 9,
            "easySolved": 30, "mediumSolved": 9, "hardSolved": 1
        });
        let stats = normalize(LeetCodeFormat::Flat, payload, TODAY).unwrap();
        assert_eq!(stats.acceptance_rate, 61.2);
        assert_eq!(stats.current_streak, 4);
        assert_eq!(stats.longest_streak, 9);
        assert_eq!(stats.medium.solved, 9);
    }

    #[test]
    fn flat_derives_missing_streaks_from_calendar() {
        let encoded = format!("{{\"{}\": 1, \"{}\": 2}}", day_secs(0), day_secs(1));
        let payload = json!({"totalSolved": 5, "submissionCalendar": encoded});
        let stats = normalize(LeetCodeFormat::Flat, payload, TODAY).unwrap();
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 2);
        assert_eq!(stats.acceptance_rate, 0.0);
    }

    #[test]
    fn flat_error_status_is_malformed() {
        let payload = json!({"status": "error", "message": "user does not exist"});
        let err = normalize(LeetCodeFormat::Flat, payload, TODAY).unwrap_err();
        assert!(err.to_string().contains("user does not exist"));
    }

    #[test]
    fn non_object_payload_is_malformed() {
        let err = normalize(LeetCodeFormat::Flat, json!([1, 2]), TODAY).unwrap_err();
        assert!(matches!(err, VitrineError::MalformedPayload(_)));
    }

    #[test]
    fn endpoint_config_from_toml() {
        let ep: EndpointConfig = toml::from_str(
            r#"
            name = "mirror"
            url = "https://mirror.test/{subject}"
            format = "flat"
            "#,
        )
        .unwrap();
        assert_eq!(ep.format, LeetCodeFormat::Flat);
        assert_eq!(ep.timeout_secs, 10);
    }
}
