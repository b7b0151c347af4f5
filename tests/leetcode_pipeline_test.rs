//! End-to-end LeetCode pipeline tests against wiremock candidates:
//! ordered fallthrough, caching, TTL refresh and total failure.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vitrine::cache::{MemoryStorage, Storage};
use vitrine::clock::{Clock, ManualClock};
use vitrine::stats::{EndpointConfig, LeetCodeFormat};
use vitrine::{FetchOutcome, LeetCodeStats, StatsService, Vitrine};

const T0: u64 = 1_700_000_000_000;
const USER: &str = "dhruba_001";
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

struct Harness {
    service: StatsService,
    storage: Arc<MemoryStorage>,
    clock: Arc<ManualClock>,
}

fn harness(server: &MockServer, endpoints: &[(&str, LeetCodeFormat)]) -> Harness {
    let storage = Arc::new(MemoryStorage::new());
    let clock = Arc::new(ManualClock::new(T0));
    let endpoints = endpoints
        .iter()
        .map(|(name, format)| {
            EndpointConfig::new(*name, format!("{}/{name}/{{subject}}", server.uri()), *format)
                .timeout(Duration::from_secs(1))
        })
        .collect();
    let service = Vitrine::builder()
        .storage(storage.clone())
        .clock(clock.clone())
        .leetcode_endpoints(endpoints)
        .build()
        .unwrap();
    Harness {
        service,
        storage,
        clock,
    }
}

fn day_secs(day: u64) -> String {
    (day * 86_400).to_string()
}

/// Summary-shaped payload: 120 solved of 300 submissions, active today and
/// yesterday, idle the day before, active three days ago.
fn summary_payload(today: u64) -> Value {
    json!({
        "totalSolved": 120,
        "totalQuestions": 3400,
        "ranking": 250000,
        "easySolved": 60,
        "totalEasy": 850,
        "mediumSolved": 50,
        "totalMedium": 1800,
        "hardSolved": 10,
        "totalHard": 750,
        "totalSubmissions": [
            {"difficulty": "All", "count": 120, "submissions": 300},
            {"difficulty": "Easy", "count": 60, "submissions": 100}
        ],
        "submissionCalendar": {
            day_secs(today): 3,
            day_secs(today - 1): 2,
            day_secs(today - 3): 5
        }
    })
}

fn flat_payload() -> Value {
    json!({
        "status": "success",
        "totalSolved": 42,
        "totalQuestions": 3500,
        "acceptanceRate": 61.234,
        "ranking": 900000,
        "easySolved": 30,
        "totalEasy": 880,
        "mediumSolved": 10,
        "totalMedium": 1850,
        "hardSolved": 2,
        "totalHard": 770,
        "submissionCalendar": "{}"
    })
}

fn expected_summary_record() -> LeetCodeStats {
    LeetCodeStats {
        total_solved: 120,
        total_questions: 3400,
        acceptance_rate: 40.0,
        ranking: 250000,
        easy: vitrine::DifficultyStats::new(60, 850),
        medium: vitrine::DifficultyStats::new(50, 1800),
        hard: vitrine::DifficultyStats::new(10, 750),
        current_streak: 2,
        longest_streak: 2,
    }
}

async fn request_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect()
}

// =============================================================================
// Fallthrough
// =============================================================================

#[tokio::test]
async fn falls_through_failed_candidates_in_order() {
    let server = MockServer::start().await;
    let h = harness(
        &server,
        &[
            ("a", LeetCodeFormat::SubmissionSummary),
            ("b", LeetCodeFormat::Flat),
            ("c", LeetCodeFormat::SubmissionSummary),
        ],
    );
    let today = h.clock.today();

    Mock::given(method("GET"))
        .and(path(format!("/a/{USER}")))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/b/{USER}")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/c/{USER}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_payload(today)))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = h.service.leetcode_outcome(USER).await;

    match &outcome {
        FetchOutcome::Fetched { record, source } => {
            assert_eq!(source, "c");
            assert_eq!(record, &expected_summary_record());
        }
        other => panic!("expected a fetched record, got {other:?}"),
    }
    assert_eq!(
        request_paths(&server).await,
        [
            format!("/a/{USER}"),
            format!("/b/{USER}"),
            format!("/c/{USER}")
        ]
    );

    // Cached under the subject key.
    assert!(
        h.storage
            .get_item(&format!("leetcode-stats-{USER}"))
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn first_healthy_candidate_wins() {
    let server = MockServer::start().await;
    let h = harness(
        &server,
        &[("flat", LeetCodeFormat::Flat), ("later", LeetCodeFormat::Flat)],
    );

    Mock::given(method("GET"))
        .and(path(format!("/flat/{USER}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(flat_payload()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/later/{USER}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(flat_payload()))
        .expect(0)
        .mount(&server)
        .await;

    let stats = h.service.leetcode_stats(USER).await;
    assert_eq!(stats.total_solved, 42);
    assert_eq!(stats.acceptance_rate, 61.2);
    assert_eq!(stats.current_streak, 0);
    assert_eq!(stats.longest_streak, 0);
}

#[tokio::test]
async fn user_not_found_payload_moves_to_next_candidate() {
    let server = MockServer::start().await;
    let h = harness(
        &server,
        &[
            ("flat", LeetCodeFormat::Flat),
            ("summary", LeetCodeFormat::SubmissionSummary),
        ],
    );
    let today = h.clock.today();

    Mock::given(method("GET"))
        .and(path(format!("/flat/{USER}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "error", "message": "user does not exist"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/summary/{USER}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_payload(today)))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = h.service.leetcode_outcome(USER).await;
    assert_eq!(outcome.origin(), "summary");
}

// =============================================================================
// Cache interaction
// =============================================================================

#[tokio::test]
async fn cache_hit_issues_no_requests() {
    let server = MockServer::start().await;
    let h = harness(&server, &[("a", LeetCodeFormat::SubmissionSummary)]);
    let today = h.clock.today();

    Mock::given(method("GET"))
        .and(path(format!("/a/{USER}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_payload(today)))
        .expect(1)
        .mount(&server)
        .await;

    let first = h.service.leetcode_outcome(USER).await;
    assert!(matches!(first, FetchOutcome::Fetched { .. }));

    // Repeated calls inside the TTL are served from cache and identical.
    for _ in 0..3 {
        let again = h.service.leetcode_outcome(USER).await;
        assert!(matches!(again, FetchOutcome::Cached(_)));
        assert_eq!(again.record(), first.record());
    }
}

#[tokio::test]
async fn expired_entry_triggers_a_refetch() {
    let server = MockServer::start().await;
    let h = harness(&server, &[("a", LeetCodeFormat::SubmissionSummary)]);
    let today = h.clock.today();

    Mock::given(method("GET"))
        .and(path(format!("/a/{USER}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_payload(today)))
        .expect(2)
        .mount(&server)
        .await;

    h.service.leetcode_stats(USER).await;

    h.clock.advance(DAY - Duration::from_millis(1));
    assert!(matches!(
        h.service.leetcode_outcome(USER).await,
        FetchOutcome::Cached(_)
    ));

    h.clock.advance(Duration::from_millis(1));
    assert!(matches!(
        h.service.leetcode_outcome(USER).await,
        FetchOutcome::Fetched { .. }
    ));
}

#[tokio::test]
async fn subjects_are_cached_independently() {
    let server = MockServer::start().await;
    let h = harness(&server, &[("a", LeetCodeFormat::Flat)]);

    Mock::given(method("GET"))
        .and(path("/a/one"))
        .respond_with(ResponseTemplate::new(200).set_body_json(flat_payload()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a/two"))
        .respond_with(ResponseTemplate::new(200).set_body_json(flat_payload()))
        .expect(1)
        .mount(&server)
        .await;

    h.service.leetcode_stats("one").await;
    h.service.leetcode_stats("two").await;
    h.service.leetcode_stats("one").await;

    let mut keys = h.storage.keys().unwrap();
    keys.sort();
    assert_eq!(keys, ["leetcode-stats-one", "leetcode-stats-two"]);
}

// =============================================================================
// Total failure
// =============================================================================

#[tokio::test]
async fn exhausted_candidates_yield_fallback_without_caching() {
    let server = MockServer::start().await;
    let h = harness(
        &server,
        &[
            ("down", LeetCodeFormat::SubmissionSummary),
            ("slow", LeetCodeFormat::Flat),
            ("empty", LeetCodeFormat::SubmissionSummary),
        ],
    );

    Mock::given(method("GET"))
        .and(path(format!("/down/{USER}")))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/slow/{USER}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(flat_payload())
                .set_delay(Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/empty/{USER}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = h.service.leetcode_outcome(USER).await;

    assert!(outcome.is_fallback());
    assert_eq!(outcome.into_record(), LeetCodeStats::fallback());
    assert!(h.storage.keys().unwrap().is_empty());
}

#[tokio::test]
async fn fallback_is_not_cached_so_next_call_retries() {
    let server = MockServer::start().await;
    let h = harness(&server, &[("a", LeetCodeFormat::Flat)]);

    Mock::given(method("GET"))
        .and(path(format!("/a/{USER}")))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    assert!(h.service.leetcode_outcome(USER).await.is_fallback());
    assert!(h.service.leetcode_outcome(USER).await.is_fallback());
}

#[tokio::test]
async fn empty_subject_serves_fallback_without_network() {
    let server = MockServer::start().await;
    let h = harness(&server, &[("a", LeetCodeFormat::Flat)]);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(flat_payload()))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = h.service.leetcode_outcome("   ").await;
    assert!(outcome.is_fallback());
    assert!(h.storage.keys().unwrap().is_empty());
}
