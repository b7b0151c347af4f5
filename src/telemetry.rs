//! Telemetry metric name constants.
//!
//! Centralised metric names for vitrine operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `vitrine_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `service`: subject type (`"github"` or `"leetcode"`)
//! - `endpoint`: candidate endpoint name (e.g. `"github-rest"`, `"faisalshohag"`)
//! - `status`: outcome: `"ok"` or a failure kind (`"http"`, `"status"`,
//!   `"timeout"`, `"malformed"`, `"invalid_subject"`)

/// Total cache hits.
///
/// Labels: `service`.
pub const CACHE_HITS_TOTAL: &str = "vitrine_cache_hits_total";

/// Total cache misses (including expired entries).
///
/// Labels: `service`.
pub const CACHE_MISSES_TOTAL: &str = "vitrine_cache_misses_total";

/// Total cache writes that the storage backend rejected.
pub const CACHE_WRITE_FAILURES_TOTAL: &str = "vitrine_cache_write_failures_total";

/// Total requests issued to candidate endpoints.
///
/// Labels: `service`, `endpoint`, `status`.
pub const ENDPOINT_REQUESTS_TOTAL: &str = "vitrine_endpoint_requests_total";

/// Duration of a full fetch sequence (cache miss through success or fallback).
///
/// Labels: `service`.
pub const FETCH_DURATION_SECONDS: &str = "vitrine_fetch_duration_seconds";

/// Total calls resolved to the static fallback record.
///
/// Labels: `service`.
pub const FALLBACKS_TOTAL: &str = "vitrine_fallbacks_total";
