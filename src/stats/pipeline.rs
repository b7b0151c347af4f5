//! Cache-backed, fallback-tolerant fetch pipeline.
//!
//! # Flow
//!
//! ```text
//! fetch("octocat")
//!        │
//!        ▼
//!  ┌─────────────┐  hit   ┌──────────────┐
//!  │ CacheCheck  │ ─────► │ Done(Cached) │
//!  └──────┬──────┘        └──────────────┘
//!         │ miss
//!         ▼
//!  ┌─────────────┐  ok    ┌───────────────────────────────┐
//!  │ source[0]   │ ─────► │ CacheWrite → Done(Fetched)    │
//!  └──────┬──────┘        └───────────────────────────────┘
//!         │ err                         ▲
//!         ▼                             │ ok
//!  ┌─────────────┐ ─────────────────────┘
//!  │ source[n-1] │
//!  └──────┬──────┘
//!         │ err
//!         ▼
//!  ┌────────────────┐
//!  │ Done(Fallback) │  (not cached)
//!  └────────────────┘
//! ```
//!
//! Sources are tried strictly in order, one at a time. Any error from a
//! source (transport, status, timeout, malformed payload) moves on to the
//! next one; there is no retry of the same source.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, instrument, warn};

use super::{StatsRecord, StatsSource};
use crate::VitrineError;
use crate::cache::{CacheStore, stats_key};
use crate::telemetry;

/// Default validity window for fetched records.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// How a call was satisfied.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    /// A live cache entry; no request was issued.
    Cached(T),
    /// A candidate endpoint answered; the record is now cached.
    Fetched { record: T, source: String },
    /// No cache entry and every candidate failed; the static record.
    Fallback(T),
}

impl<T> FetchOutcome<T> {
    /// The record, whichever way it was obtained.
    pub fn into_record(self) -> T {
        match self {
            FetchOutcome::Cached(record)
            | FetchOutcome::Fetched { record, .. }
            | FetchOutcome::Fallback(record) => record,
        }
    }

    pub fn record(&self) -> &T {
        match self {
            FetchOutcome::Cached(record)
            | FetchOutcome::Fetched { record, .. }
            | FetchOutcome::Fallback(record) => record,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FetchOutcome::Fallback(_))
    }

    /// Short description of where the record came from.
    pub fn origin(&self) -> &str {
        match self {
            FetchOutcome::Cached(_) => "cache",
            FetchOutcome::Fetched { source, .. } => source,
            FetchOutcome::Fallback(_) => "fallback",
        }
    }
}

/// Result of walking the candidate list.
enum SourceOutcome<T> {
    Normalized { record: T, source: String },
    Exhausted { failures: Vec<(String, VitrineError)> },
}

/// Fetch pipeline for one record type.
///
/// Holds the shared cache, the ordered candidate sources and the TTL used
/// for successful fetches.
pub struct StatsPipeline<T: StatsRecord> {
    cache: Arc<CacheStore>,
    sources: Vec<Arc<dyn StatsSource<T>>>,
    ttl: Duration,
}

impl<T: StatsRecord> StatsPipeline<T> {
    /// Create a pipeline with no sources and the default TTL (24 hours).
    pub fn new(cache: Arc<CacheStore>) -> Self {
        Self {
            cache,
            sources: Vec::new(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Set the TTL for cached records.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Append a candidate source (lowest priority so far).
    pub fn add_source(&mut self, source: Arc<dyn StatsSource<T>>) {
        self.sources.push(source);
    }

    /// Builder-style [`add_source()`](Self::add_source).
    pub fn with_source(mut self, source: Arc<dyn StatsSource<T>>) -> Self {
        self.add_source(source);
        self
    }

    /// Names of the configured sources, in priority order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cache key used for `subject`.
    pub fn cache_key(&self, subject: &str) -> String {
        stats_key(T::SERVICE, subject.trim())
    }

    /// Fetch the record for `subject`. Never fails.
    pub async fn fetch(&self, subject: &str) -> T {
        self.fetch_outcome(subject).await.into_record()
    }

    /// Fetch the record for `subject`, reporting how it was obtained.
    #[instrument(skip(self), fields(service = T::SERVICE))]
    pub async fn fetch_outcome(&self, subject: &str) -> FetchOutcome<T> {
        let subject = subject.trim();
        if subject.is_empty() {
            warn!("empty subject, serving fallback record");
            metrics::counter!(telemetry::FALLBACKS_TOTAL, "service" => T::SERVICE).increment(1);
            return FetchOutcome::Fallback(T::fallback());
        }

        let key = stats_key(T::SERVICE, subject);
        if let Some(record) = self.cache.get::<T>(&key) {
            debug!(key = %key, "using cached record");
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "service" => T::SERVICE).increment(1);
            return FetchOutcome::Cached(record);
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "service" => T::SERVICE).increment(1);

        info!(subject, "fetching fresh record");
        let start = Instant::now();
        let outcome = match self.try_sources(subject).await {
            SourceOutcome::Normalized { record, source } => {
                self.cache.set(&key, &record, self.ttl);
                info!(source = %source, "fetched and cached record");
                FetchOutcome::Fetched { record, source }
            }
            SourceOutcome::Exhausted { failures } => {
                error!(
                    attempts = failures.len(),
                    "all candidate endpoints failed, serving fallback record"
                );
                metrics::counter!(telemetry::FALLBACKS_TOTAL, "service" => T::SERVICE)
                    .increment(1);
                FetchOutcome::Fallback(T::fallback())
            }
        };
        metrics::histogram!(telemetry::FETCH_DURATION_SECONDS, "service" => T::SERVICE)
            .record(start.elapsed().as_secs_f64());
        outcome
    }

    /// Try each source in order until one yields a normalized record.
    async fn try_sources(&self, subject: &str) -> SourceOutcome<T> {
        let mut failures = Vec::new();
        for source in &self.sources {
            match source.fetch(subject).await {
                Ok(record) => {
                    Self::record_attempt(source.name(), "ok");
                    return SourceOutcome::Normalized {
                        record,
                        source: source.name().to_string(),
                    };
                }
                Err(e) => {
                    warn!(endpoint = source.name(), error = %e, "candidate endpoint failed");
                    Self::record_attempt(source.name(), e.kind());
                    failures.push((source.name().to_string(), e));
                }
            }
        }
        if self.sources.is_empty() {
            failures.push(("none".to_string(), VitrineError::NoCandidate));
        }
        SourceOutcome::Exhausted { failures }
    }

    fn record_attempt(endpoint: &str, status: &'static str) {
        metrics::counter!(telemetry::ENDPOINT_REQUESTS_TOTAL,
            "service" => T::SERVICE,
            "endpoint" => endpoint.to_owned(),
            "status" => status,
        )
        .increment(1);
    }
}
