//! Persisted cache entry envelope.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A cached value with its write timestamp and time-to-live.
///
/// Serialized as `{"value": ..., "writtenAt": <epoch ms>, "expiresIn": <ms>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    pub value: T,
    /// Epoch milliseconds at which the entry was stored.
    pub written_at: u64,
    /// Validity window in milliseconds, measured from `written_at`.
    pub expires_in: u64,
}

impl<T> CacheEntry<T> {
    /// Wrap `value` as written at `now_millis` with the given TTL.
    pub fn new(value: T, now_millis: u64, ttl: Duration) -> Self {
        Self {
            value,
            written_at: now_millis,
            expires_in: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Whether the entry is still valid at `now_millis`.
    ///
    /// Live iff `now - written_at < expires_in`. An entry stamped in the
    /// future (clock skew between writers) counts as live.
    pub fn is_live(&self, now_millis: u64) -> bool {
        now_millis.saturating_sub(self.written_at) < self.expires_in
    }
}
