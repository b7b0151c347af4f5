//! TTL cache over a persistent storage medium.
//!
//! [`CacheStore`] wraps values in a [`CacheEntry`] envelope (value, write
//! timestamp, TTL) and stores them as JSON in a [`Storage`] backend.
//!
//! - Writes are best-effort: a storage failure is logged and counted, never
//!   returned to the caller.
//! - Eviction is lazy: an expired entry is deleted when a read finds it.
//!   Nothing runs in the background.
//! - [`CacheStore::clear()`] only touches keys under the given application
//!   prefixes, so other consumers of the same medium are left alone.
//!
//! The store is constructed explicitly and shared (`Arc<CacheStore>`) with
//! every pipeline that needs it; there is no process-global instance.

pub mod entry;
pub mod storage;

pub use entry::CacheEntry;
pub use storage::{FileStorage, MemoryStorage, Storage, default_store_path};

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::telemetry;

/// Key prefix for GitHub stats entries.
pub const GITHUB_PREFIX: &str = "github-stats-";
/// Key prefix for LeetCode stats entries.
pub const LEETCODE_PREFIX: &str = "leetcode-stats-";
/// Every prefix this crate writes under.
pub const KNOWN_PREFIXES: &[&str] = &[GITHUB_PREFIX, LEETCODE_PREFIX];

/// Build the cache key for a service and subject: `"<service>-stats-<subject>"`.
pub fn stats_key(service: &str, subject: &str) -> String {
    format!("{service}-stats-{subject}")
}

/// Whether `prefix` lies inside one of [`KNOWN_PREFIXES`].
fn is_owned_prefix(prefix: &str) -> bool {
    KNOWN_PREFIXES.iter().any(|known| prefix.starts_with(known))
}

/// TTL key/value cache.
pub struct CacheStore {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    /// Create a store over `storage` using the system clock.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    /// Create a store with an explicit clock.
    pub fn with_clock(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Convenience: a store over a fresh [`MemoryStorage`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Store `value` under `key` for `ttl`.
    ///
    /// Serialization or storage failures are logged and swallowed.
    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let entry = CacheEntry::new(value, self.clock.now_millis(), ttl);
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize cache entry");
                metrics::counter!(telemetry::CACHE_WRITE_FAILURES_TOTAL).increment(1);
                return;
            }
        };
        if let Err(e) = self.storage.set_item(key, &raw) {
            warn!(key, error = %e, "cache write failed, continuing uncached");
            metrics::counter!(telemetry::CACHE_WRITE_FAILURES_TOTAL).increment(1);
        }
    }

    /// Read the live value under `key`.
    ///
    /// Returns `None` when the key is missing, unreadable, or fails to parse
    /// as `T`. An expired entry is deleted before returning `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };
        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(key, error = %e, "unparseable cache entry, treating as miss");
                return None;
            }
        };
        if entry.is_live(self.clock.now_millis()) {
            Some(entry.value)
        } else {
            debug!(key, "cache entry expired, evicting");
            self.remove(key);
            None
        }
    }

    /// Delete `key`. Failures are logged.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.storage.remove_item(key) {
            warn!(key, error = %e, "cache remove failed");
        }
    }

    /// Delete every key starting with one of `prefixes`.
    ///
    /// Only prefixes inside this crate's namespaces ([`KNOWN_PREFIXES`], or
    /// narrower prefixes beginning with one of them) are honoured; anything
    /// else is skipped with a warning so foreign keys sharing the medium
    /// are never removed. Returns the number of keys removed.
    pub fn clear(&self, prefixes: &[&str]) -> usize {
        let prefixes: Vec<&str> = prefixes
            .iter()
            .copied()
            .filter(|p| {
                let owned = is_owned_prefix(p);
                if !owned {
                    warn!(prefix = %p, "ignoring prefix outside vitrine namespaces");
                }
                owned
            })
            .collect();
        if prefixes.is_empty() {
            warn!("cache clear called without a usable prefix, nothing removed");
            return 0;
        }
        let keys = match self.storage.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "failed to list cache keys");
                return 0;
            }
        };
        let mut removed = 0;
        for key in keys
            .iter()
            .filter(|k| prefixes.iter().any(|p| k.starts_with(p)))
        {
            match self.storage.remove_item(key) {
                Ok(()) => removed += 1,
                Err(e) => warn!(key = %key, error = %e, "cache remove failed"),
            }
        }
        debug!(removed, "cleared cache namespaces");
        removed
    }

    /// Clear every namespace this crate writes under ([`KNOWN_PREFIXES`]).
    pub fn clear_namespaces(&self) -> usize {
        self.clear(KNOWN_PREFIXES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_key_format() {
        assert_eq!(stats_key("github", "octocat"), "github-stats-octocat");
        assert!(stats_key("leetcode", "x").starts_with(LEETCODE_PREFIX));
    }

    #[test]
    fn unparseable_entry_is_a_miss() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item("github-stats-x", "garbage").unwrap();
        let cache = CacheStore::new(storage);
        assert_eq!(cache.get::<u32>("github-stats-x"), None);
    }

    #[test]
    fn wrong_shape_is_a_miss() {
        let cache = CacheStore::in_memory();
        cache.set("k", &"a string", Duration::from_secs(60));
        assert_eq!(cache.get::<u32>("k"), None);
        assert_eq!(cache.get::<String>("k"), Some("a string".to_string()));
    }

    #[test]
    fn owned_prefixes() {
        assert!(is_owned_prefix("github-stats-"));
        assert!(is_owned_prefix("leetcode-stats-dhruba"));
        assert!(!is_owned_prefix("github-"));
        assert!(!is_owned_prefix("the"));
        assert!(!is_owned_prefix(""));
    }

    #[test]
    fn clear_with_only_empty_prefix_removes_nothing() {
        let cache = CacheStore::in_memory();
        cache.set("github-stats-a", &1u32, Duration::from_secs(60));
        assert_eq!(cache.clear(&[""]), 0);
        assert_eq!(cache.get::<u32>("github-stats-a"), Some(1));
    }
}
