//! Persistent key/value storage backends.
//!
//! A [`Storage`] is the raw medium under the TTL cache: string keys to
//! string values, synchronous, with no notion of expiry. Two backends ship:
//!
//! - [`FileStorage`]: a single JSON object on disk, rewritten atomically
//!   (tmp file + rename) on every mutation. Survives restarts; several
//!   processes may share it with last-write-wins semantics. Entries written
//!   by other programs are carried through untouched.
//! - [`MemoryStorage`]: bounded in-process store (moka), for tests and
//!   short-lived tools.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;

use crate::{Result, VitrineError};

/// Default maximum number of entries held by [`MemoryStorage`].
const DEFAULT_MEMORY_CAPACITY: u64 = 1_000;

/// Raw string storage medium.
///
/// Implementations report failures (disk full, permissions, poisoned lock)
/// as [`VitrineError::Storage`]; the cache layer decides whether to swallow
/// them.
pub trait Storage: Send + Sync {
    /// Read the raw value stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// All keys currently present.
    fn keys(&self) -> Result<Vec<String>>;
}

// ============================================================================
// In-memory backend
// ============================================================================

/// Bounded in-memory storage.
///
/// Uses a moka LRU so a long-running process cannot grow without bound.
pub struct MemoryStorage {
    entries: moka::sync::Cache<String, String>,
}

impl MemoryStorage {
    /// Create an empty store with the default capacity (1,000 entries).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CAPACITY)
    }

    /// Create an empty store holding at most `max` entries.
    pub fn with_capacity(max: u64) -> Self {
        Self {
            entries: moka::sync::Cache::new(max),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.entries.invalidate(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self
            .entries
            .iter()
            .map(|(key, _)| (*key).clone())
            .collect())
    }
}

// ============================================================================
// File backend
// ============================================================================

/// Default store path: `~/.cache/vitrine/store.json`.
pub fn default_store_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("vitrine")
        .join("store.json")
}

/// JSON-file storage.
///
/// The whole store is one JSON object (`key → raw value`). Every mutation is
/// a read-modify-write of that object, serialized within the process by a
/// mutex and made atomic on disk via tmp file + rename.
///
/// Values this crate writes are JSON strings. Values of any other JSON type
/// belong to someone else: they are kept as-is on rewrite and read back as
/// their JSON text. A file that is not a JSON object is never overwritten;
/// every operation on it fails with [`VitrineError::Storage`].
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Open (lazily) a store at `path`. The file and its parent directories
    /// are created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Open the store at [`default_store_path()`].
    pub fn at_default_path() -> Self {
        Self::new(default_store_path())
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| VitrineError::Storage("file storage lock poisoned".to_string()))
    }

    /// Load the key map. A missing file is empty; an unparseable one is an
    /// error so it is left on disk as found.
    fn load(&self) -> Result<BTreeMap<String, Value>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(VitrineError::Storage(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };
        serde_json::from_str(&content).map_err(|e| {
            VitrineError::Storage(format!(
                "store file {} is not a JSON object, leaving it untouched: {e}",
                self.path.display()
            ))
        })
    }

    fn save(&self, map: &BTreeMap<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                VitrineError::Storage(format!(
                    "failed to create cache dir {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(map)
            .map_err(|e| VitrineError::Storage(format!("failed to serialize store: {e}")))?;
        std::fs::write(&tmp_path, json).map_err(|e| {
            VitrineError::Storage(format!(
                "failed to write store file {}: {e}",
                tmp_path.display()
            ))
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| {
            VitrineError::Storage(format!(
                "failed to rename store file {} → {}: {e}",
                tmp_path.display(),
                self.path.display()
            ))
        })
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.guard()?;
        Ok(self.load()?.remove(key).map(|value| match value {
            Value::String(raw) => raw,
            other => other.to_string(),
        }))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.guard()?;
        let mut map = self.load()?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.save(&map)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let _guard = self.guard()?;
        let mut map = self.load()?;
        if map.remove(key).is_some() {
            self.save(&map)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let _guard = self.guard()?;
        Ok(self.load()?.into_keys().collect())
    }
}
