//! Content-addressed write cache.
//!
//! The [`HashStore`] maps an artifact's logical path to the SHA-256 of the
//! content last written there. It is a memoization gate only: a cold store
//! reports every artifact as needing a write, and nothing it answers can
//! corrupt output.
//!
//! Detection and mutation are separate. [`HashStore::stale_entries`] lists
//! orphaned paths but never deletes them, so callers can dry-run a prune.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::models::CacheEntry;

/// SHA-256 of artifact bytes, hex encoded.
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Concurrency-safe cache of last-written artifact hashes.
///
/// Implementations must make every operation on a single path
/// linearizable. Operations on different paths are independent.
pub trait HashStore: Send + Sync {
    /// `false` iff the last recorded write to `path` had the same hash.
    fn should_write(&self, path: &str, content: &[u8]) -> bool;

    /// Record that `content` was written to `path`.
    fn record_write(&self, path: &str, content: &[u8]);

    /// Tracked paths not present in `valid_paths`, sorted.
    fn stale_entries(&self, valid_paths: &[String]) -> Vec<String>;

    /// Stop tracking `path` (after the caller deleted it).
    fn forget(&self, path: &str);

    /// Snapshot of every tracked entry, sorted by path.
    fn entries(&self) -> Vec<CacheEntry>;
}

/// In-memory [`HashStore`].
///
/// All operations take a single lock around a `HashMap`. The critical
/// section is pure in-memory work with no I/O, and hashing happens before
/// the lock is taken.
#[derive(Default)]
pub struct InMemoryHashStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl InMemoryHashStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from previously persisted entries.
    pub fn from_entries(entries: impl IntoIterator<Item = CacheEntry>) -> Self {
        let map = entries
            .into_iter()
            .map(|e| (e.logical_path.clone(), e))
            .collect();
        Self {
            entries: Mutex::new(map),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        // Each critical section is a single map operation, so a poisoned
        // map is never half-updated.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HashStore for InMemoryHashStore {
    fn should_write(&self, path: &str, content: &[u8]) -> bool {
        let hash = content_hash(content);
        self.lock()
            .get(path)
            .map_or(true, |entry| entry.hash != hash)
    }

    fn record_write(&self, path: &str, content: &[u8]) {
        let entry = CacheEntry {
            logical_path: path.to_string(),
            hash: content_hash(content),
            timestamp: Utc::now(),
        };
        self.lock().insert(path.to_string(), entry);
    }

    fn stale_entries(&self, valid_paths: &[String]) -> Vec<String> {
        let valid: HashSet<&str> = valid_paths.iter().map(String::as_str).collect();
        let mut stale: Vec<String> = self
            .lock()
            .keys()
            .filter(|path| !valid.contains(path.as_str()))
            .cloned()
            .collect();
        stale.sort();
        stale
    }

    fn forget(&self, path: &str) {
        self.lock().remove(path);
    }

    fn entries(&self) -> Vec<CacheEntry> {
        let mut entries: Vec<CacheEntry> = self.lock().values().cloned().collect();
        entries.sort_by(|a, b| a.logical_path.cmp(&b.logical_path));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_cold_store_always_writes() {
        let store = InMemoryHashStore::new();
        assert!(store.should_write("/a.llm.md", b"hello"));
        assert!(store.should_write("/a.llm.md", b""));
    }

    #[test]
    fn test_unchanged_content_skips_write() {
        let store = InMemoryHashStore::new();
        store.record_write("/a.llm.md", b"hello");
        assert!(!store.should_write("/a.llm.md", b"hello"));
        assert!(store.should_write("/a.llm.md", b"hello!"));
        assert!(store.should_write("/b.llm.md", b"hello"));
    }

    #[test]
    fn test_stale_entries_detects_without_deleting() {
        let store = InMemoryHashStore::new();
        store.record_write("/a", b"1");
        store.record_write("/b", b"2");
        store.record_write("/c", b"3");

        let stale = store.stale_entries(&["/b".to_string()]);
        assert_eq!(stale, vec!["/a".to_string(), "/c".to_string()]);
        assert_eq!(store.len(), 3);

        store.forget("/a");
        assert_eq!(store.stale_entries(&["/b".to_string()]), vec!["/c".to_string()]);
    }

    #[test]
    fn test_from_entries_round_trips() {
        let store = InMemoryHashStore::new();
        store.record_write("/x", b"data");
        let restored = InMemoryHashStore::from_entries(store.entries());
        assert!(!restored.should_write("/x", b"data"));
    }

    #[test]
    fn test_concurrent_writers_on_distinct_paths() {
        let store = Arc::new(InMemoryHashStore::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..100 {
                        let path = format!("/w{}/{}", worker, i);
                        store.record_write(&path, path.as_bytes());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 800);
        assert!(!store.should_write("/w3/42", b"/w3/42"));
    }

    #[test]
    fn test_concurrent_writers_on_one_path_keep_a_whole_hash() {
        let store = Arc::new(InMemoryHashStore::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let body = format!("content-{}", worker);
                    for _ in 0..50 {
                        store.record_write("/shared", body.as_bytes());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let matches = (0..8)
            .filter(|w| !store.should_write("/shared", format!("content-{}", w).as_bytes()))
            .count();
        assert_eq!(matches, 1);
    }
}
