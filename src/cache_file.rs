//! JSON persistence for the build's hash store.
//!
//! The file is a snapshot of [`HashStore::entries`]. It is only a write
//! cache, so a missing, unreadable, or corrupt file loads as an empty store
//! and the next build simply writes every artifact.

use anyhow::{Context, Result};
use arw_core::hash_store::{HashStore, InMemoryHashStore};
use arw_core::models::CacheEntry;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    entries: Vec<CacheEntry>,
}

pub fn load(path: &Path) -> InMemoryHashStore {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no hash store file, starting cold");
            return InMemoryHashStore::new();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable hash store file, starting cold");
            return InMemoryHashStore::new();
        }
    };

    match serde_json::from_str::<CacheFile>(&raw) {
        Ok(file) if file.version == FORMAT_VERSION => {
            debug!(path = %path.display(), entries = file.entries.len(), "loaded hash store");
            InMemoryHashStore::from_entries(file.entries)
        }
        Ok(file) => {
            warn!(path = %path.display(), version = file.version, "unsupported hash store version, starting cold");
            InMemoryHashStore::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt hash store file, starting cold");
            InMemoryHashStore::new()
        }
    }
}

/// Write a snapshot of `store` to `path` atomically.
pub fn save(path: &Path, store: &dyn HashStore) -> Result<()> {
    let file = CacheFile {
        version: FORMAT_VERSION,
        entries: store.entries(),
    };
    let json = serde_json::to_string_pretty(&file)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_keeps_cache_warm() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/cache.json");

        let store = InMemoryHashStore::new();
        store.record_write("/a.llm.md", b"alpha");
        store.record_write("/llms.txt", b"legacy");
        save(&path, &store).unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.len(), 2);
        assert!(!loaded.should_write("/a.llm.md", b"alpha"));
        assert!(loaded.should_write("/a.llm.md", b"changed"));
        assert_eq!(loaded.entries(), store.entries());
    }

    #[test]
    fn test_missing_and_corrupt_files_start_cold() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("absent.json")).is_empty());

        let corrupt = dir.path().join("corrupt.json");
        std::fs::write(&corrupt, "{ not json").unwrap();
        assert!(load(&corrupt).is_empty());

        let future = dir.path().join("future.json");
        std::fs::write(&future, r#"{"version": 99, "entries": []}"#).unwrap();
        assert!(load(&future).is_empty());
    }
}
