//! Storage-agnostic artifact output.
//!
//! The pipeline writes every artifact through an [`ArtifactSink`], so the
//! same build can target a local directory, an object store, or memory.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use anyhow::Result;
use async_trait::async_trait;

use crate::hash_store::HashStore;
use crate::models::WriteOp;

/// Key-value destination for built artifacts.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Store `bytes` under the logical `path`, replacing any previous value.
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<()>;

    /// Remove the artifact at `path`. Removing a missing path is not an error.
    async fn delete(&self, path: &str) -> Result<()>;
}

/// In-memory sink for tests and embedding.
#[derive(Default)]
pub struct MemorySink {
    artifacts: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.artifacts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    pub fn paths(&self) -> Vec<String> {
        self.artifacts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ArtifactSink for MemorySink {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<()> {
        self.artifacts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.artifacts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path);
        Ok(())
    }
}

/// Write every op in order and record each one in the hash store once it
/// has been stored.
///
/// Stops at the first failed write. Ops written before the failure stay
/// recorded; the failed op and everything after it stay unrecorded, so the
/// next build retries them.
pub async fn publish(
    writes: &[WriteOp],
    sink: &dyn ArtifactSink,
    cache: &dyn HashStore,
) -> Result<usize> {
    for op in writes {
        sink.put(&op.path, &op.content).await?;
        cache.record_write(&op.path, &op.content);
    }
    Ok(writes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_store::InMemoryHashStore;

    struct FailingSink;

    #[async_trait]
    impl ArtifactSink for FailingSink {
        async fn put(&self, path: &str, _bytes: &[u8]) -> Result<()> {
            if path == "/b" {
                anyhow::bail!("disk full");
            }
            Ok(())
        }

        async fn delete(&self, _path: &str) -> Result<()> {
            Ok(())
        }
    }

    fn op(path: &str, content: &str) -> WriteOp {
        WriteOp {
            path: path.to_string(),
            content: content.as_bytes().to_vec(),
        }
    }

    #[tokio::test]
    async fn test_publish_writes_and_records() {
        let sink = MemorySink::new();
        let cache = InMemoryHashStore::new();
        let n = publish(&[op("/a", "1"), op("/b", "2")], &sink, &cache)
            .await
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(sink.get("/a"), Some(b"1".to_vec()));
        assert!(!cache.should_write("/b", b"2"));
    }

    #[tokio::test]
    async fn test_failed_write_is_not_recorded() {
        let cache = InMemoryHashStore::new();
        let result = publish(&[op("/a", "1"), op("/b", "2"), op("/c", "3")], &FailingSink, &cache).await;
        assert!(result.is_err());
        assert!(!cache.should_write("/a", b"1"));
        assert!(cache.should_write("/b", b"2"));
        assert!(cache.should_write("/c", b"3"));
    }

    #[tokio::test]
    async fn test_memory_sink_delete() {
        let sink = MemorySink::new();
        sink.put("/a", b"x").await.unwrap();
        sink.delete("/a").await.unwrap();
        sink.delete("/missing").await.unwrap();
        assert!(sink.paths().is_empty());
    }
}
