//! Artifact sink backed by a local directory.
//!
//! Logical paths (`/docs/setup.llm.md`) map under the output root. Files
//! are written to a temporary sibling and renamed into place, so a reader
//! serving the directory never sees a half-written artifact.

use anyhow::{bail, Context, Result};
use arw_core::sink::ArtifactSink;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a logical path to a file under the root.
    pub fn resolve(&self, logical: &str) -> Result<PathBuf> {
        let relative = Path::new(logical.trim_start_matches('/'));
        if relative.as_os_str().is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            bail!("artifact path escapes the output directory: {}", logical);
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ArtifactSink for FsSink {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let mut tmp = target.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, bytes)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &target)
            .await
            .with_context(|| format!("Failed to move {} into place", target.display()))?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let target = self.resolve(path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to delete {}", target.display())),
        }
    }
}
