//! Build pipeline orchestration.
//!
//! ```text
//! scan ─▶ prepare (parallel) ─▶ assemble ─▶ validate ─▶ publish ─▶ prune
//!          one task per source    join      gate        sink +     stale
//!          under a semaphore      point                 hash store artifacts
//! ```
//!
//! Content errors omit a single source and the build continues. A
//! validation error or format divergence stops the build before anything
//! is written, so the previously published manifest stays live.

use anyhow::Context;
use arw_core::error::{BuildError, ContentError};
use arw_core::hash_store::HashStore;
use arw_core::manifest::{BuildOutput, ManifestBuilder, PreparedSource};
use arw_core::models::{ContentSource, EnrichmentMap};
use arw_core::sink::{publish, ArtifactSink};
use arw_core::validate::{has_errors, validate, ValidationError};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::cache_file;
use crate::config::Config;
use crate::connector_fs;
use crate::fs_sink::FsSink;

/// Why a build did not publish.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The assembled manifest has error-severity findings.
    #[error("manifest failed validation with {} error(s)", .0.iter().filter(|f| f.is_error()).count())]
    Content(Vec<ValidationError>),

    /// The manifest could not be rendered identically in every format.
    #[error(transparent)]
    Consistency(#[from] BuildError),

    /// The configuration cannot drive a build.
    #[error("{0:#}")]
    Config(anyhow::Error),

    /// A chunking worker panicked or was cancelled. Retrying will not help.
    #[error("chunking worker failed: {0}")]
    Worker(String),

    /// Reading sources or writing artifacts failed; retrying may succeed.
    #[error("{0:#}")]
    Io(#[from] anyhow::Error),
}

impl PipelineError {
    /// Process exit status for this failure.
    ///
    /// | Code | Meaning |
    /// |------|---------|
    /// | 1 | configuration, or a failed chunking worker |
    /// | 2 | content defect, fix the source |
    /// | 3 | transient I/O, retry |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Worker(_) => 1,
            Self::Content(_) | Self::Consistency(_) => 2,
            Self::Io(_) => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Run every check and report planned writes without touching the sink.
    pub dry_run: bool,
    pub prune: bool,
}

/// What a build did.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub sources: usize,
    pub entries: usize,
    pub content_errors: Vec<ContentError>,
    /// Warning-severity validation findings. Never blocking.
    pub warnings: Vec<ValidationError>,
    /// Paths written, or that would be written in a dry run.
    pub written: Vec<String>,
    pub unchanged: usize,
    /// Paths deleted as stale, or that would be deleted in a dry run.
    pub pruned: Vec<String>,
    pub dry_run: bool,
}

/// Build the site described by `config` into `output.dir`.
///
/// Loads and persists the hash store around the run. A failed publish
/// still persists the writes that did land.
pub async fn build_site(config: &Config, options: BuildOptions) -> Result<BuildReport, PipelineError> {
    let site = config.require_site().map_err(PipelineError::Config)?;
    let content = config.require_content().map_err(PipelineError::Config)?;

    let mut builder = ManifestBuilder::new(site)
        .with_version(&config.manifest.version)
        .with_profile(&config.manifest.profile);
    if let Some(path) = &config.build.enrichment {
        builder = builder.with_enrichment(load_enrichment(path).map_err(PipelineError::Config)?);
    }

    let sources = connector_fs::scan_content(content)?;
    info!(sources = sources.len(), root = %content.root.display(), "scanned content");

    let cache_path = config.output.cache_path();
    let cache = Arc::new(cache_file::load(&cache_path));
    let sink = FsSink::new(&config.output.dir);

    let result = run_build(
        Arc::new(builder),
        sources,
        cache.clone(),
        &sink,
        config.build.effective_workers(),
        options,
    )
    .await;

    let published_any = match &result {
        Ok(report) => !report.dry_run,
        Err(PipelineError::Io(_)) => true,
        Err(_) => false,
    };
    if published_any {
        cache_file::save(&cache_path, cache.as_ref())?;
        debug!(path = %cache_path.display(), "saved hash store");
    }

    result
}

/// Run one build against an explicit hash store and sink.
pub async fn run_build(
    builder: Arc<ManifestBuilder>,
    sources: Vec<ContentSource>,
    cache: Arc<dyn HashStore>,
    sink: &dyn ArtifactSink,
    workers: usize,
    options: BuildOptions,
) -> Result<BuildReport, PipelineError> {
    let started = Instant::now();
    let source_count = sources.len();

    let prepared = prepare_all(builder.clone(), sources, cache.clone(), workers).await?;
    let output = builder.assemble(prepared, cache.as_ref())?;
    for e in &output.content_errors {
        warn!(source_id = %e.source_id(), "{}", e);
    }

    let findings = gate(&output)?;
    for f in &findings {
        warn!("{}", f);
    }

    let mut report = BuildReport {
        sources: source_count,
        entries: output.manifest.content.len(),
        content_errors: output.content_errors.clone(),
        warnings: findings,
        written: output.writes.iter().map(|w| w.path.clone()).collect(),
        unchanged: output.artifacts.len() - output.writes.len(),
        pruned: Vec::new(),
        dry_run: options.dry_run,
    };

    if options.dry_run {
        if options.prune {
            report.pruned = cache.stale_entries(&output.artifacts);
        }
        info!(planned = report.written.len(), "dry run, nothing written");
        return Ok(report);
    }

    publish(&output.writes, sink, cache.as_ref())
        .await
        .context("publishing artifacts")?;
    info!(written = report.written.len(), unchanged = report.unchanged, "published");

    if options.prune {
        for path in cache.stale_entries(&output.artifacts) {
            sink.delete(&path)
                .await
                .with_context(|| format!("deleting stale artifact {}", path))?;
            cache.forget(&path);
            report.pruned.push(path);
        }
    }

    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        pruned = report.pruned.len(),
        "build complete"
    );
    Ok(report)
}

/// Phase one across every source, at most `workers` at a time.
///
/// Chunking is CPU-bound, so each source runs on the blocking pool.
async fn prepare_all(
    builder: Arc<ManifestBuilder>,
    sources: Vec<ContentSource>,
    cache: Arc<dyn HashStore>,
    workers: usize,
) -> Result<Vec<Result<PreparedSource, ContentError>>, PipelineError> {
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut set = JoinSet::new();

    for source in sources {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| PipelineError::Worker(e.to_string()))?;
        let builder = builder.clone();
        let cache = cache.clone();
        set.spawn_blocking(move || {
            let _permit = permit;
            builder.prepare_source(&source, cache.as_ref())
        });
    }

    let mut prepared = Vec::new();
    while let Some(joined) = set.join_next().await {
        prepared.push(joined.map_err(|e| PipelineError::Worker(e.to_string()))?);
    }
    Ok(prepared)
}

/// Validate against the artifact set this build will leave behind.
/// Returns the non-blocking findings.
fn gate(output: &BuildOutput) -> Result<Vec<ValidationError>, PipelineError> {
    let artifacts: HashSet<&str> = output.artifacts.iter().map(String::as_str).collect();
    let findings = validate(&output.manifest, &|path: &str| artifacts.contains(path));
    if has_errors(&findings) {
        return Err(PipelineError::Content(findings));
    }
    Ok(findings)
}

/// Read an enrichment map from a JSON file.
pub fn load_enrichment(path: &Path) -> anyhow::Result<EnrichmentMap> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read enrichment file: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse enrichment file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arw_core::hash_store::InMemoryHashStore;
    use arw_core::manifest::{LEGACY_PATH, WELL_KNOWN_PATH};
    use arw_core::models::{Block, Site};
    use arw_core::sink::MemorySink;

    fn builder() -> Arc<ManifestBuilder> {
        Arc::new(ManifestBuilder::new(Site::new(
            "Example",
            "https://example.com",
            "ops@example.com",
        )))
    }

    fn pages(n: usize) -> Vec<ContentSource> {
        (0..n)
            .map(|i| {
                ContentSource::new(
                    format!("page-{:03}", i),
                    format!("/page/{:03}", i),
                    vec![Block::heading(2, "Setup"), Block::text(format!("Body {}.", i))],
                )
            })
            .collect()
    }

    fn options() -> BuildOptions {
        BuildOptions {
            dry_run: false,
            prune: true,
        }
    }

    #[tokio::test]
    async fn test_parallel_build_matches_sequential() {
        let sources = pages(40);
        let sequential = builder().build(&sources, &InMemoryHashStore::new()).unwrap();

        let sink = MemorySink::new();
        let cache: Arc<dyn HashStore> = Arc::new(InMemoryHashStore::new());
        let report = run_build(builder(), sources, cache, &sink, 4, options())
            .await
            .unwrap();

        assert_eq!(report.entries, 40);
        assert_eq!(report.written.len(), 42);
        assert_eq!(
            sink.get(WELL_KNOWN_PATH),
            Some(sequential.manifest_json.into_bytes())
        );
        assert_eq!(
            sink.get(LEGACY_PATH),
            Some(sequential.manifest_yaml.into_bytes())
        );
    }

    #[tokio::test]
    async fn test_second_build_is_noop() {
        let sink = MemorySink::new();
        let cache: Arc<dyn HashStore> = Arc::new(InMemoryHashStore::new());
        run_build(builder(), pages(3), cache.clone(), &sink, 2, options())
            .await
            .unwrap();
        let second = run_build(builder(), pages(3), cache, &sink, 2, options())
            .await
            .unwrap();
        assert!(second.written.is_empty());
        assert_eq!(second.unchanged, 5);
        assert!(second.pruned.is_empty());
    }

    #[tokio::test]
    async fn test_removed_source_is_pruned() {
        let sink = MemorySink::new();
        let cache: Arc<dyn HashStore> = Arc::new(InMemoryHashStore::new());
        run_build(builder(), pages(3), cache.clone(), &sink, 2, options())
            .await
            .unwrap();

        let report = run_build(builder(), pages(2), cache.clone(), &sink, 2, options())
            .await
            .unwrap();
        assert_eq!(report.pruned, vec!["/page/002.llm.md".to_string()]);
        assert_eq!(sink.get("/page/002.llm.md"), None);
        assert!(cache.stale_entries(&[]).iter().all(|p| p != "/page/002.llm.md"));
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let sink = MemorySink::new();
        let cache: Arc<dyn HashStore> = Arc::new(InMemoryHashStore::new());
        let report = run_build(
            builder(),
            pages(2),
            cache.clone(),
            &sink,
            2,
            BuildOptions {
                dry_run: true,
                prune: true,
            },
        )
        .await
        .unwrap();
        assert_eq!(report.written.len(), 4);
        assert!(sink.paths().is_empty());
        assert!(cache.entries().is_empty());
    }

    #[tokio::test]
    async fn test_validation_error_blocks_publish() {
        let sink = MemorySink::new();
        let cache: Arc<dyn HashStore> = Arc::new(InMemoryHashStore::new());
        let no_contact = Arc::new(ManifestBuilder::new(Site::new(
            "Example",
            "https://example.com",
            "",
        )));
        let err = run_build(no_contact, pages(2), cache.clone(), &sink, 2, options())
            .await
            .unwrap_err();

        assert_eq!(err.exit_code(), 2);
        match err {
            PipelineError::Content(findings) => {
                assert!(findings.iter().any(|f| f.field == "site.contact"))
            }
            other => panic!("expected content error, got {:?}", other),
        }
        assert!(sink.paths().is_empty());
        assert!(cache.entries().is_empty());
    }

    #[tokio::test]
    async fn test_content_errors_degrade() {
        let mut sources = pages(2);
        sources.push(ContentSource::new("bad", "", vec![]));
        let sink = MemorySink::new();
        let cache: Arc<dyn HashStore> = Arc::new(InMemoryHashStore::new());
        let report = run_build(builder(), sources, cache, &sink, 2, options())
            .await
            .unwrap();
        assert_eq!(report.sources, 3);
        assert_eq!(report.entries, 2);
        assert_eq!(report.content_errors.len(), 1);
        assert!(sink.get(WELL_KNOWN_PATH).is_some());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(PipelineError::Config(anyhow::anyhow!("x")).exit_code(), 1);
        assert_eq!(
            PipelineError::Consistency(BuildError::Consistency {
                path: "$".to_string(),
                detail: "x".to_string()
            })
            .exit_code(),
            2
        );
        assert_eq!(PipelineError::Worker("x".to_string()).exit_code(), 1);
        assert_eq!(PipelineError::Io(anyhow::anyhow!("x")).exit_code(), 3);
    }

    /// Fails every lookup, as a buggy store would.
    struct PanickingStore;

    impl HashStore for PanickingStore {
        fn should_write(&self, _path: &str, _content: &[u8]) -> bool {
            panic!("store lookup failed")
        }
        fn record_write(&self, _path: &str, _content: &[u8]) {}
        fn stale_entries(&self, _valid_paths: &[String]) -> Vec<String> {
            Vec::new()
        }
        fn forget(&self, _path: &str) {}
        fn entries(&self) -> Vec<arw_core::models::CacheEntry> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn test_worker_panic_is_not_retryable() {
        let sink = MemorySink::new();
        let cache: Arc<dyn HashStore> = Arc::new(PanickingStore);
        let err = run_build(builder(), pages(2), cache, &sink, 2, options())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Worker(_)), "got {:?}", err);
        assert_eq!(err.exit_code(), 1);
        assert!(sink.paths().is_empty());
    }

    #[test]
    fn test_load_enrichment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enrichment.json");
        std::fs::write(
            &path,
            r#"{"guide#setup": {"topics": ["install"], "sentiment": "neutral"}}"#,
        )
        .unwrap();
        let map = load_enrichment(&path).unwrap();
        assert_eq!(map["guide#setup"].topics, vec!["install".to_string()]);
        assert!(load_enrichment(&dir.path().join("missing.json")).is_err());
    }
}
