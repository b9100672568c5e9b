//! Manifest assembly, rendering, and multi-format consistency.
//!
//! [`ManifestBuilder`] turns a set of [`ContentSource`]s into a [`Manifest`]
//! plus the minimal list of [`WriteOp`]s needed to bring published artifacts
//! up to date.
//!
//! The build is split into two phases so drivers can parallelize the first:
//!
//! 1. [`ManifestBuilder::prepare_source`] — per source: chunk, render the
//!    machine view, consult the hash store, build the entry. Independent
//!    across sources.
//! 2. [`ManifestBuilder::assemble`] — join point: drop duplicate sources and
//!    machine-view collisions, sort entries by `(priority, url)`, serialize
//!    to JSON and YAML, and require both formats to decode to identical data.
//!
//! A failure in phase 1 only omits that source (reported as a
//! [`ContentError`]). A format divergence in phase 2 aborts the build.
//!
//! The builder only reads the hash store. Recording happens once the writes
//! have actually been stored (see [`crate::sink::publish`]), so a build that
//! is blocked before publishing leaves the cache untouched.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde_json::Value;

use crate::chunk::{chunk, ROOT_CHUNK_ID};
use crate::error::{BuildError, ContentError, ManifestParseError};
use crate::hash_store::HashStore;
use crate::models::{
    Chunk, ChunkRef, ContentSource, EnrichmentMap, Manifest, ManifestEntry, Site, WriteOp,
};

/// Canonical discovery location, probed first by agents.
pub const WELL_KNOWN_PATH: &str = "/.well-known/arw-manifest.json";

/// Plain-text fallback location, carrying the YAML rendering.
pub const LEGACY_PATH: &str = "/llms.txt";

pub const DEFAULT_VERSION: &str = "1.0";
pub const DEFAULT_PROFILE: &str = "ARW-1";

/// Phase-one result for a single source.
#[derive(Debug, Clone)]
pub struct PreparedSource {
    pub source_id: String,
    pub entry: ManifestEntry,
    pub machine_view: WriteOp,
    /// Whether the hash store reported the machine view as changed.
    pub changed: bool,
}

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub manifest: Manifest,
    /// Artifacts whose content changed: machine views first, manifests last.
    pub writes: Vec<WriteOp>,
    /// Every artifact path this build produced, changed or not, sorted.
    pub artifacts: Vec<String>,
    /// Sources omitted from the manifest.
    pub content_errors: Vec<ContentError>,
    pub manifest_json: String,
    pub manifest_yaml: String,
}

impl BuildOutput {
    /// Record every write as done without going through a sink.
    pub fn commit(&self, cache: &dyn HashStore) {
        for op in &self.writes {
            cache.record_write(&op.path, &op.content);
        }
    }

    pub fn is_noop(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Builds manifests for one site.
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    site: Site,
    version: String,
    profile: String,
    enrichment: EnrichmentMap,
}

impl ManifestBuilder {
    pub fn new(site: Site) -> Self {
        Self {
            site,
            version: DEFAULT_VERSION.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            enrichment: EnrichmentMap::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    pub fn with_enrichment(mut self, enrichment: EnrichmentMap) -> Self {
        self.enrichment = enrichment;
        self
    }

    /// Run both phases sequentially.
    pub fn build(
        &self,
        sources: &[ContentSource],
        cache: &dyn HashStore,
    ) -> Result<BuildOutput, BuildError> {
        let prepared = sources
            .iter()
            .map(|source| self.prepare_source(source, cache))
            .collect();
        self.assemble(prepared, cache)
    }

    /// Phase one for a single source.
    pub fn prepare_source(
        &self,
        source: &ContentSource,
        cache: &dyn HashStore,
    ) -> Result<PreparedSource, ContentError> {
        if source.url.trim().is_empty() {
            return Err(ContentError::EmptyUrl {
                source_id: source.source_id.clone(),
            });
        }
        let path = machine_view_path(&source.url).ok_or_else(|| ContentError::InvalidUrl {
            source_id: source.source_id.clone(),
            url: source.url.clone(),
        })?;

        let chunks = chunk(source)?;
        let rendered = render_machine_view(&chunks);
        let changed = cache.should_write(&path, rendered.as_bytes());

        let entry = ManifestEntry {
            url: source.url.clone(),
            machine_view: path.clone(),
            purpose: source.purpose.clone(),
            priority: source.priority.clone(),
            chunks: chunks
                .iter()
                .filter(|c| !c.is_root() || c.byte_size > 0)
                .map(|c| self.chunk_ref(&source.source_id, c))
                .collect(),
            last_modified: source.last_modified,
            extra: BTreeMap::new(),
        };

        Ok(PreparedSource {
            source_id: source.source_id.clone(),
            entry,
            machine_view: WriteOp {
                path,
                content: rendered.into_bytes(),
            },
            changed,
        })
    }

    /// Phase two: the join point after every source has been prepared.
    pub fn assemble(
        &self,
        prepared: Vec<Result<PreparedSource, ContentError>>,
        cache: &dyn HashStore,
    ) -> Result<BuildOutput, BuildError> {
        let mut content_errors = Vec::new();
        let mut accepted = Vec::with_capacity(prepared.len());
        for result in prepared {
            match result {
                Ok(p) => accepted.push(p),
                Err(e) => content_errors.push(e),
            }
        }
        accepted.sort_by(|a, b| a.source_id.cmp(&b.source_id));

        let mut seen_sources = HashSet::new();
        let mut view_owners: HashMap<String, String> = HashMap::new();
        let mut entries = Vec::with_capacity(accepted.len());
        let mut writes = Vec::new();
        let mut artifacts = Vec::new();

        for p in accepted {
            if !seen_sources.insert(p.source_id.clone()) {
                content_errors.push(ContentError::DuplicateSource {
                    source_id: p.source_id,
                });
                continue;
            }
            if let Some(other) = view_owners.get(&p.machine_view.path) {
                content_errors.push(ContentError::MachineViewCollision {
                    source_id: p.source_id,
                    path: p.machine_view.path,
                    other: other.clone(),
                });
                continue;
            }
            view_owners.insert(p.machine_view.path.clone(), p.source_id.clone());

            artifacts.push(p.machine_view.path.clone());
            if p.changed {
                writes.push(p.machine_view);
            }
            entries.push(p.entry);
        }
        content_errors.sort_by(|a, b| a.source_id().cmp(b.source_id()));

        entries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        writes.sort_by(|a, b| a.path.cmp(&b.path));

        let manifest = Manifest {
            version: self.version.clone(),
            profile: self.profile.clone(),
            site: self.site.clone(),
            content: entries,
            extra: BTreeMap::new(),
        };

        let manifest_json = render_json(&manifest)?;
        let manifest_yaml = render_yaml(&manifest)?;
        check_consistency(&manifest_json, &manifest_yaml)?;

        for (path, body) in [(WELL_KNOWN_PATH, &manifest_json), (LEGACY_PATH, &manifest_yaml)] {
            artifacts.push(path.to_string());
            if cache.should_write(path, body.as_bytes()) {
                writes.push(WriteOp {
                    path: path.to_string(),
                    content: body.as_bytes().to_vec(),
                });
            }
        }
        artifacts.sort();

        Ok(BuildOutput {
            manifest,
            writes,
            artifacts,
            content_errors,
            manifest_json,
            manifest_yaml,
        })
    }

    fn chunk_ref(&self, source_id: &str, c: &Chunk) -> ChunkRef {
        let enrichment = self
            .enrichment
            .get(&format!("{}#{}", source_id, c.id))
            .or_else(|| self.enrichment.get(&c.id));

        ChunkRef {
            id: c.id.clone(),
            heading: c.heading.clone(),
            byte_size: c.byte_size,
            parent: c.parent_id.clone().filter(|p| p != ROOT_CHUNK_ID),
            machine_view: None,
            topics: enrichment.map(|e| e.topics.clone()).unwrap_or_default(),
            sentiment: enrichment.and_then(|e| e.sentiment.clone()),
        }
    }
}

/// Map a page URL to its machine-view artifact path.
///
/// `/` → `/index.llm.md`, `/docs/setup` → `/docs/setup.llm.md`,
/// `/docs/` → `/docs/index.llm.md`, `/a/page.html` → `/a/page.llm.md`.
/// Absolute http(s) URLs use their path. Anything else is rejected.
pub fn machine_view_path(url: &str) -> Option<String> {
    let url = url.trim();
    let path = if let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    {
        match rest.find('/') {
            Some(i) => &rest[i..],
            None => "/",
        }
    } else if url.starts_with('/') {
        url
    } else {
        return None;
    };
    let path = path.split(|c| c == '?' || c == '#').next().unwrap_or("/");

    if path.is_empty() || path.ends_with('/') {
        return Some(format!("{}index.llm.md", if path.is_empty() { "/" } else { path }));
    }

    let stem = match path.rsplit_once('/') {
        Some((dir, last)) => match last.rsplit_once('.') {
            Some((name, "html" | "htm" | "md")) if !name.is_empty() => format!("{}/{}", dir, name),
            _ => path.to_string(),
        },
        None => path.to_string(),
    };
    Some(format!("{}.llm.md", stem))
}

/// Render the Markdown machine view with a `<!-- chunk: id -->` marker
/// before every chunk. An empty page root is omitted.
pub fn render_machine_view(chunks: &[Chunk]) -> String {
    let mut out = String::new();
    for c in chunks {
        if c.is_root() && c.text.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("<!-- chunk: {} -->\n", c.id));
        if !c.is_root() {
            out.push_str(&format!("{} {}\n", "#".repeat(c.level as usize), c.heading));
            if !c.text.is_empty() {
                out.push('\n');
            }
        }
        if !c.text.is_empty() {
            out.push_str(&c.text);
            out.push('\n');
        }
    }
    out
}

pub fn render_json(manifest: &Manifest) -> Result<String, BuildError> {
    let mut json = serde_json::to_string_pretty(manifest).map_err(|e| BuildError::Serialize {
        action: "encode",
        format: "json",
        message: e.to_string(),
    })?;
    json.push('\n');
    Ok(json)
}

pub fn render_yaml(manifest: &Manifest) -> Result<String, BuildError> {
    serde_yaml::to_string(manifest).map_err(|e| BuildError::Serialize {
        action: "encode",
        format: "yaml",
        message: e.to_string(),
    })
}

/// Decode both renderings and require field-for-field equality.
pub fn check_consistency(json: &str, yaml: &str) -> Result<(), BuildError> {
    let from_json: Value = serde_json::from_str(json).map_err(|e| BuildError::Serialize {
        action: "decode",
        format: "json",
        message: e.to_string(),
    })?;
    let from_yaml: Value = serde_yaml::from_str(yaml).map_err(|e| BuildError::Serialize {
        action: "decode",
        format: "yaml",
        message: e.to_string(),
    })?;

    match first_difference(&from_json, &from_yaml, "$") {
        None => Ok(()),
        Some((path, detail)) => Err(BuildError::Consistency { path, detail }),
    }
}

fn first_difference(a: &Value, b: &Value, path: &str) -> Option<(String, String)> {
    match (a, b) {
        (Value::Object(left), Value::Object(right)) => {
            let keys: BTreeSet<&String> = left.keys().chain(right.keys()).collect();
            for key in keys {
                let child = format!("{}.{}", path, key);
                match (left.get(key), right.get(key)) {
                    (Some(l), Some(r)) => {
                        if let Some(diff) = first_difference(l, r, &child) {
                            return Some(diff);
                        }
                    }
                    (Some(_), None) => return Some((child, "missing from yaml".to_string())),
                    (None, _) => return Some((child, "missing from json".to_string())),
                }
            }
            None
        }
        (Value::Array(left), Value::Array(right)) => {
            if left.len() != right.len() {
                return Some((
                    path.to_string(),
                    format!("{} items vs {} items", left.len(), right.len()),
                ));
            }
            left.iter()
                .zip(right)
                .enumerate()
                .find_map(|(i, (l, r))| first_difference(l, r, &format!("{}[{}]", path, i)))
        }
        _ if a == b => None,
        _ => Some((path.to_string(), format!("{} vs {}", a, b))),
    }
}

/// Decode a manifest served as JSON.
pub fn parse_json(body: &str) -> Result<Manifest, ManifestParseError> {
    serde_json::from_str(body).map_err(|e| ManifestParseError::Json(e.to_string()))
}

/// Decode a plain-text manifest: JSON if it parses as JSON, otherwise YAML.
pub fn parse_text(body: &str) -> Result<Manifest, ManifestParseError> {
    serde_json::from_str(body)
        .or_else(|_| serde_yaml::from_str(body))
        .map_err(|e| ManifestParseError::Text(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_store::InMemoryHashStore;
    use crate::models::{Block, ChunkEnrichment, Priority, Purpose};

    fn site() -> Site {
        Site::new("Example", "https://example.com", "ops@example.com")
    }

    fn builder() -> ManifestBuilder {
        ManifestBuilder::new(site())
    }

    fn page(id: &str, url: &str, headings: &[&str]) -> ContentSource {
        let mut blocks = Vec::new();
        for h in headings {
            blocks.push(Block::heading(2, *h));
            blocks.push(Block::text(format!("About {}.", h)));
        }
        ContentSource::new(id, url, blocks)
    }

    fn chunk_ids(entry: &ManifestEntry) -> Vec<&str> {
        entry.chunks.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_two_source_example() {
        let sources = vec![
            page("b", "/b", &["Setup"]),
            page("a", "/a", &["Setup", "Setup"]),
        ];
        let out = builder().build(&sources, &InMemoryHashStore::new()).unwrap();
        let content = &out.manifest.content;
        assert_eq!(content[0].url, "/a");
        assert_eq!(chunk_ids(&content[0]), vec!["setup", "setup-2"]);
        assert_eq!(content[1].url, "/b");
        assert_eq!(chunk_ids(&content[1]), vec!["setup"]);
        assert!(out.content_errors.is_empty());
    }

    #[test]
    fn test_sort_by_priority_then_url() {
        let sources = vec![
            page("1", "/z", &[]).with_priority(Priority::Low),
            page("2", "/m", &[]),
            page("3", "/b", &[]).with_priority(Priority::High),
            page("4", "/a", &[]),
            page("5", "/c", &[]).with_priority(Priority::High),
        ];
        let out = builder().build(&sources, &InMemoryHashStore::new()).unwrap();
        let urls: Vec<&str> = out.manifest.content.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["/b", "/c", "/a", "/m", "/z"]);
    }

    #[test]
    fn test_order_independent_of_input() {
        let mut sources = vec![
            page("a", "/a", &["One"]),
            page("b", "/b", &["Two"]),
            page("c", "/c", &["Three"]),
        ];
        let first = builder().build(&sources, &InMemoryHashStore::new()).unwrap();
        sources.reverse();
        let second = builder().build(&sources, &InMemoryHashStore::new()).unwrap();
        assert_eq!(first.manifest_json, second.manifest_json);
        assert_eq!(first.manifest_yaml, second.manifest_yaml);
    }

    #[test]
    fn test_cold_cache_writes_everything() {
        let sources = vec![page("a", "/a", &["One"]), page("b", "/docs/", &["Two"])];
        let out = builder().build(&sources, &InMemoryHashStore::new()).unwrap();
        let paths: Vec<&str> = out.writes.iter().map(|w| w.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["/a.llm.md", "/docs/index.llm.md", WELL_KNOWN_PATH, LEGACY_PATH]
        );
        assert_eq!(out.artifacts.len(), 4);
    }

    #[test]
    fn test_warm_cache_is_noop() {
        let cache = InMemoryHashStore::new();
        let sources = vec![page("a", "/a", &["One"]), page("b", "/b", &["Two"])];
        let first = builder().build(&sources, &cache).unwrap();
        first.commit(&cache);

        let second = builder().build(&sources, &cache).unwrap();
        assert!(second.is_noop());
        assert_eq!(second.artifacts, first.artifacts);
    }

    #[test]
    fn test_single_change_rewrites_view_and_manifests() {
        let cache = InMemoryHashStore::new();
        let mut sources = vec![page("a", "/a", &["One"]), page("b", "/b", &["Two"])];
        builder().build(&sources, &cache).unwrap().commit(&cache);

        sources[1].blocks.push(Block::text("More."));
        let out = builder().build(&sources, &cache).unwrap();
        let paths: Vec<&str> = out.writes.iter().map(|w| w.path.as_str()).collect();
        assert_eq!(paths, vec!["/b.llm.md", WELL_KNOWN_PATH, LEGACY_PATH]);
    }

    #[test]
    fn test_metadata_change_rewrites_only_manifests() {
        let cache = InMemoryHashStore::new();
        let sources = vec![page("a", "/a", &["One"])];
        builder().build(&sources, &cache).unwrap().commit(&cache);

        let out = builder()
            .with_version("1.1")
            .build(&sources, &cache)
            .unwrap();
        let paths: Vec<&str> = out.writes.iter().map(|w| w.path.as_str()).collect();
        assert_eq!(paths, vec![WELL_KNOWN_PATH, LEGACY_PATH]);
    }

    #[test]
    fn test_removed_source_is_stale() {
        let cache = InMemoryHashStore::new();
        let sources = vec![page("a", "/a", &[]), page("b", "/b", &[])];
        builder().build(&sources, &cache).unwrap().commit(&cache);

        let out = builder().build(&sources[..1], &cache).unwrap();
        assert_eq!(cache.stale_entries(&out.artifacts), vec!["/b.llm.md".to_string()]);
    }

    #[test]
    fn test_content_errors_omit_source_only() {
        let bad = ContentSource::new("bad", "/bad", vec![Block::heading(9, "Too deep")]);
        let empty_url = ContentSource::new("nourl", "", vec![]);
        let relative = ContentSource::new("rel", "docs/x", vec![]);
        let sources = vec![page("good", "/good", &["Fine"]), bad, empty_url, relative];
        let out = builder().build(&sources, &InMemoryHashStore::new()).unwrap();

        assert_eq!(out.manifest.content.len(), 1);
        let failed: Vec<&str> = out.content_errors.iter().map(|e| e.source_id()).collect();
        assert_eq!(failed, vec!["bad", "nourl", "rel"]);
    }

    #[test]
    fn test_duplicate_source_and_view_collision() {
        let sources = vec![
            page("a", "/a", &[]),
            page("a", "/other", &[]),
            page("c", "https://example.com/a", &[]),
        ];
        let out = builder().build(&sources, &InMemoryHashStore::new()).unwrap();
        assert_eq!(out.manifest.content.len(), 1);
        assert!(matches!(
            out.content_errors[0],
            ContentError::DuplicateSource { .. }
        ));
        assert!(matches!(
            &out.content_errors[1],
            ContentError::MachineViewCollision { other, .. } if other == "a"
        ));
    }

    #[test]
    fn test_enrichment_merges_into_chunks() {
        let mut enrichment = EnrichmentMap::new();
        enrichment.insert(
            "a#setup".to_string(),
            ChunkEnrichment {
                topics: vec!["install".to_string()],
                sentiment: Some("neutral".to_string()),
            },
        );
        enrichment.insert(
            "usage".to_string(),
            ChunkEnrichment {
                topics: vec!["cli".to_string()],
                sentiment: None,
            },
        );
        let sources = vec![page("a", "/a", &["Setup", "Usage"]), page("b", "/b", &["Setup"])];
        let plain = builder().build(&sources, &InMemoryHashStore::new()).unwrap();
        let enriched = builder()
            .with_enrichment(enrichment)
            .build(&sources, &InMemoryHashStore::new())
            .unwrap();

        let a = &enriched.manifest.content[0];
        assert_eq!(a.chunks[0].topics, vec!["install".to_string()]);
        assert_eq!(a.chunks[0].sentiment.as_deref(), Some("neutral"));
        assert_eq!(a.chunks[1].topics, vec!["cli".to_string()]);
        assert!(enriched.manifest.content[1].chunks[0].topics.is_empty());

        // Enrichment touches chunk metadata only.
        assert_eq!(plain.writes[..2], enriched.writes[..2]);
        assert_eq!(chunk_ids(a), chunk_ids(&plain.manifest.content[0]));
    }

    #[test]
    fn test_root_text_listed_and_parents_recorded() {
        let source = ContentSource::new(
            "a",
            "/a",
            vec![
                Block::text("Lead paragraph."),
                Block::heading(1, "Guide"),
                Block::heading(2, "Step"),
            ],
        )
        .with_purpose(Purpose::Documentation);
        let out = builder().build(&[source], &InMemoryHashStore::new()).unwrap();
        let entry = &out.manifest.content[0];
        assert_eq!(chunk_ids(entry), vec![ROOT_CHUNK_ID, "guide", "guide/step"]);
        assert_eq!(entry.chunks[1].parent, None);
        assert_eq!(entry.chunks[2].parent.as_deref(), Some("guide"));
        assert_eq!(entry.purpose, Purpose::Documentation);
    }

    #[test]
    fn test_formats_are_equivalent() {
        let sources = vec![
            page("a", "/a", &["Setup: yes", "1.0", "null"]),
            page("b", "/b", &[]).with_priority(Priority::High),
        ];
        let out = builder().build(&sources, &InMemoryHashStore::new()).unwrap();
        let from_json: Value = serde_json::from_str(&out.manifest_json).unwrap();
        let from_yaml: Value = serde_yaml::from_str(&out.manifest_yaml).unwrap();
        assert_eq!(from_json, from_yaml);
        assert_eq!(parse_json(&out.manifest_json).unwrap(), out.manifest);
        assert_eq!(parse_text(&out.manifest_yaml).unwrap(), out.manifest);
    }

    #[test]
    fn test_empty_content_serializes_as_list() {
        let out = builder().build(&[], &InMemoryHashStore::new()).unwrap();
        let json: Value = serde_json::from_str(&out.manifest_json).unwrap();
        assert_eq!(json["content"], Value::Array(vec![]));
    }

    #[test]
    fn test_consistency_check_reports_divergence() {
        let json = r#"{"version": "1.0", "content": [{"url": "/a"}]}"#;
        let yaml = "version: '1.0'\ncontent:\n- url: /b\n";
        match check_consistency(json, yaml) {
            Err(BuildError::Consistency { path, .. }) => assert_eq!(path, "$.content[0].url"),
            other => panic!("expected consistency error, got {:?}", other),
        }
        assert!(check_consistency(json, "version: '1.0'\ncontent:\n- url: /a\n").is_ok());
    }

    #[test]
    fn test_machine_view_path() {
        assert_eq!(machine_view_path("/").as_deref(), Some("/index.llm.md"));
        assert_eq!(machine_view_path("/docs/setup").as_deref(), Some("/docs/setup.llm.md"));
        assert_eq!(machine_view_path("/docs/").as_deref(), Some("/docs/index.llm.md"));
        assert_eq!(machine_view_path("/a/page.html").as_deref(), Some("/a/page.llm.md"));
        assert_eq!(
            machine_view_path("https://example.com/pricing?ref=x#top").as_deref(),
            Some("/pricing.llm.md")
        );
        assert_eq!(machine_view_path("https://example.com").as_deref(), Some("/index.llm.md"));
        assert_eq!(machine_view_path("pricing"), None);
    }

    #[test]
    fn test_render_machine_view() {
        let source = ContentSource::new(
            "a",
            "/a",
            vec![
                Block::heading(1, "Title"),
                Block::text("Hello."),
                Block::heading(2, "Empty"),
            ],
        );
        let chunks = chunk(&source).unwrap();
        assert_eq!(
            render_machine_view(&chunks),
            "<!-- chunk: title -->\n# Title\n\nHello.\n\n<!-- chunk: title/empty -->\n## Empty\n"
        );
    }

    #[test]
    fn test_parse_text_rejects_garbage() {
        assert!(parse_text("just some words").is_err());
        assert!(parse_json("version: 1").is_err());
    }
}
