//! Core data models for the discovery manifest pipeline.
//!
//! [`ContentSource`] and [`Chunk`] are ephemeral and recomputed on every
//! build. [`Manifest`] and [`ManifestEntry`] are the published artifact.
//! [`CacheEntry`] is the only state that survives between builds.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One extracted block of a content source.
///
/// `level` 0 is body text; 1 through 6 are headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub level: u8,
    pub text: String,
}

impl Block {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            level: 0,
            text: text.into(),
        }
    }

    pub fn is_heading(&self) -> bool {
        self.level > 0
    }
}

/// One logical document (a rendered page) as produced by an extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentSource {
    /// Stable, caller-supplied identifier.
    pub source_id: String,
    /// Absolute URL or site path (`/docs/setup`).
    pub url: String,
    pub blocks: Vec<Block>,
    pub purpose: Purpose,
    pub priority: Priority,
    pub last_modified: Option<DateTime<Utc>>,
}

impl ContentSource {
    pub fn new(source_id: impl Into<String>, url: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            source_id: source_id.into(),
            url: url.into(),
            blocks,
            purpose: Purpose::General,
            priority: Priority::Normal,
            last_modified: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_purpose(mut self, purpose: Purpose) -> Self {
        self.purpose = purpose;
        self
    }

    pub fn with_last_modified(mut self, at: DateTime<Utc>) -> Self {
        self.last_modified = Some(at);
        self
    }
}

/// An addressable section of a content source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Slug path from the page root, e.g. `install/linux`.
    pub id: String,
    /// `None` only for the page-root chunk.
    pub parent_id: Option<String>,
    pub heading: String,
    /// Heading level; 0 for the page root.
    pub level: u8,
    /// Normalized own text, excluding nested chunks.
    pub text: String,
    pub byte_size: u64,
    /// SHA-256 hex of `text`.
    pub content_hash: String,
}

impl Chunk {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// What a content entry is for.
///
/// Unrecognized values are kept verbatim in [`Purpose::Unknown`] so the
/// validator can report them instead of silently defaulting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Purpose {
    Documentation,
    ProductInformation,
    #[default]
    General,
    Other,
    Unknown(String),
}

impl Purpose {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Documentation => "documentation",
            Self::ProductInformation => "product_information",
            Self::General => "general",
            Self::Other => "other",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for Purpose {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "documentation" => Self::Documentation,
            "product_information" => Self::ProductInformation,
            "general" => Self::General,
            "other" => Self::Other,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<Purpose> for String {
    fn from(purpose: Purpose) -> Self {
        purpose.as_str().to_string()
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry priority. Sorts `high < normal < low`; unknown values sort last.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    #[default]
    Normal,
    Low,
    Unknown(String),
}

impl Priority {
    pub fn as_str(&self) -> &str {
        match self {
            Self::High => "high",
            Self::Normal => "normal",
            Self::Low => "low",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for Priority {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "high" => Self::High,
            "normal" => Self::Normal,
            "low" => Self::Low,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.as_str().to_string()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Site identity block. All three fields are required to be non-empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Site {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub homepage: String,
    #[serde(default)]
    pub contact: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Site {
    pub fn new(
        name: impl Into<String>,
        homepage: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            homepage: homepage.into(),
            contact: contact.into(),
            extra: BTreeMap::new(),
        }
    }
}

/// A chunk as listed in a manifest entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRef {
    pub id: String,
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub byte_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_view: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
}

/// One content source's representation in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub machine_view: String,
    #[serde(default)]
    pub purpose: Purpose,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub chunks: Vec<ChunkRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ManifestEntry {
    /// The `(priority, url)` key entries are ordered by.
    pub fn sort_key(&self) -> (&Priority, &str) {
        (&self.priority, self.url.as_str())
    }
}

/// The root discovery artifact.
///
/// `content` has no serde default: a document without it (or with
/// `content: null`) does not decode as a manifest at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub profile: String,
    #[serde(default)]
    pub site: Site,
    pub content: Vec<ManifestEntry>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Parse the capability tier out of a profile string such as `ARW-2`.
pub fn profile_tier(profile: &str) -> Option<u32> {
    profile.strip_prefix("ARW-")?.parse().ok()
}

/// Optional enrichment for one chunk, produced by an external model.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChunkEnrichment {
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
}

/// Enrichment keyed by chunk id, optionally qualified as `<source_id>#<chunk_id>`.
pub type EnrichmentMap = BTreeMap<String, ChunkEnrichment>;

/// Hash store record for one previously written artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub logical_path: String,
    pub hash: String,
    pub timestamp: DateTime<Utc>,
}

/// An artifact the caller must write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOp {
    pub path: String,
    pub content: Vec<u8>,
}
