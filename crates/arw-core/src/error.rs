//! Error taxonomy shared by the build and resolution pipeline.
//!
//! | Error | Scope | Effect |
//! |-------|-------|--------|
//! | [`ContentError`] | one source | source omitted, build continues |
//! | [`BuildError`] | whole build | build aborts, nothing published |
//! | [`ManifestParseError`] | one document | document rejected |
//! | [`PaginationError`] | one request | request rejected |
//!
//! Validation findings are plain data, see
//! [`ValidationError`](crate::validate::ValidationError).

/// A recoverable failure confined to a single content source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    /// A heading block used a level the chunker cannot place.
    #[error("source {source_id}: heading level {level} exceeds the maximum of 6")]
    HeadingTooDeep { source_id: String, level: u8 },

    /// The source has no URL.
    #[error("source {source_id}: url must not be empty")]
    EmptyUrl { source_id: String },

    /// The URL is neither a site path nor an absolute http(s) URL.
    #[error("source {source_id}: url {url:?} is not a site path or http(s) url")]
    InvalidUrl { source_id: String, url: String },

    /// Another source with the same id was already accepted in this build.
    #[error("source {source_id}: duplicate source id")]
    DuplicateSource { source_id: String },

    /// Two sources map to the same machine-view artifact.
    #[error("source {source_id}: machine view {path} is already produced by {other}")]
    MachineViewCollision {
        source_id: String,
        path: String,
        other: String,
    },
}

impl ContentError {
    /// The id of the source this error belongs to.
    pub fn source_id(&self) -> &str {
        match self {
            Self::HeadingTooDeep { source_id, .. }
            | Self::EmptyUrl { source_id }
            | Self::InvalidUrl { source_id, .. }
            | Self::DuplicateSource { source_id }
            | Self::MachineViewCollision { source_id, .. } => source_id,
        }
    }
}

/// A fatal build failure. Nothing from the build may be published.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The serialized formats decode to different data.
    #[error("manifest formats diverge at {path}: {detail}")]
    Consistency { path: String, detail: String },

    /// A format could not be produced or read back at all.
    #[error("failed to {action} {format} manifest: {message}")]
    Serialize {
        action: &'static str,
        format: &'static str,
        message: String,
    },
}

/// A manifest document could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManifestParseError {
    #[error("invalid JSON manifest: {0}")]
    Json(String),
    #[error("manifest is neither JSON nor YAML: {0}")]
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// The cursor was not produced by this paginator.
    #[error("invalid pagination cursor")]
    InvalidCursor,
}
