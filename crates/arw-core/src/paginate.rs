//! Cursor pagination over a manifest's content index.
//!
//! Cursors encode the last-seen `(priority, url)` sort key, not an offset,
//! so a page boundary stays put when entries are appended concurrently.
//! The token is URL-safe base64 and opaque to callers.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Serialize;

use crate::error::PaginationError;
use crate::models::{ManifestEntry, Priority};

pub const DEFAULT_PAGE_LIMIT: usize = 200;
pub const MAX_PAGE_LIMIT: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub entries: Vec<ManifestEntry>,
    /// `None` once the page reaches the end of the index.
    pub next_cursor: Option<String>,
}

/// Clamp a requested page size into `1..=MAX_PAGE_LIMIT`.
pub fn effective_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT)
}

/// Return the page of `entries` that follows `cursor`.
///
/// `entries` must be sorted by [`ManifestEntry::sort_key`], as a built
/// manifest's content is.
pub fn paginate(
    entries: &[ManifestEntry],
    cursor: Option<&str>,
    limit: Option<usize>,
) -> Result<Page, PaginationError> {
    let limit = effective_limit(limit);
    let start = match cursor {
        None => 0,
        Some(token) => {
            let (priority, url) = decode_cursor(token)?;
            let key = (&priority, url.as_str());
            entries.partition_point(|e| e.sort_key() <= key)
        }
    };

    let end = (start + limit).min(entries.len());
    let page = entries[start..end].to_vec();
    let next_cursor = if end < entries.len() {
        page.last().map(encode_cursor)
    } else {
        None
    };

    Ok(Page {
        entries: page,
        next_cursor,
    })
}

fn encode_cursor(entry: &ManifestEntry) -> String {
    URL_SAFE_NO_PAD.encode(format!("{}\n{}", entry.priority, entry.url))
}

fn decode_cursor(token: &str) -> Result<(Priority, String), PaginationError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| PaginationError::InvalidCursor)?;
    let raw = String::from_utf8(bytes).map_err(|_| PaginationError::InvalidCursor)?;
    let (priority, url) = raw
        .split_once('\n')
        .ok_or(PaginationError::InvalidCursor)?;
    Ok((Priority::from(priority.to_string()), url.to_string()))
}
