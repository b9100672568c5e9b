//! Heading-hierarchy chunker.
//!
//! Splits a [`ContentSource`] into a tree of [`Chunk`]s following its
//! heading structure. Every source yields a page-root chunk
//! ([`ROOT_CHUNK_ID`]) followed by one chunk per heading, in document order.
//!
//! # Algorithm
//!
//! 1. Walk blocks in document order, keeping a stack of open chunks. The
//!    page root sits at the bottom of the stack with level 0.
//! 2. A heading of level N pops every open chunk at level ≥ N, then opens a
//!    new chunk as a child of the chunk left on top.
//! 3. Body blocks are appended to the chunk on top of the stack.
//! 4. A chunk's local name is the slug of its heading. Siblings with the same
//!    slug are suffixed `-2`, `-3`, … in order of first occurrence.
//! 5. A chunk's id is its parent's id joined with its local name by `/`
//!    (top-level chunks use the bare local name).
//!
//! IDs are derived from heading text and sibling order only, never from a
//! block's array position, so inserting content elsewhere in the page does
//! not reassign them.
//!
//! # Example
//!
//! ```rust
//! use arw_core::chunk::chunk;
//! use arw_core::models::{Block, ContentSource};
//!
//! let source = ContentSource::new(
//!     "guide",
//!     "/guide",
//!     vec![
//!         Block::heading(2, "Setup"),
//!         Block::text("Install the CLI."),
//!         Block::heading(2, "Setup"),
//!     ],
//! );
//! let chunks = chunk(&source).unwrap();
//! let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
//! assert_eq!(ids, vec!["_root", "setup", "setup-2"]);
//! ```

use std::collections::HashSet;

use sha2::{Digest, Sha256};

use crate::error::ContentError;
use crate::models::{Chunk, ContentSource};

/// Id of the page-root chunk. Slugs never contain `_`, so it cannot collide.
pub const ROOT_CHUNK_ID: &str = "_root";

/// Deepest heading level the chunker accepts.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Local name used when a heading has no alphanumeric characters.
const EMPTY_SLUG: &str = "section";

/// Split a source into its chunk tree.
///
/// A source with no blocks yields a single empty root chunk. The only
/// failure is a heading deeper than [`MAX_HEADING_LEVEL`].
pub fn chunk(source: &ContentSource) -> Result<Vec<Chunk>, ContentError> {
    let mut tree = ChunkTree::new();

    for block in &source.blocks {
        if !block.is_heading() {
            tree.push_text(&block.text);
        } else if block.level > MAX_HEADING_LEVEL {
            return Err(ContentError::HeadingTooDeep {
                source_id: source.source_id.clone(),
                level: block.level,
            });
        } else {
            tree.open(block.level, &block.text);
        }
    }

    Ok(tree.finish())
}

/// Lowercase the text and collapse every run of non-alphanumeric
/// characters into a single `-`, trimming dashes at both ends.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug
    }
}

/// SHA-256 of normalized chunk text, hex encoded.
pub fn text_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

struct Node {
    id: String,
    parent: Option<usize>,
    heading: String,
    level: u8,
    texts: Vec<String>,
    /// Local names already taken by this node's children.
    child_names: HashSet<String>,
}

struct ChunkTree {
    nodes: Vec<Node>,
    open: Vec<usize>,
}

impl ChunkTree {
    fn new() -> Self {
        Self {
            nodes: vec![Node {
                id: ROOT_CHUNK_ID.to_string(),
                parent: None,
                heading: String::new(),
                level: 0,
                texts: Vec::new(),
                child_names: HashSet::new(),
            }],
            open: vec![0],
        }
    }

    fn top(&self) -> usize {
        // The root is never popped: headings are always level >= 1.
        self.open.last().copied().unwrap_or(0)
    }

    fn push_text(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        let top = self.top();
        self.nodes[top].texts.push(trimmed.to_string());
    }

    fn open(&mut self, level: u8, heading: &str) {
        while self.open.len() > 1 && self.nodes[self.top()].level >= level {
            self.open.pop();
        }
        let parent = self.top();

        let name = claim_name(&mut self.nodes[parent].child_names, &slugify(heading));
        let id = if parent == 0 {
            name
        } else {
            format!("{}/{}", self.nodes[parent].id, name)
        };

        self.nodes.push(Node {
            id,
            parent: Some(parent),
            heading: heading.trim().to_string(),
            level,
            texts: Vec::new(),
            child_names: HashSet::new(),
        });
        self.open.push(self.nodes.len() - 1);
    }

    fn finish(self) -> Vec<Chunk> {
        let ids: Vec<String> = self.nodes.iter().map(|n| n.id.clone()).collect();
        self.nodes
            .into_iter()
            .map(|node| {
                let text = node.texts.join("\n\n");
                Chunk {
                    parent_id: node.parent.map(|p| ids[p].clone()),
                    byte_size: text.len() as u64,
                    content_hash: text_hash(&text),
                    id: node.id,
                    heading: node.heading,
                    level: node.level,
                    text,
                }
            })
            .collect()
    }
}

/// Take `slug` among siblings, or the first free `slug-N` for N >= 2.
fn claim_name(taken: &mut HashSet<String>, slug: &str) -> String {
    if taken.insert(slug.to_string()) {
        return slug.to_string();
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{}-{}", slug, n);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
