//! Filesystem connector: a directory of Markdown files as content sources.
//!
//! Each matching file becomes one [`ContentSource`]:
//!
//! | Field | Value |
//! |-------|-------|
//! | `source_id` | path relative to `content.root`, `/`-separated |
//! | `url` | `content.base_url` + relative path without extension; `index` files map to their directory |
//! | `blocks` | ATX headings and blank-line separated paragraphs |
//! | `priority`, `purpose` | first matching `[[content.rules]]` entry, else defaults |
//! | `last_modified` | file mtime, truncated to seconds |
//!
//! Results are sorted by `source_id`.

use anyhow::{bail, Context, Result};
use arw_core::models::{Block, ContentSource, Priority, Purpose};
use chrono::{DateTime, TimeZone, Utc};
use globset::{Glob, GlobMatcher, GlobSet, GlobSetBuilder};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::{ContentConfig, ContentRule};

pub fn scan_content(content: &ContentConfig) -> Result<Vec<ContentSource>> {
    let root = &content.root;
    if !root.exists() {
        bail!("content.root does not exist: {}", root.display());
    }

    let include_set = build_globset(&content.include_globs)?;

    let mut default_excludes = vec![
        "**/.git/**".to_string(),
        "**/node_modules/**".to_string(),
        "**/*.llm.md".to_string(),
    ];
    default_excludes.extend(content.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let rules = CompiledRules::new(&content.rules)?;

    let mut sources = Vec::new();

    let walker = WalkDir::new(root).follow_links(content.follow_symlinks);
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }

        let body = match std::fs::read_to_string(path) {
            Ok(body) => body,
            Err(e) => {
                warn!(path = %rel_str, error = %e, "skipping unreadable file");
                continue;
            }
        };

        let mut source = ContentSource::new(
            rel_str.clone(),
            url_for(&content.base_url, &rel_str),
            parse_markdown(&body),
        );
        if let Some(priority) = rules.priority_for(&rel_str) {
            source = source.with_priority(priority);
        }
        if let Some(purpose) = rules.purpose_for(&rel_str) {
            source = source.with_purpose(purpose);
        }
        if let Some(modified) = modified_at(path) {
            source = source.with_last_modified(modified);
        }

        debug!(source_id = %source.source_id, url = %source.url, blocks = source.blocks.len(), "scanned");
        sources.push(source);
    }

    sources.sort_by(|a, b| a.source_id.cmp(&b.source_id));

    Ok(sources)
}

/// Split Markdown into heading and paragraph blocks.
///
/// Only ATX headings (`#` through `######`) are recognized. Lines inside
/// fenced code blocks are never headings, and a whole fence is kept as a
/// single text block.
pub fn parse_markdown(body: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut fence: Option<(char, usize)> = None;

    for line in body.lines() {
        if let Some((marker, len)) = fence {
            paragraph.push(line);
            if closes_fence(line, marker, len) {
                fence = None;
                flush(&mut paragraph, &mut blocks);
            }
            continue;
        }

        if let Some(open) = opens_fence(line) {
            flush(&mut paragraph, &mut blocks);
            paragraph.push(line);
            fence = Some(open);
            continue;
        }

        if let Some((level, text)) = atx_heading(line) {
            flush(&mut paragraph, &mut blocks);
            blocks.push(Block::heading(level, text));
            continue;
        }

        if line.trim().is_empty() {
            flush(&mut paragraph, &mut blocks);
        } else {
            paragraph.push(line);
        }
    }
    // An unclosed fence runs to the end of the document.
    flush(&mut paragraph, &mut blocks);

    blocks
}

fn flush(lines: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if !lines.is_empty() {
        blocks.push(Block::text(lines.join("\n")));
        lines.clear();
    }
}

fn leading_spaces(line: &str) -> Option<&str> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    Some(trimmed)
}

fn opens_fence(line: &str) -> Option<(char, usize)> {
    let rest = leading_spaces(line)?;
    let marker = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = rest.chars().take_while(|c| *c == marker).count();
    (len >= 3).then_some((marker, len))
}

fn closes_fence(line: &str, marker: char, len: usize) -> bool {
    let Some(rest) = leading_spaces(line) else {
        return false;
    };
    let run = rest.chars().take_while(|c| *c == marker).count();
    run >= len && rest[run * marker.len_utf8()..].trim().is_empty()
}

fn atx_heading(line: &str) -> Option<(u8, String)> {
    let rest = leading_spaces(line)?;
    let level = rest.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let after = &rest[level..];
    if !after.is_empty() && !after.starts_with([' ', '\t']) {
        return None;
    }

    // Optional closing sequence: `## Title ##`.
    let mut text = after.trim();
    let without_closing = text.trim_end_matches('#');
    if without_closing.is_empty() || without_closing.ends_with([' ', '\t']) {
        text = without_closing.trim_end();
    }
    Some((level as u8, text.to_string()))
}

/// Derive a page URL from a content-relative file path.
///
/// `index.md` → `/`, `guide/index.md` → `/guide/`, `guide/setup.md` →
/// `/guide/setup`, each prefixed by `base_url`.
pub fn url_for(base_url: &str, relative_path: &str) -> String {
    let without_ext = match relative_path.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !stem.ends_with('/') && !ext.contains('/') => {
            stem
        }
        _ => relative_path,
    };
    let path = if without_ext == "index" {
        ""
    } else if let Some(dir) = without_ext.strip_suffix("/index") {
        return format!("{}/{}/", base_url.trim_end_matches('/'), dir);
    } else {
        without_ext
    };
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

fn modified_at(path: &Path) -> Option<DateTime<Utc>> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    let secs = modified
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .ok()?
        .as_secs() as i64;
    Utc.timestamp_opt(secs, 0).single()
}

struct CompiledRules {
    rules: Vec<(GlobMatcher, Option<Priority>, Option<Purpose>)>,
}

impl CompiledRules {
    fn new(rules: &[ContentRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                let matcher = Glob::new(&rule.pattern)
                    .with_context(|| format!("invalid content rule pattern '{}'", rule.pattern))?
                    .compile_matcher();
                Ok((
                    matcher,
                    rule.priority.clone().map(Priority::from),
                    rule.purpose.clone().map(Purpose::from),
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    fn priority_for(&self, path: &str) -> Option<Priority> {
        self.rules
            .iter()
            .filter(|(m, _, _)| m.is_match(path))
            .find_map(|(_, priority, _)| priority.clone())
    }

    fn purpose_for(&self, path: &str) -> Option<Purpose> {
        self.rules
            .iter()
            .filter(|(m, _, _)| m.is_match(path))
            .find_map(|(_, _, purpose)| purpose.clone())
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
