//! `arw index`: page through a manifest's content entries.
//!
//! Prints one page as JSON. Pass the returned `next_cursor` back with
//! `--cursor` to continue; it is absent on the last page.

use anyhow::{anyhow, Result};
use arw_core::paginate::paginate;
use std::path::PathBuf;

use crate::config::Config;
use crate::validate_cmd::{default_manifest_path, read_manifest};

pub fn run_index(
    config: &Config,
    file: Option<PathBuf>,
    cursor: Option<String>,
    limit: Option<usize>,
) -> Result<String> {
    let path = file.unwrap_or_else(|| default_manifest_path(config));
    let mut manifest = read_manifest(&path)?
        .map_err(|e| anyhow!("{}: {}", path.display(), e))?;

    // Hand-written manifests need not keep the build order.
    manifest
        .content
        .sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let page = paginate(&manifest.content, cursor.as_deref(), limit)?;
    Ok(serde_json::to_string_pretty(&page)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arw_core::hash_store::InMemoryHashStore;
    use arw_core::manifest::{render_json, ManifestBuilder};
    use arw_core::models::{ContentSource, Site};

    #[test]
    fn test_pages_through_a_built_manifest() {
        let sources: Vec<ContentSource> = (0..5)
            .map(|i| ContentSource::new(format!("p{}", i), format!("/p{}", i), vec![]))
            .collect();
        let out = ManifestBuilder::new(Site::new("E", "https://e.com", "ops@e.com"))
            .build(&sources, &InMemoryHashStore::new())
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arw-manifest.json");
        std::fs::write(&path, &out.manifest_json).unwrap();

        let config = Config::minimal();
        let first: serde_json::Value =
            serde_json::from_str(&run_index(&config, Some(path.clone()), None, Some(3)).unwrap())
                .unwrap();
        assert_eq!(first["entries"].as_array().unwrap().len(), 3);
        let cursor = first["next_cursor"].as_str().unwrap().to_string();

        let second: serde_json::Value = serde_json::from_str(
            &run_index(&config, Some(path.clone()), Some(cursor), Some(3)).unwrap(),
        )
        .unwrap();
        assert_eq!(second["entries"].as_array().unwrap().len(), 2);
        assert!(second["next_cursor"].is_null());

        assert!(run_index(&config, Some(path), Some("%%%".to_string()), None).is_err());
    }

    #[test]
    fn test_unsorted_manifest_pages_every_entry() {
        let sources: Vec<ContentSource> = ["/b", "/a", "/c"]
            .iter()
            .map(|url| ContentSource::new(url.trim_start_matches('/'), *url, vec![]))
            .collect();
        let mut manifest = ManifestBuilder::new(Site::new("E", "https://e.com", "ops@e.com"))
            .build(&sources, &InMemoryHashStore::new())
            .unwrap()
            .manifest;
        manifest.content.sort_by(|a, b| {
            let order = |url: &str| ["/b", "/a", "/c"].iter().position(|u| *u == url);
            order(&a.url).cmp(&order(&b.url))
        });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arw-manifest.json");
        std::fs::write(&path, render_json(&manifest).unwrap()).unwrap();

        let config = Config::minimal();
        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let page: serde_json::Value = serde_json::from_str(
                &run_index(&config, Some(path.clone()), cursor, Some(1)).unwrap(),
            )
            .unwrap();
            for entry in page["entries"].as_array().unwrap() {
                seen.push(entry["url"].as_str().unwrap().to_string());
            }
            match page["next_cursor"].as_str() {
                Some(next) => cursor = Some(next.to_string()),
                None => break,
            }
        }
        assert_eq!(seen, vec!["/a", "/b", "/c"]);
    }
}
