//! `arw validate`: check a published manifest on disk.
//!
//! Machine-view references are resolved against a site root directory
//! (default `output.dir`), the same way the build gate resolves them
//! against the artifacts it is about to publish.

use anyhow::{Context, Result};
use arw_core::manifest::{parse_json, parse_text, WELL_KNOWN_PATH};
use arw_core::models::Manifest;
use arw_core::validate::{has_errors, validate, ValidationError};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::fs_sink::FsSink;

/// Result of checking one manifest file.
#[derive(Debug)]
pub enum CheckOutcome {
    Checked {
        manifest: Manifest,
        findings: Vec<ValidationError>,
    },
    Unparseable(String),
}

impl CheckOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Checked { findings, .. } if !has_errors(findings) => 0,
            _ => 2,
        }
    }
}

/// The manifest a build would have written under `output.dir`.
pub fn default_manifest_path(config: &Config) -> PathBuf {
    config
        .output
        .dir
        .join(WELL_KNOWN_PATH.trim_start_matches('/'))
}

/// Read a manifest file: JSON when the extension says so, otherwise JSON
/// or YAML.
pub fn read_manifest(path: &Path) -> Result<Result<Manifest, String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
    let parsed = if path.extension().is_some_and(|ext| ext == "json") {
        parse_json(&raw)
    } else {
        parse_text(&raw)
    };
    Ok(parsed.map_err(|e| e.to_string()))
}

pub fn check(path: &Path, root: &Path) -> Result<CheckOutcome> {
    let manifest = match read_manifest(path)? {
        Ok(manifest) => manifest,
        Err(e) => return Ok(CheckOutcome::Unparseable(e)),
    };
    let site = FsSink::new(root);
    let exists = |logical: &str| site.resolve(logical).is_ok_and(|file| file.is_file());
    let findings = validate(&manifest, &exists);
    Ok(CheckOutcome::Checked { manifest, findings })
}

/// Run the command and print a summary. Returns the exit status.
pub fn run_validate(config: &Config, file: Option<PathBuf>, root: Option<PathBuf>) -> Result<u8> {
    let path = file.unwrap_or_else(|| default_manifest_path(config));
    let root = root.unwrap_or_else(|| config.output.dir.clone());
    let outcome = check(&path, &root)?;

    println!("validate {}", path.display());
    match &outcome {
        CheckOutcome::Unparseable(e) => {
            println!("  {}", e);
            println!("failed");
        }
        CheckOutcome::Checked { manifest, findings } => {
            let errors = findings.iter().filter(|f| f.is_error()).count();
            println!("  entries: {}", manifest.content.len());
            println!("  errors: {}", errors);
            println!("  warnings: {}", findings.len() - errors);
            for f in findings {
                println!("  {}", f);
            }
            println!("{}", if errors == 0 { "ok" } else { "failed" });
        }
    }
    Ok(outcome.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MANIFEST: &str = r#"{
  "version": "1.0",
  "profile": "ARW-1",
  "site": {"name": "Example", "homepage": "https://example.com", "contact": "ops@example.com"},
  "content": [
    {"url": "/a", "machine_view": "/a.llm.md", "purpose": "general", "priority": "normal", "chunks": []}
  ]
}"#;

    #[test]
    fn test_checks_machine_views_against_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(&path, MANIFEST).unwrap();

        let missing = check(&path, dir.path()).unwrap();
        assert_eq!(missing.exit_code(), 2);

        fs::write(dir.path().join("a.llm.md"), "<!-- chunk: _root -->\n").unwrap();
        let present = check(&path, dir.path()).unwrap();
        assert_eq!(present.exit_code(), 0);
    }

    #[test]
    fn test_unparseable_is_content_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llms.txt");
        fs::write(&path, "# Example\n\n> prose, not a manifest\n").unwrap();
        let outcome = check(&path, dir.path()).unwrap();
        assert!(matches!(outcome, CheckOutcome::Unparseable(_)));
        assert_eq!(outcome.exit_code(), 2);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check(&dir.path().join("absent.json"), dir.path()).is_err());
    }
}
