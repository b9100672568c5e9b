//! Structural and referential manifest validation.
//!
//! [`validate`] is a pure function: it never mutates the manifest and
//! performs no I/O. Artifact existence is answered by a caller-supplied
//! callback, so the same checks run against a build's in-memory artifact
//! set, a directory on disk, or nothing at all.
//!
//! Every check runs; findings are collected, never short-circuited. Only
//! [`Severity::Error`] findings block publishing.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::models::{profile_tier, Manifest, Priority, Purpose};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `content[2].priority`.
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationError {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.field, self.message)
    }
}

/// Whether any finding blocks publishing.
pub fn has_errors(findings: &[ValidationError]) -> bool {
    findings.iter().any(ValidationError::is_error)
}

/// Run every check against `manifest`.
///
/// `exists` answers whether a machine-view path (without any `#fragment`)
/// resolves to a published or about-to-be-published artifact.
pub fn validate(manifest: &Manifest, exists: &dyn Fn(&str) -> bool) -> Vec<ValidationError> {
    let mut findings = Vec::new();

    check_required(manifest, &mut findings);
    check_extra_fields(manifest, &mut findings);

    let mut urls = HashSet::new();
    for (i, entry) in manifest.content.iter().enumerate() {
        let at = format!("content[{}]", i);

        if entry.url.trim().is_empty() {
            findings.push(ValidationError::error(format!("{}.url", at), "must not be empty"));
        } else if !urls.insert(entry.url.as_str()) {
            findings.push(ValidationError::error(
                format!("{}.url", at),
                format!("duplicate entry for {}", entry.url),
            ));
        }

        check_view(&entry.machine_view, &format!("{}.machine_view", at), exists, &mut findings);

        if let Priority::Unknown(raw) = &entry.priority {
            findings.push(ValidationError::error(
                format!("{}.priority", at),
                format!("unknown priority {:?}; expected high, normal, or low", raw),
            ));
        }
        if let Purpose::Unknown(raw) = &entry.purpose {
            findings.push(ValidationError::warning(
                format!("{}.purpose", at),
                format!("unknown purpose {:?}", raw),
            ));
        }

        let mut chunk_ids = HashSet::new();
        for (j, chunk) in entry.chunks.iter().enumerate() {
            let chunk_at = format!("{}.chunks[{}]", at, j);
            if chunk.id.is_empty() {
                findings.push(ValidationError::error(format!("{}.id", chunk_at), "must not be empty"));
            } else if !chunk_ids.insert(chunk.id.as_str()) {
                findings.push(ValidationError::error(
                    format!("{}.id", chunk_at),
                    format!("duplicate chunk id {:?}", chunk.id),
                ));
            }
            if let Some(view) = &chunk.machine_view {
                check_view(view, &format!("{}.machine_view", chunk_at), exists, &mut findings);
            }
        }

        for key in entry.extra.keys() {
            findings.push(ValidationError::warning(
                format!("{}.{}", at, key),
                "unrecognized field",
            ));
        }
    }

    findings
}

fn check_required(manifest: &Manifest, findings: &mut Vec<ValidationError>) {
    let required = [
        ("version", &manifest.version),
        ("profile", &manifest.profile),
        ("site.name", &manifest.site.name),
        ("site.homepage", &manifest.site.homepage),
        ("site.contact", &manifest.site.contact),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            findings.push(ValidationError::error(field, "required field is missing or empty"));
        }
    }

    if !manifest.profile.trim().is_empty() && profile_tier(&manifest.profile).is_none() {
        findings.push(ValidationError::warning(
            "profile",
            format!("{:?} is not of the form ARW-<tier>", manifest.profile),
        ));
    }
}

fn check_extra_fields(manifest: &Manifest, findings: &mut Vec<ValidationError>) {
    for key in manifest.extra.keys() {
        findings.push(ValidationError::warning(key.as_str(), "unrecognized field"));
    }
    for key in manifest.site.extra.keys() {
        findings.push(ValidationError::warning(format!("site.{}", key), "unrecognized field"));
    }
}

fn check_view(
    view: &str,
    field: &str,
    exists: &dyn Fn(&str) -> bool,
    findings: &mut Vec<ValidationError>,
) {
    let path = view.split('#').next().unwrap_or_default();
    if path.is_empty() {
        findings.push(ValidationError::error(field, "must not be empty"));
    } else if !exists(path) {
        findings.push(ValidationError::error(
            field,
            format!("{} does not resolve to an artifact", path),
        ));
    }
}
