//! Manifest discovery as an explicit finite-state machine.
//!
//! ```text
//!                 200 + valid                      200 + valid
//!   ┌──────────────────────────────┐   ┌────────────────────────────┐
//!   │                              ▼   │                            ▼
//! ProbeWellKnown ──404 / invalid──▶ ProbeLegacyManifest          Resolved
//!   │  ▲                               │
//!   └──┘ 5xx / transport,              └──anything else──▶ Failed
//!        until attempts run out,
//!        then fall through to legacy
//! ```
//!
//! This module performs no I/O. A driver asks [`DiscoveryState::next_probe`]
//! which location to request, performs the request, and feeds the
//! [`ProbeOutcome`] to [`DiscoveryState::transition`], sleeping for the
//! returned delay before the next probe. Cancelling is simply not calling
//! `transition` again; the machine holds no resources.
//!
//! The well-known location is always probed first and is authoritative
//! when both exist.

use std::time::Duration;

use crate::manifest::{parse_json, parse_text, LEGACY_PATH, WELL_KNOWN_PATH};
use crate::models::Manifest;
use crate::validate::{has_errors, validate};

/// Where a manifest was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestLocation {
    WellKnown,
    Legacy,
}

impl ManifestLocation {
    pub fn path(self) -> &'static str {
        match self {
            Self::WellKnown => WELL_KNOWN_PATH,
            Self::Legacy => LEGACY_PATH,
        }
    }
}

/// A successfully resolved manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub manifest: Manifest,
    pub location: ManifestLocation,
}

/// Terminal outcome: the site does not support this discovery protocol.
///
/// This is distinct from a manifest with no content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no manifest discoverable (well-known: {well_known}; legacy: {legacy})")]
pub struct NotDiscoverable {
    pub well_known: String,
    pub legacy: String,
}

/// A network-level probe failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Other(String),
}

/// What happened when a location was probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Response { status: u16, body: String },
    Transport(TransportError),
    /// The body was larger than the fetcher accepts. Not retried.
    TooLarge { limit: usize },
}

impl ProbeOutcome {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::Response {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self::Response {
            status,
            body: String::new(),
        }
    }
}

/// Bounded exponential backoff for the well-known probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts against the well-known location, including the first.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `failed_attempt + 1`: base, 2×base, 4×base, …
    pub fn backoff(&self, failed_attempt: u32) -> Duration {
        let shift = failed_attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryState {
    /// Initial state. `attempt` counts from 1.
    ProbeWellKnown { attempt: u32 },
    /// Carries why the well-known probe was abandoned.
    ProbeLegacyManifest { well_known: String },
    Resolved(Resolution),
    Failed(NotDiscoverable),
}

/// Result of one transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: DiscoveryState,
    /// How long to wait before the next probe.
    pub delay: Duration,
}

impl Transition {
    fn now(state: DiscoveryState) -> Self {
        Self {
            state,
            delay: Duration::ZERO,
        }
    }
}

impl Default for DiscoveryState {
    fn default() -> Self {
        Self::ProbeWellKnown { attempt: 1 }
    }
}

impl DiscoveryState {
    pub fn initial() -> Self {
        Self::default()
    }

    /// The location to probe next, or `None` in a terminal state.
    pub fn next_probe(&self) -> Option<ManifestLocation> {
        match self {
            Self::ProbeWellKnown { .. } => Some(ManifestLocation::WellKnown),
            Self::ProbeLegacyManifest { .. } => Some(ManifestLocation::Legacy),
            Self::Resolved(_) | Self::Failed(_) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next_probe().is_none()
    }

    /// Advance the machine with the outcome of the probe it asked for.
    ///
    /// Terminal states are absorbing: feeding them an outcome returns them
    /// unchanged.
    pub fn transition(self, outcome: ProbeOutcome, policy: &RetryPolicy) -> Transition {
        match self {
            Self::ProbeWellKnown { attempt } => well_known_step(attempt, outcome, policy),
            Self::ProbeLegacyManifest { well_known } => {
                let state = match accept(ManifestLocation::Legacy, &outcome) {
                    Ok(manifest) => Self::Resolved(Resolution {
                        manifest,
                        location: ManifestLocation::Legacy,
                    }),
                    Err(legacy) => Self::Failed(NotDiscoverable { well_known, legacy }),
                };
                Transition::now(state)
            }
            terminal => Transition::now(terminal),
        }
    }
}

fn well_known_step(attempt: u32, outcome: ProbeOutcome, policy: &RetryPolicy) -> Transition {
    let retryable = match &outcome {
        ProbeOutcome::Response { status, .. } => *status != 200 && *status != 404,
        ProbeOutcome::Transport(_) => true,
        ProbeOutcome::TooLarge { .. } => false,
    };

    if retryable {
        let reason = describe(&outcome);
        if attempt < policy.max_attempts {
            return Transition {
                state: DiscoveryState::ProbeWellKnown {
                    attempt: attempt + 1,
                },
                delay: policy.backoff(attempt),
            };
        }
        return Transition::now(DiscoveryState::ProbeLegacyManifest {
            well_known: format!("{} after {} attempts", reason, attempt),
        });
    }

    let state = match accept(ManifestLocation::WellKnown, &outcome) {
        Ok(manifest) => DiscoveryState::Resolved(Resolution {
            manifest,
            location: ManifestLocation::WellKnown,
        }),
        Err(well_known) => DiscoveryState::ProbeLegacyManifest { well_known },
    };
    Transition::now(state)
}

/// Decide whether a probe outcome carries a usable manifest.
///
/// Usable means HTTP 200, a body that decodes in the location's format, and
/// no error-severity validation findings. Artifact existence cannot be
/// checked from here and is assumed.
pub fn accept(location: ManifestLocation, outcome: &ProbeOutcome) -> Result<Manifest, String> {
    let body = match outcome {
        ProbeOutcome::Response { status: 200, body } => body,
        other => return Err(describe(other)),
    };
    let manifest = match location {
        ManifestLocation::WellKnown => parse_json(body),
        ManifestLocation::Legacy => parse_text(body),
    }
    .map_err(|e| e.to_string())?;

    let findings = validate(&manifest, &|_: &str| true);
    if has_errors(&findings) {
        let first = findings
            .iter()
            .find(|f| f.is_error())
            .map(ToString::to_string)
            .unwrap_or_default();
        return Err(format!("invalid manifest: {}", first));
    }
    Ok(manifest)
}

fn describe(outcome: &ProbeOutcome) -> String {
    match outcome {
        ProbeOutcome::Response { status, .. } => format!("HTTP {}", status),
        ProbeOutcome::Transport(e) => e.to_string(),
        ProbeOutcome::TooLarge { limit } => format!("body exceeds {} bytes", limit),
    }
}
