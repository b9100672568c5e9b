//! Network driver for manifest discovery.
//!
//! The decision logic lives in [`arw_core::discovery`]. This module supplies
//! what the state machine leaves out: turning an origin into probe URLs,
//! performing each probe over HTTP with a per-attempt timeout, sleeping the
//! backoff the machine asks for, and giving up when the caller cancels.
//!
//! Retry strategy (from [`DiscoveryState::transition`]):
//! - well-known 200 with a valid manifest → resolved
//! - well-known 404 or invalid body → fall back to `/llms.txt` at once
//! - well-known 5xx, other status, or network error → retry with
//!   exponential backoff, then fall back
//! - legacy anything but a valid 200 → not discoverable

use arw_core::discovery::{
    DiscoveryState, ManifestLocation, NotDiscoverable, ProbeOutcome, Resolution, RetryPolicy,
    Transition, TransportError,
};
use async_trait::async_trait;
use reqwest::Url;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

/// Why resolution produced no manifest.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid origin {origin:?}: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    /// The site does not publish a manifest. Not the same as an empty one.
    #[error(transparent)]
    NotDiscoverable(#[from] NotDiscoverable),

    #[error("resolution cancelled")]
    Cancelled,
}

impl ResolveError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidOrigin { .. } => 1,
            Self::Cancelled => 3,
            Self::NotDiscoverable(_) => 4,
        }
    }
}

/// Performs one probe. Implementations never retry; the state machine does.
#[async_trait]
pub trait ManifestFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> ProbeOutcome;
}

/// Default cap on a manifest body.
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// [`ManifestFetcher`] over `reqwest`.
pub struct HttpFetcher {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// `timeout` bounds each attempt, including reading the body.
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("arw/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        })
    }

    /// Bodies longer than `limit` bytes are rejected without being buffered.
    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

#[async_trait]
impl ManifestFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> ProbeOutcome {
        let mut response = match self
            .client
            .get(url.clone())
            .header(
                reqwest::header::ACCEPT,
                "application/json, text/plain;q=0.9, */*;q=0.1",
            )
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return ProbeOutcome::Transport(transport_error(e)),
        };

        let status = response.status().as_u16();
        if status != 200 {
            return ProbeOutcome::status(status);
        }
        let limit = self.max_body_bytes;
        if response
            .content_length()
            .is_some_and(|len| len > limit as u64)
        {
            return ProbeOutcome::TooLarge { limit };
        }

        let mut body = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    if body.len() + chunk.len() > limit {
                        return ProbeOutcome::TooLarge { limit };
                    }
                    body.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => return ProbeOutcome::Transport(transport_error(e)),
            }
        }
        ProbeOutcome::Response {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        }
    }
}

fn transport_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Other(e.to_string())
    }
}

/// Turn user input into a site origin.
///
/// A bare host gets `https://`. Any path, query, or fragment is dropped,
/// since both manifest locations are fixed paths from the site root.
pub fn normalize_origin(input: &str) -> Result<Url, ResolveError> {
    let invalid = |reason: String| ResolveError::InvalidOrigin {
        origin: input.to_string(),
        reason,
    };

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty".to_string()));
    }
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let mut url = Url::parse(&with_scheme).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    url.set_path("/");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Drives [`DiscoveryState`] to a terminal state for one origin at a time.
pub struct Resolver<F> {
    fetcher: F,
    policy: RetryPolicy,
}

impl<F: ManifestFetcher> Resolver<F> {
    pub fn new(fetcher: F, policy: RetryPolicy) -> Self {
        Self { fetcher, policy }
    }

    pub async fn resolve(&self, origin: &str) -> Result<Resolution, ResolveError> {
        self.resolve_until(origin, std::future::pending()).await
    }

    /// Resolve `origin`, abandoning the attempt as soon as `cancel` completes.
    ///
    /// Cancellation drops any in-flight request or backoff sleep. Nothing
    /// is left running and nothing is written.
    pub async fn resolve_until<C>(&self, origin: &str, cancel: C) -> Result<Resolution, ResolveError>
    where
        C: Future<Output = ()>,
    {
        let base = normalize_origin(origin)?;
        tokio::select! {
            result = self.drive(&base) => result,
            _ = cancel => {
                info!(origin = %base, "resolution cancelled");
                Err(ResolveError::Cancelled)
            }
        }
    }

    async fn drive(&self, base: &Url) -> Result<Resolution, ResolveError> {
        let mut state = DiscoveryState::initial();
        loop {
            let location = match state {
                DiscoveryState::Resolved(resolution) => {
                    info!(origin = %base, location = resolution.location.path(), "manifest resolved");
                    return Ok(resolution);
                }
                DiscoveryState::Failed(failure) => return Err(failure.into()),
                DiscoveryState::ProbeWellKnown { .. } => ManifestLocation::WellKnown,
                DiscoveryState::ProbeLegacyManifest { .. } => ManifestLocation::Legacy,
            };

            let url = base
                .join(location.path())
                .map_err(|e| ResolveError::InvalidOrigin {
                    origin: base.to_string(),
                    reason: e.to_string(),
                })?;
            let outcome = self.fetcher.fetch(&url).await;
            debug!(url = %url, outcome = %outcome_summary(&outcome), "probed");

            let Transition { state: next, delay } = state.transition(outcome, &self.policy);
            if !delay.is_zero() {
                debug!(delay_ms = delay.as_millis() as u64, "backing off");
                tokio::time::sleep(delay).await;
            }
            state = next;
        }
    }
}

fn outcome_summary(outcome: &ProbeOutcome) -> String {
    match outcome {
        ProbeOutcome::Response { status, body } => format!("HTTP {} ({} bytes)", status, body.len()),
        ProbeOutcome::Transport(e) => e.to_string(),
        ProbeOutcome::TooLarge { limit } => format!("body over {} bytes", limit),
    }
}
