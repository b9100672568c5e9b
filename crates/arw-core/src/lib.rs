//! # ARW Core
//!
//! Shared, I/O-free logic for building and resolving Agent-Ready Web
//! discovery manifests: data models, the hierarchical chunker, the
//! content-addressed hash store, the manifest builder, the validator,
//! the discovery state machine, and the content index paginator.
//!
//! This crate contains no tokio runtime, HTTP client, or filesystem I/O.
//! Storage and network access are injected through the [`sink::ArtifactSink`]
//! and [`hash_store::HashStore`] traits, and the discovery state machine is
//! driven by a caller that performs the actual probes.
//!
//! ```text
//! ContentSource ──▶ chunk ──▶ ManifestBuilder ──▶ validate ──▶ ArtifactSink
//!                               │       ▲
//!                               ▼       │
//!                              HashStore
//! ```

pub mod chunk;
pub mod discovery;
pub mod error;
pub mod hash_store;
pub mod manifest;
pub mod models;
pub mod paginate;
pub mod sink;
pub mod validate;
