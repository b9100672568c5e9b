//! # arw
//!
//! Build, validate, and resolve Agent-Ready Web discovery manifests.
//!
//! A site's Markdown content is split into addressable chunks, assembled
//! into a manifest published at `/.well-known/arw-manifest.json` (with a
//! YAML copy at `/llms.txt`), and written incrementally: only artifacts
//! whose content hash changed are rewritten. The consuming side resolves
//! that manifest from a bare domain.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────────┐   ┌───────────┐   ┌────────────┐
//! │ connector_fs│──▶│ pipeline         │──▶│ validate  │──▶│ fs_sink    │
//! │ Markdown    │   │ chunk + assemble │   │ gate      │   │ + cache    │
//! └─────────────┘   └──────────────────┘   └───────────┘   └────────────┘
//!
//! ┌─────────────┐   ┌──────────────────┐
//! │ resolve     │──▶│ discovery FSM    │   (consumer side, read-only)
//! │ HTTP probes │   │ well-known/legacy│
//! └─────────────┘   └──────────────────┘
//! ```
//!
//! The algorithms live in the I/O-free [`arw_core`] crate. This crate adds
//! configuration, the filesystem, the network, and the `arw` binary.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`connector_fs`] | Markdown files as content sources |
//! | [`pipeline`] | Parallel build, validation gate, publish, prune |
//! | [`cache_file`] | Hash store persistence |
//! | [`fs_sink`] | Directory artifact sink |
//! | [`resolve`] | HTTP discovery driver |
//! | [`validate_cmd`] | Validate a manifest on disk |
//! | [`index_cmd`] | Paginated content index |
//! | [`logging`] | Tracing subscriber setup |

pub mod cache_file;
pub mod config;
pub mod connector_fs;
pub mod fs_sink;
pub mod index_cmd;
pub mod logging;
pub mod pipeline;
pub mod resolve;
pub mod validate_cmd;
