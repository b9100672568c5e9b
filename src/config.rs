//! TOML configuration for the `arw` binary.
//!
//! ```toml
//! [site]
//! name = "Example"
//! homepage = "https://example.com"
//! contact = "ops@example.com"
//!
//! [content]
//! root = "./docs"
//!
//! [[content.rules]]
//! pattern = "pricing/**"
//! priority = "high"
//! purpose = "product_information"
//!
//! [output]
//! dir = "./public"
//! ```
//!
//! Every other section is optional and falls back to the defaults below.

use anyhow::{bail, Context, Result};
use arw_core::discovery::RetryPolicy;
use arw_core::manifest::{DEFAULT_PROFILE, DEFAULT_VERSION};
use arw_core::models::{Priority, Purpose, Site};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub manifest: ManifestConfig,
    pub content: Option<ContentConfig>,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SiteConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub homepage: String,
    #[serde(default)]
    pub contact: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ManifestConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_profile")]
    pub profile: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            profile: default_profile(),
        }
    }
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}
fn default_profile() -> String {
    DEFAULT_PROFILE.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    pub root: PathBuf,
    /// Prefix joined onto each file's derived URL path.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Evaluated in order; the first matching rule that sets a field wins.
    #[serde(default)]
    pub rules: Vec<ContentRule>,
}

fn default_base_url() -> String {
    "/".to_string()
}
fn default_include_globs() -> Vec<String> {
    vec!["**/*.md".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentRule {
    /// Glob matched against the file path relative to `content.root`.
    pub pattern: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Persisted hash store. Defaults to `<dir>/.arw-cache.json`.
    #[serde(default)]
    pub cache_file: Option<PathBuf>,
    /// Delete artifacts that a previous build wrote but this one did not.
    #[serde(default = "default_true")]
    pub prune: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            cache_file: None,
            prune: true,
        }
    }
}

impl OutputConfig {
    pub fn cache_path(&self) -> PathBuf {
        self.cache_file
            .clone()
            .unwrap_or_else(|| self.dir.join(".arw-cache.json"))
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./public")
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BuildConfig {
    /// Parallel chunking workers. `0` means one per available core.
    #[serde(default)]
    pub workers: usize,
    /// JSON enrichment map keyed by chunk id or `source_id#chunk_id`.
    #[serde(default)]
    pub enrichment: Option<PathBuf>,
}

impl BuildConfig {
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResolverConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
    /// Largest manifest body a probe will read.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ResolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.backoff_base_ms),
            max_delay: Duration::from_millis(self.backoff_max_ms),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}
fn default_max_attempts() -> u32 {
    3
}
fn default_backoff_base_ms() -> u64 {
    500
}
fn default_backoff_max_ms() -> u64 {
    8_000
}
fn default_max_body_bytes() -> usize {
    8 * 1024 * 1024
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Defaults only. Used by commands that work without a config file.
    pub fn minimal() -> Self {
        Self {
            site: SiteConfig::default(),
            manifest: ManifestConfig::default(),
            content: None,
            output: OutputConfig::default(),
            build: BuildConfig::default(),
            resolver: ResolverConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    pub fn site(&self) -> Site {
        Site::new(&self.site.name, &self.site.homepage, &self.site.contact)
    }

    /// Site identity is only needed to build, so it is checked here rather
    /// than in [`load_config`].
    pub fn require_site(&self) -> Result<Site> {
        for (field, value) in [
            ("site.name", &self.site.name),
            ("site.homepage", &self.site.homepage),
            ("site.contact", &self.site.contact),
        ] {
            if value.trim().is_empty() {
                bail!("{} must be set to build a manifest", field);
            }
        }
        Ok(self.site())
    }

    pub fn require_content(&self) -> Result<&ContentConfig> {
        self.content
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("[content] section not configured"))
    }
}

/// Load the config at `path`, or defaults when the file does not exist.
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::minimal())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.manifest.version.trim().is_empty() {
        bail!("manifest.version must not be empty");
    }

    if let Some(content) = &config.content {
        if !content.base_url.starts_with('/')
            && !content.base_url.starts_with("http://")
            && !content.base_url.starts_with("https://")
        {
            bail!(
                "content.base_url must be a path starting with '/' or an http(s) URL, got '{}'",
                content.base_url
            );
        }
        for (i, rule) in content.rules.iter().enumerate() {
            if let Some(priority) = &rule.priority {
                if let Priority::Unknown(raw) = Priority::from(priority.clone()) {
                    bail!(
                        "content.rules[{}].priority: unknown value '{}'. Must be high, normal, or low.",
                        i,
                        raw
                    );
                }
            }
            if let Some(purpose) = &rule.purpose {
                if let Purpose::Unknown(raw) = Purpose::from(purpose.clone()) {
                    bail!(
                        "content.rules[{}].purpose: unknown value '{}'. Must be documentation, \
                         product_information, general, or other.",
                        i,
                        raw
                    );
                }
            }
        }
    }

    if config.resolver.max_attempts == 0 {
        bail!("resolver.max_attempts must be >= 1");
    }
    if config.resolver.timeout_secs == 0 {
        bail!("resolver.timeout_secs must be > 0");
    }
    if config.resolver.max_body_bytes == 0 {
        bail!("resolver.max_body_bytes must be > 0");
    }
    if config.resolver.backoff_base_ms > config.resolver.backoff_max_ms {
        bail!("resolver.backoff_base_ms must not exceed resolver.backoff_max_ms");
    }

    Ok(config)
}
