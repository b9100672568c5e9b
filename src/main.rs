//! # arw CLI
//!
//! ```bash
//! arw --config ./arw.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `arw build` | Chunk content, build the manifest, write changed artifacts |
//! | `arw validate [FILE]` | Validate a manifest on disk |
//! | `arw resolve <origin>` | Discover a site's manifest over HTTP |
//! | `arw index` | Page through a manifest's content entries |
//!
//! ## Exit status
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | usage or configuration error |
//! | 2 | content defect (validation, format divergence) |
//! | 3 | transient I/O failure or cancellation, retry |
//! | 4 | no manifest discoverable |

use arw::config::{self, Config};
use arw::pipeline::{self, BuildOptions, BuildReport};
use arw::resolve::{HttpFetcher, Resolver};
use arw::{index_cmd, logging, validate_cmd};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Build, validate, and resolve Agent-Ready Web discovery manifests.
#[derive(Parser)]
#[command(name = "arw", version)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Required by `build`. Other commands fall back to defaults when the
    /// file does not exist.
    #[arg(long, global = true, default_value = "./arw.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the manifest and machine views into `output.dir`.
    ///
    /// Only artifacts whose content changed since the last build are
    /// written. Nothing is written if the manifest fails validation.
    Build {
        /// Run every check and list planned writes without writing.
        #[arg(long)]
        dry_run: bool,

        /// Keep artifacts that this build no longer produces.
        #[arg(long)]
        no_prune: bool,
    },

    /// Validate a manifest file.
    ///
    /// Machine-view references are checked against `--root`.
    Validate {
        /// Manifest to check. Defaults to the built well-known manifest.
        file: Option<PathBuf>,

        /// Site root for machine-view existence checks. Defaults to `output.dir`.
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Discover a site's manifest, well-known location first.
    Resolve {
        /// Domain or URL, e.g. `example.com`.
        origin: String,

        /// Give up after this many seconds.
        #[arg(long)]
        deadline_secs: Option<u64>,

        /// Print the resolved manifest as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Print one page of a manifest's content entries as JSON.
    Index {
        /// Manifest to read. Defaults to the built well-known manifest.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Cursor from a previous page's `next_cursor`.
        #[arg(long)]
        cursor: Option<String>,

        /// Entries per page (default 200, max 1000).
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Usage errors exit 1; clap's default of 2 is reserved for content defects.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let loaded = match &cli.command {
        Commands::Build { .. } => config::load_config(&cli.config),
        _ => config::load_config_or_default(&cli.config),
    };
    let cfg = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(1);
        }
    };
    logging::init(&cfg.logging.level);

    let code = match cli.command {
        Commands::Build { dry_run, no_prune } => {
            let options = BuildOptions {
                dry_run,
                prune: cfg.output.prune && !no_prune,
            };
            match pipeline::build_site(&cfg, options).await {
                Ok(report) => {
                    print_report(&report);
                    0
                }
                Err(e) => {
                    if let pipeline::PipelineError::Content(findings) = &e {
                        for f in findings {
                            eprintln!("  {}", f);
                        }
                    }
                    eprintln!("error: {}", e);
                    e.exit_code()
                }
            }
        }
        Commands::Validate { file, root } => {
            match validate_cmd::run_validate(&cfg, file, root) {
                Ok(code) => code,
                Err(e) => {
                    eprintln!("error: {:#}", e);
                    1
                }
            }
        }
        Commands::Resolve {
            origin,
            deadline_secs,
            json,
        } => run_resolve(&cfg, &origin, deadline_secs, json).await,
        Commands::Index {
            file,
            cursor,
            limit,
        } => match index_cmd::run_index(&cfg, file, cursor, limit) {
            Ok(page) => {
                println!("{}", page);
                0
            }
            Err(e) => {
                eprintln!("error: {:#}", e);
                1
            }
        },
    };

    ExitCode::from(code)
}

fn print_report(report: &BuildReport) {
    println!("build{}", if report.dry_run { " (dry-run)" } else { "" });
    println!("  sources: {}", report.sources);
    println!("  entries: {}", report.entries);
    println!("  content errors: {}", report.content_errors.len());
    for e in &report.content_errors {
        println!("    {}", e);
    }
    println!("  warnings: {}", report.warnings.len());
    let verb = if report.dry_run { "would write" } else { "written" };
    println!("  {}: {}", verb, report.written.len());
    for path in &report.written {
        println!("    {}", path);
    }
    println!("  unchanged: {}", report.unchanged);
    let verb = if report.dry_run { "would prune" } else { "pruned" };
    println!("  {}: {}", verb, report.pruned.len());
    for path in &report.pruned {
        println!("    {}", path);
    }
    println!("ok");
}

async fn run_resolve(cfg: &Config, origin: &str, deadline_secs: Option<u64>, json: bool) -> u8 {
    let fetcher = match HttpFetcher::new(cfg.resolver.timeout()) {
        Ok(fetcher) => fetcher.with_max_body_bytes(cfg.resolver.max_body_bytes),
        Err(e) => {
            eprintln!("error: {:#}", e);
            return 3;
        }
    };
    let resolver = Resolver::new(fetcher, cfg.resolver.retry_policy());

    let cancel = async move {
        match deadline_secs {
            Some(secs) => {
                tokio::select! {
                    _ = interrupted() => {}
                    _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
                }
            }
            None => interrupted().await,
        }
    };

    match resolver.resolve_until(origin, cancel).await {
        Ok(resolution) => {
            if json {
                match serde_json::to_string_pretty(&resolution.manifest) {
                    Ok(body) => println!("{}", body),
                    Err(e) => {
                        eprintln!("error: {}", e);
                        return 2;
                    }
                }
            } else {
                println!("resolve {}", origin);
                println!("  location: {}", resolution.location.path());
                println!("  site: {}", resolution.manifest.site.name);
                println!("  version: {}", resolution.manifest.version);
                println!("  profile: {}", resolution.manifest.profile);
                println!("  entries: {}", resolution.manifest.content.len());
                println!("ok");
            }
            0
        }
        Err(e) => {
            eprintln!("error: {}", e);
            e.exit_code()
        }
    }
}

/// Completes on Ctrl-C. Never completes if the signal cannot be installed.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
