//! Layered config loader (SPEC_FULL.md §6, §10.2): built-in defaults →
//! optional TOML file → CLI flag overrides.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use ledgerkv_db::Strategy;

/// Benchmark harness command-line flags.
#[derive(Debug, Parser)]
#[command(name = "ledgerkv-cli", about = "Historical-versioned KV store benchmark harness")]
pub struct CliArgs {
    /// Storage strategy: `direct-version` or `dual-range-partitioned`.
    #[arg(long)]
    pub strategy: Option<String>,

    /// On-disk path (base path for dual-store's two sibling stores).
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Number of distinct keys in the generated workload.
    #[arg(long)]
    pub total_keys: Option<usize>,

    /// Total run duration, in minutes.
    #[arg(long)]
    pub duration: Option<u64>,

    /// Dual-store version-bucket width.
    #[arg(long)]
    pub range_size: Option<u64>,

    /// Deferred-mode flush threshold: block count.
    #[arg(long)]
    pub batch_size_blocks: Option<usize>,

    /// Deferred-mode flush threshold: approximate byte size.
    #[arg(long)]
    pub max_batch_size_bytes: Option<usize>,

    /// Delete any existing on-disk data before opening.
    #[arg(long)]
    pub clean_data: bool,

    /// Optional TOML config file. CLI flags override file values, which
    /// override the built-in defaults below.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    strategy: Option<String>,
    db_path: Option<PathBuf>,
    total_keys: Option<usize>,
    duration: Option<u64>,
    range_size: Option<u64>,
    batch_size_blocks: Option<usize>,
    max_batch_size_bytes: Option<usize>,
    clean_data: Option<bool>,
}

/// Fully-resolved run configuration, after merging defaults, the optional
/// config file, and CLI flags.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Which storage strategy to open.
    pub strategy: Strategy,
    /// On-disk base path.
    pub db_path: PathBuf,
    /// Number of distinct keys to generate.
    pub total_keys: usize,
    /// Total run duration.
    pub duration: Duration,
    /// Dual-store version-bucket width.
    pub range_size: u64,
    /// Deferred-mode flush threshold: block count.
    pub batch_size_blocks: usize,
    /// Deferred-mode flush threshold: approximate byte size.
    pub max_batch_size_bytes: usize,
    /// Delete any existing on-disk data before opening.
    pub clean_data: bool,
}

impl ResolvedConfig {
    /// Merge `args` over the optional config file over built-in defaults.
    /// Rejects an unknown `--strategy` name and other invalid values
    /// eagerly, before any engine handle is opened.
    pub fn resolve(args: CliArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))?
            }
            None => FileConfig::default(),
        };

        let strategy_name = args
            .strategy
            .or(file.strategy)
            .context("--strategy is required (direct-version | dual-range-partitioned)")?;
        let strategy = Strategy::parse(&strategy_name).map_err(|e| anyhow::anyhow!(e.to_string()))?;

        let db_path = args.db_path.or(file.db_path).unwrap_or_else(|| PathBuf::from("./rocksdb_data"));
        let total_keys = args.total_keys.or(file.total_keys).unwrap_or(1000);
        let duration_minutes = args.duration.or(file.duration).unwrap_or(360);
        let range_size = args.range_size.or(file.range_size).unwrap_or(10_000);
        let batch_size_blocks = args.batch_size_blocks.or(file.batch_size_blocks).unwrap_or(5);
        let max_batch_size_bytes = args
            .max_batch_size_bytes
            .or(file.max_batch_size_bytes)
            .unwrap_or(4usize * 1024 * 1024 * 1024);
        let clean_data = args.clean_data || file.clean_data.unwrap_or(false);

        if total_keys == 0 {
            anyhow::bail!("--total-keys must be > 0");
        }

        Ok(Self {
            strategy,
            db_path,
            total_keys,
            duration: Duration::from_secs(duration_minutes * 60),
            range_size,
            batch_size_blocks,
            max_batch_size_bytes,
            clean_data,
        })
    }
}
