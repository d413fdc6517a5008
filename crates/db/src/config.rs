//! DB manager configuration (SPEC_FULL.md §4.5, §6, §10.2).

use std::path::PathBuf;

use crate::error::DbError;

/// Which storage strategy a [`crate::DbManager`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Single-store encoding, `VERSION|A:hex16(V)` keys.
    DirectVersion,
    /// Two-store range-partitioned encoding.
    DualRangePartitioned,
}

impl Strategy {
    /// Parse the `--strategy` CLI value. Unrecognized names are rejected at
    /// startup, before any engine handle is opened.
    pub fn parse(name: &str) -> Result<Self, DbError> {
        match name {
            "direct-version" => Ok(Strategy::DirectVersion),
            "dual-range-partitioned" => Ok(Strategy::DualRangePartitioned),
            other => Err(DbError::StrategyUnknown(other.to_string())),
        }
    }
}

/// Everything [`crate::DbManager::open`] needs to know.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// On-disk path: used directly by direct-version, or as the base for
    /// `<path>_range_index`/`<path>_data` by dual-store.
    pub db_path: PathBuf,
    /// Which strategy to open.
    pub strategy: Strategy,
    /// Dual-store only: version bucket width.
    pub range_size: u64,
    /// Deferred-mode flush threshold: block count.
    pub max_batch_size_blocks: usize,
    /// Deferred-mode flush threshold: approximate byte size.
    pub max_batch_size_bytes: usize,
}

impl DbConfig {
    /// Validate field values that would otherwise surface as a confusing
    /// engine-layer failure later (non-positive range size, zero batch
    /// thresholds). Called eagerly at startup.
    pub fn validate(&self) -> Result<(), DbError> {
        if self.range_size == 0 {
            return Err(DbError::InvalidConfig("range_size must be > 0".to_string()));
        }
        if self.max_batch_size_blocks == 0 {
            return Err(DbError::InvalidConfig("max_batch_size_blocks must be > 0".to_string()));
        }
        if self.max_batch_size_bytes == 0 {
            return Err(DbError::InvalidConfig("max_batch_size_bytes must be > 0".to_string()));
        }
        Ok(())
    }
}
