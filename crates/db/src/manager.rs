//! DB manager (SPEC_FULL.md §4.5): owns the L0 handle(s) via exactly one
//! storage strategy, and is the only place that knows how to open one.

use parking_lot::RwLock;
use tracing::info;

use ledgerkv_core::{AddrSlot, DataRecord, Value, Version};
use ledgerkv_engine::{EngineOptions, EngineStats};
use ledgerkv_storage::{DirectVersionStrategy, DualStoreStrategy, StorageStrategy};

use crate::config::{DbConfig, Strategy};
use crate::error::DbError;

/// Owns paths, the open strategy, and routes every read/write to it.
///
/// Reads and writes take a shared (`read`) lock on the strategy slot, so
/// concurrent callers never serialize on the DB manager itself — only
/// `open`/`close` take the exclusive lock, and only briefly. Concurrency
/// within a single L0 handle is the engine's and the batching coordinator's
/// job, not this layer's.
pub struct DbManager {
    config: DbConfig,
    strategy: RwLock<Option<Box<dyn StorageStrategy>>>,
}

impl DbManager {
    /// Build a manager for `config`. Does not open anything yet.
    pub fn new(config: DbConfig) -> Result<Self, DbError> {
        config.validate()?;
        Ok(Self { config, strategy: RwLock::new(None) })
    }

    /// Open the configured strategy.
    ///
    /// If `force_clean` is set, any existing on-disk data is deleted first.
    /// Calling `open` a second time while already open is idempotent: it
    /// logs a warning and keeps the existing handle (SPEC_FULL.md §7
    /// `AlreadyOpen`).
    pub fn open(&self, force_clean: bool) -> Result<(), DbError> {
        let mut slot = self.strategy.write();
        if slot.is_some() {
            tracing::warn!(path = %self.config.db_path.display(), "database already open, reusing existing handle");
            return Ok(());
        }

        let engine_opts = EngineOptions::default();
        let strategy: Box<dyn StorageStrategy> = match self.config.strategy {
            Strategy::DirectVersion => Box::new(DirectVersionStrategy::open(
                &self.config.db_path,
                engine_opts,
                force_clean,
                self.config.max_batch_size_blocks,
                self.config.max_batch_size_bytes,
            )?),
            Strategy::DualRangePartitioned => Box::new(DualStoreStrategy::open(
                &self.config.db_path,
                engine_opts,
                force_clean,
                self.config.range_size,
                self.config.max_batch_size_blocks,
                self.config.max_batch_size_bytes,
            )?),
        };

        info!(path = %self.config.db_path.display(), strategy = ?self.config.strategy, "database opened");
        *slot = Some(strategy);
        Ok(())
    }

    /// Flush any pending batch and drop the strategy, releasing the L0
    /// handle(s). Idempotent: closing an already-closed manager is a no-op.
    pub fn close(&self) -> Result<(), DbError> {
        let mut slot = self.strategy.write();
        if let Some(strategy) = slot.take() {
            strategy.flush_all()?;
            info!("database closed");
        }
        Ok(())
    }

    /// Immediate-mode write of one block (hotspot-update workload).
    pub fn write_batch(&self, records: &[DataRecord]) -> Result<(), DbError> {
        self.with_strategy(|s| s.write_batch(records))
    }

    /// Deferred-mode write of one block (initial-load workload).
    pub fn write_initial_load_batch(&self, records: &[DataRecord]) -> Result<(), DbError> {
        self.with_strategy(|s| s.write_initial_load_batch(records))
    }

    /// Force any pending deferred-mode batch to flush now.
    pub fn flush_all(&self) -> Result<(), DbError> {
        self.with_strategy(|s| s.flush_all())
    }

    /// The value at the greatest written version for `addr`, if any.
    pub fn query_latest(&self, addr: &AddrSlot) -> Result<Option<Value>, DbError> {
        self.with_strategy(|s| s.query_latest(addr))
    }

    /// The value at the greatest written version `<= at`, if any.
    pub fn query_historical(&self, addr: &AddrSlot, at: Version) -> Result<Option<Value>, DbError> {
        self.with_strategy(|s| s.query_historical(addr, at))
    }

    /// Engine statistics for every L0 handle the open strategy owns.
    pub fn engine_stats(&self) -> Result<Vec<EngineStats>, DbError> {
        self.with_strategy(|s| Ok(s.engine_stats()))
    }

    /// The config this manager was built from.
    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    fn with_strategy<T>(
        &self,
        f: impl FnOnce(&dyn StorageStrategy) -> Result<T, ledgerkv_storage::StorageError>,
    ) -> Result<T, DbError> {
        let slot = self.strategy.read();
        let strategy = slot.as_deref().ok_or(DbError::NotOpen)?;
        Ok(f(strategy)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &tempfile::TempDir, strategy: Strategy) -> DbConfig {
        DbConfig {
            db_path: dir.path().join("db"),
            strategy,
            range_size: 10_000,
            max_batch_size_blocks: 5,
            max_batch_size_bytes: 1 << 20,
        }
    }

    #[test]
    fn ops_before_open_return_not_open() {
        let dir = tempfile::tempdir().unwrap();
        let db = DbManager::new(config(&dir, Strategy::DirectVersion)).unwrap();
        let err = db.query_latest(&AddrSlot::from("a")).unwrap_err();
        assert!(matches!(err, DbError::NotOpen));
    }

    #[test]
    fn open_write_query_close_roundtrip_both_strategies() {
        for strategy in [Strategy::DirectVersion, Strategy::DualRangePartitioned] {
            let dir = tempfile::tempdir().unwrap();
            let db = DbManager::new(config(&dir, strategy)).unwrap();
            db.open(false).unwrap();
            db.write_batch(&[DataRecord::new(Version(1), "a", b"v1".to_vec())]).unwrap();
            assert_eq!(db.query_latest(&AddrSlot::from("a")).unwrap(), Some(b"v1".to_vec()));
            db.close().unwrap();
        }
    }

    #[test]
    fn reopen_while_open_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db = DbManager::new(config(&dir, Strategy::DirectVersion)).unwrap();
        db.open(false).unwrap();
        db.write_batch(&[DataRecord::new(Version(1), "a", b"v1".to_vec())]).unwrap();
        db.open(false).unwrap();
        assert_eq!(db.query_latest(&AddrSlot::from("a")).unwrap(), Some(b"v1".to_vec()));
    }

    #[test]
    fn unknown_strategy_name_is_rejected() {
        let err = Strategy::parse("bogus").unwrap_err();
        assert!(matches!(err, DbError::StrategyUnknown(_)));
    }
}
