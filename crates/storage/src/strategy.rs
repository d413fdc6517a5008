//! The contract every storage strategy implements (SPEC_FULL.md §4.2, §4.3).

use ledgerkv_core::{AddrSlot, DataRecord, Value, Version};
use ledgerkv_engine::EngineStats;

use crate::error::StorageError;

/// One encoding of the (AddrSlot, Version) → Value mapping over the L0
/// engine.
///
/// The DB manager selects exactly one implementation at startup and never
/// mixes keys of two strategies in the same store.
pub trait StorageStrategy: Send + Sync {
    /// Apply `records` immediately, as used by the hotspot-update workload:
    /// every call is exactly one block, flushed at the call boundary.
    fn write_batch(&self, records: &[DataRecord]) -> Result<(), StorageError>;

    /// Apply `records` under deferred-mode batching, as used by initial
    /// load: the call is staged as one block and only flushed once the
    /// batching coordinator's thresholds are crossed.
    fn write_initial_load_batch(&self, records: &[DataRecord]) -> Result<(), StorageError>;

    /// Force any pending deferred-mode batch to flush now.
    fn flush_all(&self) -> Result<(), StorageError>;

    /// The value at the greatest written version for `addr`, if any.
    fn query_latest(&self, addr: &AddrSlot) -> Result<Option<Value>, StorageError>;

    /// The value at the greatest written version `<= at`, if any.
    fn query_historical(&self, addr: &AddrSlot, at: Version) -> Result<Option<Value>, StorageError>;

    /// Statistics for every L0 handle this strategy owns (one for
    /// direct-version, two for dual-store), passed through unchanged from
    /// the engine layer.
    fn engine_stats(&self) -> Vec<EngineStats>;
}
