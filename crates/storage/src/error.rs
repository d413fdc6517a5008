//! Storage-layer error type (SPEC_FULL.md §7).

use thiserror::Error;

use ledgerkv_core::AddrSlot;
use ledgerkv_engine::EngineError;

/// Failures surfaced by a [`crate::StorageStrategy`] or
/// [`crate::BatchingCoordinator`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Any L0 engine call failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A RangeList byte blob failed to deserialize. Treated as *not found*
    /// by callers, never propagated as a query failure.
    #[error("corrupt range list for {addr_slot}: {reason}")]
    CorruptRangeList {
        /// The key whose RangeList was unreadable.
        addr_slot: AddrSlot,
        /// Why deserialization failed.
        reason: String,
    },

    /// Pending bytes exceeded the hard ceiling before any flush could bring
    /// them back under it.
    #[error("batch overflow: {pending_bytes} bytes pending exceeds hard ceiling {ceiling_bytes}")]
    BatchOverflow {
        /// Bytes that would be pending had the write been accepted.
        pending_bytes: usize,
        /// The configured hard ceiling.
        ceiling_bytes: usize,
    },

    /// The range-list cache's loader failed with an I/O error (as opposed
    /// to a corrupt-data error, see [`StorageError::CorruptRangeList`]).
    #[error("range list cache load failed: {0}")]
    CacheLoad(String),
}

impl From<StorageError> for ledgerkv_core::Error {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Engine(inner) => inner.into(),
            StorageError::CorruptRangeList { addr_slot, reason } => {
                ledgerkv_core::Error::CorruptRangeList { addr_slot, reason }
            }
            StorageError::BatchOverflow { pending_bytes, ceiling_bytes } => {
                ledgerkv_core::Error::BatchOverflow { pending_bytes, ceiling_bytes }
            }
            StorageError::CacheLoad(reason) => ledgerkv_core::Error::EngineIo(reason),
        }
    }
}
