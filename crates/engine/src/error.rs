//! Engine-layer error type.

use thiserror::Error;

/// Failures surfaced by the L0 façade. Every variant is an `EngineIo`
/// failure in SPEC_FULL.md §7 terms; the split here only preserves which
/// rocksdb call failed, for logging.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `DB::open`/`DB::open_cf` failed.
    #[error("failed to open engine at {path}: {source}")]
    Open {
        /// Path that failed to open.
        path: String,
        /// Underlying rocksdb error.
        #[source]
        source: rocksdb::Error,
    },

    /// A read (`get`, iterator step) failed.
    #[error("engine read failed: {0}")]
    Read(#[source] rocksdb::Error),

    /// A write (`put`, `write`) failed.
    #[error("engine write failed: {0}")]
    Write(#[source] rocksdb::Error),

    /// Removing the on-disk directory for `force_clean` failed.
    #[error("failed to remove existing data at {path}: {source}")]
    RemoveExisting {
        /// Path that could not be removed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl From<EngineError> for ledgerkv_core::Error {
    fn from(e: EngineError) -> Self {
        ledgerkv_core::Error::EngineIo(e.to_string())
    }
}
