//! L0 KV engine façade (SPEC_FULL.md §4.1).
//!
//! A thin wrapper around [`rocksdb`] that exposes exactly the operations the
//! storage strategies need and nothing else: open-with-options, put,
//! atomic write-batch, get, a seek/seek_for_prev/seek_to_last iterator, and
//! the handful of statistics counters the DB manager passes through.
//!
//! Everything above this crate treats the underlying engine as an opaque
//! ordered byte-string store; nothing here encodes AddrSlot/Version key
//! formats — that's the strategies' job (`ledgerkv-storage`).

#![warn(missing_docs)]
#![warn(clippy::all)]

mod batch;
mod error;
mod handle;
mod iter;
mod options;
mod stats;

pub use batch::WriteBatch;
pub use error::EngineError;
pub use handle::KvHandle;
pub use iter::KvIterator;
pub use options::EngineOptions;
pub use stats::EngineStats;
