//! # ledgerkv
//!
//! A historical-versioned key-value store over an embedded LSM engine.
//!
//! Every write is addressed by `(addr_slot, version)` and is immutable once
//! written: nothing is ever overwritten in place, so both the latest value
//! and any value as of a past version can be queried. Two storage
//! strategies are available — [`storage::DirectVersionStrategy`] (single
//! store, direct version-suffixed keys) and [`storage::DualStoreStrategy`]
//! (range-partitioned index + data store) — selected per [`db::DbConfig`].
//!
//! ## Quick start
//!
//! ```ignore
//! use ledgerkv::prelude::*;
//!
//! let config = DbConfig {
//!     db_path: "./my-db".into(),
//!     strategy: Strategy::DualRangePartitioned,
//!     range_size: 10_000,
//!     max_batch_size_blocks: 64,
//!     max_batch_size_bytes: 4 << 20,
//! };
//! let db = DbManager::new(config)?;
//! db.open(false)?;
//! db.write_batch(&[DataRecord::new(Version(1), "addr", b"value".to_vec())])?;
//! let latest = db.query_latest(&AddrSlot::from("addr"))?;
//! db.close()?;
//! # Ok::<(), ledgerkv_db::DbError>(())
//! ```

#![warn(missing_docs)]

pub use ledgerkv_cache as cache;
pub use ledgerkv_core as core;
pub use ledgerkv_db as db;
pub use ledgerkv_engine as engine;
pub use ledgerkv_storage as storage;

/// Common re-exports for consumers of this crate.
pub mod prelude {
    pub use ledgerkv_core::{AddrSlot, DataRecord, Error, RangeId, RangeList, Result, Value, Version};
    pub use ledgerkv_db::{DbConfig, DbError, DbManager, Strategy};
    pub use ledgerkv_storage::{DirectVersionStrategy, DualStoreStrategy, StorageStrategy};
}
