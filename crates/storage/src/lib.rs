//! Storage strategies and the write-batching coordinator (SPEC_FULL.md §4.2,
//! §4.3, §4.4).
//!
//! Two alternative encodings of the (AddrSlot, Version) → Value mapping
//! live here, both built on [`ledgerkv_engine`]'s L0 façade and sharing the
//! same [`BatchingCoordinator`] discipline. Neither strategy stores a
//! reference to the other's keys; the DB manager (`ledgerkv-db`) picks
//! exactly one at startup.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod batching;
mod direct_version;
mod dual_store;
mod error;
mod strategy;

pub use batching::{BatchingCoordinator, HandlePuts};
pub use direct_version::DirectVersionStrategy;
pub use dual_store::DualStoreStrategy;
pub use error::StorageError;
pub use strategy::StorageStrategy;

/// Default range width for the dual-store strategy (SPEC_FULL.md §3).
pub const DEFAULT_RANGE_SIZE: u64 = 10_000;
