//! Cache-layer error type.

use thiserror::Error;

/// Failures surfaced by [`crate::SegmentedCache::get_or_load`].
///
/// Both variants flatten the original error to a string so the result can
/// be cloned out to every waiter of a single-flight call, including ones on
/// a different thread than the loader ran on.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The loader's underlying engine read failed.
    #[error("range list loader I/O failure: {0}")]
    Io(String),

    /// The loader read a RangeList byte blob that failed to deserialize.
    #[error("range list loader found corrupt data: {0}")]
    Corrupt(String),
}
