//! Segmented LRU + single-flight cache fronting RangeList lookups
//! (SPEC_FULL.md §4.6).
//!
//! Fronts the dual-store strategy's range-index reads. An AddrSlot maps to a
//! segment by [`hash::addr_hash`]; each segment is an independent LRU with
//! its own single-flight loader table, so misses on unrelated keys never
//! contend with each other.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod hash;
mod segment;
mod single_flight;
mod stats;

pub use error::CacheError;
pub use stats::CacheStats;

use ledgerkv_core::RangeList;
use segment::CacheSegment;

/// Default number of independent segments.
pub const DEFAULT_SEGMENTS: usize = 16;
/// Default entries-per-segment capacity.
pub const DEFAULT_SEGMENT_CAPACITY: usize = 1000;

/// A thread-safe AddrSlot → RangeList cache with de-duplicated misses.
pub struct SegmentedCache {
    segments: Vec<CacheSegment>,
}

impl SegmentedCache {
    /// Build a cache with the default segment count and capacity.
    pub fn new() -> Self {
        Self::with_shape(DEFAULT_SEGMENTS, DEFAULT_SEGMENT_CAPACITY)
    }

    /// Build a cache with an explicit segment count and per-segment
    /// capacity.
    pub fn with_shape(segment_count: usize, segment_capacity: usize) -> Self {
        let segment_count = segment_count.max(1);
        let segments = (0..segment_count).map(|_| CacheSegment::new(segment_capacity)).collect();
        Self { segments }
    }

    fn segment_for(&self, key: &[u8]) -> &CacheSegment {
        let idx = (hash::addr_hash(key) as usize) % self.segments.len();
        &self.segments[idx]
    }

    /// Fetch `key`'s RangeList, loading via `loader` on a miss. Concurrent
    /// misses on the same key invoke `loader` at most once.
    pub fn get_or_load<F>(&self, key: &[u8], loader: F) -> Result<RangeList, CacheError>
    where
        F: FnOnce() -> Result<RangeList, CacheError>,
    {
        self.segment_for(key).get_or_load(key, loader)
    }

    /// Warm the cache with a known value, bypassing the loader path.
    pub fn preload(&self, key: &[u8], ranges: RangeList) {
        self.segment_for(key).preload(key, ranges);
    }

    /// Aggregate statistics across every segment.
    pub fn stats(&self) -> CacheStats {
        let mut out = CacheStats::default();
        for segment in &self.segments {
            let s = segment.stats();
            out.hits += s.hits;
            out.total_accesses += s.hits + s.misses;
            out.total_entries += segment.len();
            out.total_memory_bytes += segment.memory_usage();
            out.active_flight_calls += segment.active_flight_count();
        }
        out
    }

    /// Drop every cached entry in every segment.
    pub fn clear_all(&self) {
        for segment in &self.segments {
            segment.clear();
        }
    }
}

impl Default for SegmentedCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerkv_core::RangeId;

    #[test]
    fn preload_then_get_or_load_hits_without_calling_loader() {
        let cache = SegmentedCache::with_shape(4, 10);
        let ranges: RangeList = [RangeId(1), RangeId(2)].into_iter().collect();
        cache.preload(b"a01", ranges.clone());
        let out = cache.get_or_load(b"a01", || panic!("loader must not run")).unwrap();
        assert_eq!(out, ranges);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn distinct_keys_can_land_in_distinct_segments() {
        let cache = SegmentedCache::with_shape(16, 10);
        for i in 0..16u32 {
            let key = format!("0x{:040x}#slot{i}", i);
            cache.preload(key.as_bytes(), RangeList::new());
        }
        let stats = cache.stats();
        assert_eq!(stats.total_entries, 16);
    }

    #[test]
    fn loader_error_propagates_and_is_not_cached() {
        let cache = SegmentedCache::with_shape(1, 10);
        let err = cache
            .get_or_load(b"bad", || Err(CacheError::Io("boom".into())))
            .unwrap_err();
        assert!(matches!(err, CacheError::Io(_)));
        assert_eq!(cache.stats().total_entries, 0);
    }
}
