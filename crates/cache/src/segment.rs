//! One LRU segment with an integrated single-flight de-duplicator
//! (SPEC_FULL.md §4.6).

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::warn;

use ledgerkv_core::RangeList;

use crate::error::CacheError;
use crate::single_flight::Flight;

/// Per-segment hit/miss counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentStats {
    /// Cache hits served from the LRU without invoking the loader.
    pub hits: u64,
    /// Cache misses that invoked (or waited on) the loader.
    pub misses: u64,
}

impl SegmentStats {
    /// Fraction of accesses served from cache, in `[0.0, 1.0]`. `0.0` when
    /// the segment has never been accessed.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Per-entry overhead folded into [`CacheSegment::memory_usage`]'s estimate,
/// covering the LRU list node and hash bucket.
const NODE_OVERHEAD_BYTES: usize = 48;

struct Inner {
    lru: LruCache<Vec<u8>, RangeList>,
    flights: std::collections::HashMap<Vec<u8>, Arc<Flight>>,
    hits: u64,
    misses: u64,
}

/// A single shard of the segmented cache: an LRU map from AddrSlot bytes to
/// RangeList plus its own in-flight loader table, all guarded by one mutex.
///
/// `lru::LruCache::get` requires `&mut self` to record recency, so a plain
/// mutex (rather than a reader-writer lock) is the right primitive here —
/// every access, hit or miss, needs exclusive access to reorder the list.
pub struct CacheSegment {
    inner: Mutex<Inner>,
}

impl CacheSegment {
    /// A segment holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity clamped to >= 1");
        Self {
            inner: Mutex::new(Inner {
                lru: LruCache::new(capacity),
                flights: std::collections::HashMap::new(),
                hits: 0,
                misses: 0,
            }),
        }
    }

    /// Fetch `key`'s RangeList, invoking `loader` at most once across all
    /// concurrent callers that observe the same miss.
    pub fn get_or_load<F>(&self, key: &[u8], loader: F) -> Result<RangeList, CacheError>
    where
        F: FnOnce() -> Result<RangeList, CacheError>,
    {
        let mut guard = self.inner.lock();
        if let Some(ranges) = guard.lru.get(key) {
            guard.hits += 1;
            return Ok(ranges.clone());
        }
        guard.misses += 1;
        guard.flights.retain(|_, flight| !flight.is_stale());

        if let Some(flight) = guard.flights.get(key).cloned() {
            drop(guard);
            if let Some(result) = flight.wait() {
                return result;
            }
            warn!("single-flight wait timed out, running loader redundantly");
            return loader();
        }

        let flight = Flight::new();
        guard.flights.insert(key.to_vec(), flight.clone());
        drop(guard);

        let result = loader();

        let mut guard = self.inner.lock();
        guard.flights.remove(key);
        if let Ok(ranges) = &result {
            guard.lru.put(key.to_vec(), ranges.clone());
        }
        drop(guard);

        flight.publish(result.clone());
        result
    }

    /// Insert a value directly, bypassing the loader/single-flight path.
    pub fn preload(&self, key: &[u8], ranges: RangeList) {
        self.inner.lock().lru.put(key.to_vec(), ranges);
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.inner.lock().lru.len()
    }

    /// Whether the segment holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Estimated bytes retained by this segment's entries.
    pub fn memory_usage(&self) -> usize {
        self.inner
            .lock()
            .lru
            .iter()
            .map(|(key, ranges)| key.len() + 4 * ranges.len() + NODE_OVERHEAD_BYTES)
            .sum()
    }

    /// Number of loader calls currently outstanding.
    pub fn active_flight_count(&self) -> usize {
        self.inner.lock().flights.len()
    }

    /// Snapshot of this segment's hit/miss counters.
    pub fn stats(&self) -> SegmentStats {
        let guard = self.inner.lock();
        SegmentStats { hits: guard.hits, misses: guard.misses }
    }

    /// Drop every cached entry. Does not cancel in-flight loader calls.
    pub fn clear(&self) {
        self.inner.lock().lru.clear();
    }
}
