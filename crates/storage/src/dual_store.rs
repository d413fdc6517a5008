//! Dual-Store Range-Partitioned strategy: a range-index store plus a data
//! store keyed by `R<pad10(range)>|A|<pad10(version)>` (SPEC_FULL.md §4.3).

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::warn;

use ledgerkv_cache::{CacheError, SegmentedCache};
use ledgerkv_core::{AddrSlot, DataRecord, RangeId, RangeList, Value, Version};
use ledgerkv_engine::{EngineOptions, KvHandle};

use crate::batching::{BatchingCoordinator, HandlePuts};
use crate::error::StorageError;
use crate::strategy::StorageStrategy;

/// Sentinel suffix that sorts after every valid [`Version::pad10`] or
/// [`RangeId::pad10`] rendering, used to seek to "the last key under this
/// prefix" via `seek_for_prev`.
const NINES_10: &str = "9999999999";

fn range_prefix(range: RangeId, addr: &AddrSlot) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1 + 10 + 1 + addr.len() + 1);
    buf.push(b'R');
    buf.extend_from_slice(range.pad10().as_bytes());
    buf.push(b'|');
    buf.extend_from_slice(addr.as_bytes());
    buf.push(b'|');
    buf
}

fn data_key(range: RangeId, addr: &AddrSlot, version: Version) -> Vec<u8> {
    let mut buf = range_prefix(range, addr);
    buf.extend_from_slice(version.pad10().as_bytes());
    buf
}

fn range_sentinel(range: RangeId, addr: &AddrSlot) -> Vec<u8> {
    let mut buf = range_prefix(range, addr);
    buf.extend_from_slice(NINES_10.as_bytes());
    buf
}

/// Two co-located L0 stores: a range-index mapping AddrSlot → RangeList, and
/// a data store holding the actual values, partitioned by range.
pub struct DualStoreStrategy {
    range_index: KvHandle,
    data: KvHandle,
    cache: SegmentedCache,
    coordinator: BatchingCoordinator,
    range_size: u64,
}

impl DualStoreStrategy {
    /// Open the range-index store at `<base>_range_index` and the data
    /// store at `<base>_data`.
    pub fn open(
        base_path: impl AsRef<std::path::Path>,
        engine_opts: EngineOptions,
        force_clean: bool,
        range_size: u64,
        max_batch_blocks: usize,
        max_batch_bytes: usize,
    ) -> Result<Self, StorageError> {
        let base = base_path.as_ref();
        let range_index_path = sibling_path(base, "_range_index");
        let data_path = sibling_path(base, "_data");

        let range_index = KvHandle::open(range_index_path, engine_opts, force_clean)?;
        let data = KvHandle::open(data_path, engine_opts, force_clean)?;
        let coordinator =
            BatchingCoordinator::new(2, max_batch_blocks, max_batch_bytes, max_batch_bytes.saturating_mul(4));

        Ok(Self { range_index, data, cache: SegmentedCache::new(), coordinator, range_size })
    }

    fn load_range_list(&self, addr: &AddrSlot) -> Result<RangeList, StorageError> {
        let range_index = &self.range_index;
        let addr_bytes = addr.as_bytes().to_vec();
        let result = self.cache.get_or_load(addr.as_bytes(), move || match range_index.get(&addr_bytes) {
            Ok(Some(bytes)) => {
                RangeList::deserialize(&bytes).map_err(|e| CacheError::Corrupt(e.to_string()))
            }
            Ok(None) => Ok(RangeList::new()),
            Err(e) => Err(CacheError::Io(e.to_string())),
        });

        result.map_err(|e| match e {
            CacheError::Corrupt(reason) => {
                StorageError::CorruptRangeList { addr_slot: addr.clone(), reason }
            }
            CacheError::Io(reason) => StorageError::CacheLoad(reason),
        })
    }

    /// Like [`Self::load_range_list`], but a corrupt RangeList is treated as
    /// *not found* for this key (an empty list) with a `WARN` log, per the
    /// dual-store failure semantics (SPEC_FULL.md §4.3) — I/O errors still
    /// propagate as failures.
    fn load_range_list_for_query(&self, addr: &AddrSlot) -> Result<RangeList, StorageError> {
        match self.load_range_list(addr) {
            Ok(list) => Ok(list),
            Err(StorageError::CorruptRangeList { addr_slot, reason }) => {
                warn!(%addr_slot, %reason, "corrupt range list, treating as not found");
                Ok(RangeList::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Build the range-index and data puts for one block of records,
    /// eliding per-record range-index reads by accumulating the RangeList
    /// delta once per distinct AddrSlot in the block (SPEC_FULL.md §4.3
    /// initial-load fast path).
    ///
    /// Returns the updated RangeLists alongside the puts rather than
    /// preloading the cache itself — the caller must not make the new
    /// ranges visible to readers until the coordinator write they're staged
    /// under has actually succeeded.
    fn puts_for(&self, records: &[DataRecord]) -> Result<([HandlePuts; 2], HashMap<AddrSlot, RangeList>), StorageError> {
        let mut range_updates: HashMap<AddrSlot, RangeList> = HashMap::new();
        let mut data_puts = Vec::with_capacity(records.len());

        for record in records {
            let range = record.version.range_id(self.range_size);
            let list = match range_updates.entry(record.addr_slot.clone()) {
                Entry::Occupied(e) => e.into_mut(),
                Entry::Vacant(v) => v.insert(self.load_range_list(&record.addr_slot)?),
            };
            list.insert(range);
            data_puts.push((data_key(range, &record.addr_slot, record.version), record.value.clone()));
        }

        let range_index_puts = range_updates
            .iter()
            .map(|(addr, list)| (addr.as_bytes().to_vec(), list.serialize()))
            .collect();

        Ok(([range_index_puts, data_puts], range_updates))
    }

    fn preload_cache(&self, range_updates: HashMap<AddrSlot, RangeList>) {
        for (addr, list) in range_updates {
            self.cache.preload(addr.as_bytes(), list);
        }
    }

    fn last_value_under(&self, prefix_buf: &[u8], sentinel: &[u8]) -> Result<Option<Value>, StorageError> {
        let mut it = self.data.iterator();
        it.seek_for_prev(sentinel);
        if !it.valid() {
            return Ok(None);
        }
        match it.key() {
            Some(k) if k.starts_with(prefix_buf) => Ok(it.value().map(<[u8]>::to_vec)),
            _ => Ok(None),
        }
    }
}

impl StorageStrategy for DualStoreStrategy {
    fn write_batch(&self, records: &[DataRecord]) -> Result<(), StorageError> {
        let ([range_index_puts, data_puts], range_updates) = self.puts_for(records)?;
        self.coordinator.write_immediate(&[&self.range_index, &self.data], vec![range_index_puts, data_puts])?;
        self.preload_cache(range_updates);
        Ok(())
    }

    fn write_initial_load_batch(&self, records: &[DataRecord]) -> Result<(), StorageError> {
        let ([range_index_puts, data_puts], range_updates) = self.puts_for(records)?;
        self.coordinator.write_deferred(&[&self.range_index, &self.data], vec![range_index_puts, data_puts])?;
        self.preload_cache(range_updates);
        Ok(())
    }

    fn flush_all(&self) -> Result<(), StorageError> {
        self.coordinator.flush_all(&[&self.range_index, &self.data])
    }

    fn query_latest(&self, addr: &AddrSlot) -> Result<Option<Value>, StorageError> {
        let ranges = self.load_range_list_for_query(addr)?;
        let Some(r_max) = ranges.max() else { return Ok(None) };
        let prefix = range_prefix(r_max, addr);
        let sentinel = range_sentinel(r_max, addr);
        self.last_value_under(&prefix, &sentinel)
    }

    fn query_historical(&self, addr: &AddrSlot, at: Version) -> Result<Option<Value>, StorageError> {
        let ranges = self.load_range_list_for_query(addr)?;
        if ranges.is_empty() {
            return Ok(None);
        }
        let r_t = at.range_id(self.range_size);

        if ranges.contains(r_t) {
            let prefix = range_prefix(r_t, addr);
            let mut sentinel = prefix.clone();
            sentinel.extend_from_slice(at.pad10().as_bytes());
            if let Some(value) = self.last_value_under(&prefix, &sentinel)? {
                return Ok(Some(value));
            }
        }

        // Either R_t wasn't in the list, or it was but every entry in that
        // range is > T (can't happen with monotone per-addr writes, but the
        // range may hold writes from a different relative position). Fall
        // back to the corrected semantics: the latest value of the nearest
        // populated range below R_t.
        match ranges.max_below(r_t) {
            Some(r_prev) => {
                let prefix = range_prefix(r_prev, addr);
                let sentinel = range_sentinel(r_prev, addr);
                self.last_value_under(&prefix, &sentinel)
            }
            None => Ok(None),
        }
    }

    fn engine_stats(&self) -> Vec<ledgerkv_engine::EngineStats> {
        vec![self.range_index.stats(), self.data.stats()]
    }
}

fn sibling_path(base: &std::path::Path, suffix: &str) -> std::path::PathBuf {
    let mut name = base.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    match base.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(name),
        _ => std::path::PathBuf::from(name),
    }
}
