//! Direct-Version strategy: a single store keyed by `VERSION|A:hex16(V)`
//! (SPEC_FULL.md §4.2).

use ledgerkv_core::{AddrSlot, DataRecord, Value, Version};
use ledgerkv_engine::{EngineOptions, KvHandle};

use crate::batching::BatchingCoordinator;
use crate::error::StorageError;
use crate::strategy::StorageStrategy;

const KEY_PREFIX: &[u8] = b"VERSION|";

fn prefix(addr: &AddrSlot) -> Vec<u8> {
    let mut buf = Vec::with_capacity(KEY_PREFIX.len() + addr.len() + 1);
    buf.extend_from_slice(KEY_PREFIX);
    buf.extend_from_slice(addr.as_bytes());
    buf.push(b':');
    buf
}

fn key(addr: &AddrSlot, version: Version) -> Vec<u8> {
    let mut buf = prefix(addr);
    buf.extend_from_slice(version.hex16().as_bytes());
    buf
}

/// Single ordered store, one key per (AddrSlot, Version) pair ever written.
pub struct DirectVersionStrategy {
    handle: KvHandle,
    coordinator: BatchingCoordinator,
}

impl DirectVersionStrategy {
    /// Open the store at `path` and build its batching coordinator.
    pub fn open(
        path: impl AsRef<std::path::Path>,
        engine_opts: EngineOptions,
        force_clean: bool,
        max_batch_blocks: usize,
        max_batch_bytes: usize,
    ) -> Result<Self, StorageError> {
        let handle = KvHandle::open(path, engine_opts, force_clean)?;
        let coordinator =
            BatchingCoordinator::new(1, max_batch_blocks, max_batch_bytes, max_batch_bytes.saturating_mul(4));
        Ok(Self { handle, coordinator })
    }

    fn puts_for(records: &[DataRecord]) -> Vec<crate::batching::HandlePuts> {
        vec![records
            .iter()
            .map(|r| (key(&r.addr_slot, r.version), r.value.clone()))
            .collect()]
    }

    fn seek_value(&self, addr: &AddrSlot, sentinel: &[u8]) -> Result<Option<Value>, StorageError> {
        let mut it = self.handle.iterator();
        it.seek_for_prev(sentinel);
        if !it.valid() {
            return Ok(None);
        }
        let p = prefix(addr);
        match it.key() {
            Some(k) if k.starts_with(&p) => Ok(it.value().map(<[u8]>::to_vec)),
            _ => Ok(None),
        }
    }
}

impl StorageStrategy for DirectVersionStrategy {
    fn write_batch(&self, records: &[DataRecord]) -> Result<(), StorageError> {
        self.coordinator.write_immediate(&[&self.handle], Self::puts_for(records))
    }

    fn write_initial_load_batch(&self, records: &[DataRecord]) -> Result<(), StorageError> {
        self.coordinator.write_deferred(&[&self.handle], Self::puts_for(records))
    }

    fn flush_all(&self) -> Result<(), StorageError> {
        self.coordinator.flush_all(&[&self.handle])
    }

    fn query_latest(&self, addr: &AddrSlot) -> Result<Option<Value>, StorageError> {
        self.seek_value(addr, &key(addr, Version::MAX))
    }

    fn query_historical(&self, addr: &AddrSlot, at: Version) -> Result<Option<Value>, StorageError> {
        self.seek_value(addr, &key(addr, at))
    }

    fn engine_stats(&self) -> Vec<ledgerkv_engine::EngineStats> {
        vec![self.handle.stats()]
    }
}
