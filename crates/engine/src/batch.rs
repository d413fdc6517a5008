//! Atomic write-batch wrapper (SPEC_FULL.md §4.1, §4.4 size accounting).

/// Per-operation overhead folded into the byte-size cap accounting, covering
/// the rocksdb write-batch record framing.
const PER_OP_OVERHEAD: usize = 100;

/// An accumulating atomic batch of `put` operations destined for one L0
/// handle.
///
/// The batching coordinator (`ledgerkv-storage`) owns one of these per
/// handle it writes to and flushes it via [`KvHandle::write_batch`].
///
/// [`KvHandle::write_batch`]: crate::KvHandle::write_batch
#[derive(Default)]
pub struct WriteBatch {
    pub(crate) inner: rocksdb::WriteBatch,
    approx_bytes: usize,
    ops: usize,
}

impl WriteBatch {
    /// An empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a `put`.
    pub fn put(&mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) {
        let key = key.as_ref();
        let value = value.as_ref();
        self.approx_bytes += key.len() + value.len() + PER_OP_OVERHEAD;
        self.ops += 1;
        self.inner.put(key, value);
    }

    /// Soft byte-size estimate: sum of `key.len + value.len + overhead`
    /// over every staged op. Not meant to be exact, only a bound for the
    /// batching coordinator's flush threshold.
    pub fn approx_size_bytes(&self) -> usize {
        self.approx_bytes
    }

    /// Number of staged operations.
    pub fn len(&self) -> usize {
        self.ops
    }

    /// Whether no operations are staged.
    pub fn is_empty(&self) -> bool {
        self.ops == 0
    }
}
