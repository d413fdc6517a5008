//! Open L0 store handle (SPEC_FULL.md §4.1, §4.5 `force_clean`).

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{EngineError, EngineOptions, EngineStats, KvIterator, WriteBatch};

/// An open handle to one L0 ordered byte-string store.
///
/// Strategies hold one `KvHandle` (Direct-Version) or two (Dual-Store: a
/// latest-value store and a historical-range store). `KvHandle` itself knows
/// nothing about AddrSlot/Version encoding — it only moves bytes.
pub struct KvHandle {
    db: rocksdb::DB,
    path: PathBuf,
    opts: rocksdb::Options,
}

impl KvHandle {
    /// Open (or create) the store at `path`.
    ///
    /// When `force_clean` is set, any existing directory at `path` is
    /// removed first, matching the DB manager's `open(force_clean)` contract
    /// so a benchmark run always starts from an empty store.
    pub fn open(path: impl AsRef<Path>, opts: EngineOptions, force_clean: bool) -> Result<Self, EngineError> {
        let path = path.as_ref();

        if force_clean && path.exists() {
            info!(path = %path.display(), "force_clean: removing existing store");
            std::fs::remove_dir_all(path).map_err(|source| EngineError::RemoveExisting {
                path: path.display().to_string(),
                source,
            })?;
        }

        let rocks_opts = opts.to_rocksdb_options();
        let db = rocksdb::DB::open(&rocks_opts, path).map_err(|source| EngineError::Open {
            path: path.display().to_string(),
            source,
        })?;

        debug!(path = %path.display(), "engine opened");
        Ok(Self { db, path: path.to_path_buf(), opts: rocks_opts })
    }

    /// Path this handle was opened at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Point write.
    pub fn put(&self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Result<(), EngineError> {
        self.db.put(key, value).map_err(EngineError::Write)
    }

    /// Point read.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<Option<Vec<u8>>, EngineError> {
        self.db.get(key).map_err(EngineError::Read)
    }

    /// Atomically apply a batch of puts.
    ///
    /// `sync` forces an fsync of the WAL before returning; the batching
    /// coordinator sets this for immediate-mode flushes and leaves it clear
    /// for deferred-mode flushes, trading durability for initial-load
    /// throughput (SPEC_FULL.md §4.4).
    pub fn write_batch(&self, batch: WriteBatch, sync: bool) -> Result<(), EngineError> {
        let mut write_opts = rocksdb::WriteOptions::default();
        write_opts.set_sync(sync);
        self.db.write_opt(batch.inner, &write_opts).map_err(EngineError::Write)
    }

    /// A raw iterator positioned before the first entry.
    pub fn iterator(&self) -> KvIterator<'_> {
        KvIterator::new(self.db.raw_iterator())
    }

    /// Snapshot of the statistics counters the metrics reporter surfaces.
    pub fn stats(&self) -> EngineStats {
        EngineStats::from_statistics(self.opts.get_statistics())
    }

    /// Force a flush of the memtable to disk, used before reporting
    /// compaction-sensitive statistics in tests.
    pub fn flush(&self) -> Result<(), EngineError> {
        self.db.flush().map_err(EngineError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_put_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let handle = KvHandle::open(dir.path(), EngineOptions::default(), false).unwrap();
        handle.put(b"k1", b"v1").unwrap();
        assert_eq!(handle.get(b"k1").unwrap(), Some(b"v1".to_vec()));
        assert_eq!(handle.get(b"missing").unwrap(), None);
    }

    #[test]
    fn write_batch_is_atomic_and_visible_after_flush() {
        let dir = tempfile::tempdir().unwrap();
        let handle = KvHandle::open(dir.path(), EngineOptions::default(), false).unwrap();
        let mut batch = WriteBatch::new();
        batch.put(b"a", b"1");
        batch.put(b"b", b"2");
        handle.write_batch(batch, true).unwrap();
        assert_eq!(handle.get(b"a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(handle.get(b"b").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn force_clean_removes_prior_contents() {
        let dir = tempfile::tempdir().unwrap();
        {
            let handle = KvHandle::open(dir.path(), EngineOptions::default(), false).unwrap();
            handle.put(b"stale", b"1").unwrap();
        }
        let handle = KvHandle::open(dir.path(), EngineOptions::default(), true).unwrap();
        assert_eq!(handle.get(b"stale").unwrap(), None);
    }

    #[test]
    fn iterator_seek_for_prev_finds_last_key_at_or_below_target() {
        let dir = tempfile::tempdir().unwrap();
        let handle = KvHandle::open(dir.path(), EngineOptions::default(), false).unwrap();
        handle.put(b"a/010", b"v1").unwrap();
        handle.put(b"a/020", b"v2").unwrap();
        handle.put(b"a/030", b"v3").unwrap();

        let mut it = handle.iterator();
        it.seek_for_prev(b"a/025");
        assert!(it.valid());
        assert_eq!(it.key(), Some(&b"a/020"[..]));
        assert_eq!(it.value(), Some(&b"v2"[..]));
    }
}
