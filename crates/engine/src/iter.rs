//! Iterator wrapper exposing exactly the primitives the strategies need
//! (SPEC_FULL.md §4.1): `seek`, `seek_for_prev`, `seek_to_last`, `valid`,
//! `key`, `value`, `next`, `prev`.

/// A forward/reverse iterator over one L0 store.
///
/// Thin wrapper over [`rocksdb::DBRawIterator`], which already exposes this
/// exact primitive set.
pub struct KvIterator<'a> {
    inner: rocksdb::DBRawIterator<'a>,
}

impl<'a> KvIterator<'a> {
    pub(crate) fn new(inner: rocksdb::DBRawIterator<'a>) -> Self {
        Self { inner }
    }

    /// Position at the first key `>= target`.
    pub fn seek(&mut self, target: impl AsRef<[u8]>) {
        self.inner.seek(target);
    }

    /// Position at the last key `<= target`. The conceptually correct
    /// primitive for both strategies' latest/historical lookups.
    pub fn seek_for_prev(&mut self, target: impl AsRef<[u8]>) {
        self.inner.seek_for_prev(target);
    }

    /// Position at the last key in the store.
    pub fn seek_to_last(&mut self) {
        self.inner.seek_to_last();
    }

    /// Whether the iterator currently points at a valid entry.
    pub fn valid(&self) -> bool {
        self.inner.valid()
    }

    /// The current key, if valid.
    pub fn key(&self) -> Option<&[u8]> {
        self.inner.key()
    }

    /// The current value, if valid.
    pub fn value(&self) -> Option<&[u8]> {
        self.inner.value()
    }

    /// Advance to the next key.
    pub fn next(&mut self) {
        self.inner.next();
    }

    /// Step back to the previous key.
    pub fn prev(&mut self) {
        self.inner.prev();
    }
}
