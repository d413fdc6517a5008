//! Per-AddrSlot sorted set of [`RangeId`]s (SPEC_FULL.md §3, invariant 6).
//!
//! A `RangeList` grows monotonically in cardinality (ranges are never
//! removed) and serializes to a packed little-endian `u32` array, sorted
//! ascending with no duplicates.

use crate::types::RangeId;
use byteorder::{ByteOrder, LittleEndian};

/// Sorted, deduplicated set of [`RangeId`] values for one AddrSlot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeList(Vec<RangeId>);

/// A `RangeList` byte blob had a length that isn't a multiple of 4.
#[derive(Debug, thiserror::Error)]
#[error("corrupt range list: {len} bytes is not a multiple of 4")]
pub struct CorruptRangeList {
    /// The offending byte length.
    pub len: usize,
}

impl RangeList {
    /// An empty range list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert `range` in sorted order if not already present.
    ///
    /// Returns `true` if the list was modified.
    pub fn insert(&mut self, range: RangeId) -> bool {
        match self.0.binary_search(&range) {
            Ok(_) => false,
            Err(idx) => {
                self.0.insert(idx, range);
                true
            }
        }
    }

    /// Whether `range` is present.
    pub fn contains(&self, range: RangeId) -> bool {
        self.0.binary_search(&range).is_ok()
    }

    /// The largest range in the list, if any.
    pub fn max(&self) -> Option<RangeId> {
        self.0.last().copied()
    }

    /// The largest range strictly less than `range`, if any.
    pub fn max_below(&self, range: RangeId) -> Option<RangeId> {
        match self.0.binary_search(&range) {
            Ok(idx) | Err(idx) => idx.checked_sub(1).map(|i| self.0[i]),
        }
    }

    /// Whether the list has no ranges.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of ranges.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate ranges in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = RangeId> + '_ {
        self.0.iter().copied()
    }

    /// Serialize to a packed little-endian `u32` array.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.0.len() * 4];
        for (i, r) in self.0.iter().enumerate() {
            LittleEndian::write_u32(&mut buf[i * 4..i * 4 + 4], r.0);
        }
        buf
    }

    /// Deserialize from a packed little-endian `u32` array.
    ///
    /// The bytes must already be sorted ascending with no duplicates (the
    /// only producer of this format, [`RangeList::serialize`], guarantees
    /// this); this does not re-validate ordering, only that the length is
    /// well-formed.
    pub fn deserialize(data: &[u8]) -> Result<Self, CorruptRangeList> {
        if data.len() % 4 != 0 {
            return Err(CorruptRangeList { len: data.len() });
        }
        let ranges = data
            .chunks_exact(4)
            .map(|c| RangeId(LittleEndian::read_u32(c)))
            .collect();
        Ok(Self(ranges))
    }
}

impl FromIterator<RangeId> for RangeList {
    fn from_iter<T: IntoIterator<Item = RangeId>>(iter: T) -> Self {
        let mut set: Vec<RangeId> = iter.into_iter().collect();
        set.sort_unstable();
        set.dedup();
        Self(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_sorted_unique() {
        let mut rl = RangeList::new();
        assert!(rl.insert(RangeId(2)));
        assert!(rl.insert(RangeId(0)));
        assert!(rl.insert(RangeId(1)));
        assert!(!rl.insert(RangeId(1)));
        assert_eq!(rl.iter().collect::<Vec<_>>(), vec![RangeId(0), RangeId(1), RangeId(2)]);
    }

    #[test]
    fn serialize_roundtrip_is_identity() {
        let rl: RangeList = [RangeId(0), RangeId(1), RangeId(2)].into_iter().collect();
        let bytes = rl.serialize();
        assert_eq!(bytes.len(), 12);
        let back = RangeList::deserialize(&bytes).unwrap();
        assert_eq!(rl, back);
    }

    #[test]
    fn deserialize_rejects_misaligned_length() {
        let err = RangeList::deserialize(&[0u8, 1, 2]).unwrap_err();
        assert_eq!(err.len, 3);
    }

    #[test]
    fn max_below_finds_largest_strictly_smaller() {
        let rl: RangeList = [RangeId(0), RangeId(2), RangeId(5)].into_iter().collect();
        assert_eq!(rl.max_below(RangeId(5)), Some(RangeId(2)));
        assert_eq!(rl.max_below(RangeId(3)), Some(RangeId(2)));
        assert_eq!(rl.max_below(RangeId(0)), None);
    }

    proptest::proptest! {
        #[test]
        fn roundtrip_prop(mut xs: Vec<u32>) {
            xs.truncate(200);
            let rl: RangeList = xs.into_iter().map(RangeId).collect();
            let bytes = rl.serialize();
            let back = RangeList::deserialize(&bytes).unwrap();
            proptest::prop_assert_eq!(rl, back);
        }
    }
}
