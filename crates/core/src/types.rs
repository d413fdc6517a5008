//! Domain types shared by every layer: [`AddrSlot`], [`Version`], [`RangeId`],
//! [`Value`] and the [`DataRecord`] triple that ties them together.

use std::fmt;
use std::sync::Arc;

/// Opaque key identifying a mutable cell.
///
/// Nominally the ASCII form `0x<40 hex>#slot<decimal>` (a 20-byte account
/// address plus a storage slot number), but the core treats the bytes as
/// opaque — ordering is lexicographic byte order, which is exactly what
/// [`Ord`] on the inner byte slice gives us.
///
/// Cheap to clone: the bytes are held behind an [`Arc`] since the same
/// `AddrSlot` is cloned into cache keys, WAL-less write records, and
/// benchmark-driver query parameters far more often than it is mutated.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AddrSlot(Arc<[u8]>);

impl AddrSlot {
    /// Build an `AddrSlot` from raw bytes, treating them as opaque.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    /// Build the nominal `0x<40 hex>#slot<decimal>` form from a 20-byte
    /// account address and a slot number.
    pub fn new(address: &[u8; 20], slot: u64) -> Self {
        let text = format!("0x{}#slot{}", hex_lower(address), slot);
        Self(Arc::from(text.into_bytes().into_boxed_slice()))
    }

    /// Borrow the underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key is empty (never true for a well-formed AddrSlot, but
    /// kept for the standard `len`/`is_empty` pairing clippy expects).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for AddrSlot {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for AddrSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) => f.write_str(s),
            Err(_) => write!(f, "{}", hex_lower(&self.0)),
        }
    }
}

impl From<&str> for AddrSlot {
    fn from(s: &str) -> Self {
        Self(Arc::from(s.as_bytes().to_vec().into_boxed_slice()))
    }
}

impl From<String> for AddrSlot {
    fn from(s: String) -> Self {
        Self(Arc::from(s.into_bytes().into_boxed_slice()))
    }
}

fn hex_lower(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out
}

/// 64-bit monotonic sequence number for a group of writes (a.k.a. block number).
///
/// Version 0 is a valid, meaningful version — callers must not treat it as
/// "absent".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version(pub u64);

impl Version {
    /// The sentinel used to seek past every real version for a key
    /// (`u64::MAX`).
    pub const MAX: Version = Version(u64::MAX);

    /// Zero-padded lowercase 16-hex-digit form used by the direct-version
    /// strategy's key encoding (`VERSION|addr_slot:hex16(version)`).
    pub fn hex16(self) -> String {
        format!("{:016x}", self.0)
    }

    /// Zero-padded 10-digit decimal form used by the dual-store strategy's
    /// data-key encoding.
    pub fn pad10(self) -> String {
        format!("{:010}", self.0)
    }

    /// The range this version falls into under `range_size`.
    pub fn range_id(self, range_size: u64) -> RangeId {
        RangeId((self.0 / range_size) as u32)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Version {
    fn from(v: u64) -> Self {
        Version(v)
    }
}

/// 32-bit bucket index for a version, `⌊version / range_size⌋`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RangeId(pub u32);

impl RangeId {
    /// Zero-padded fixed-width (10-digit) decimal rendering of the RangeId.
    ///
    /// Fixed-width padding is mandatory (see SPEC_FULL.md §4.3): plain
    /// decimal only orders correctly within a single magnitude, which is
    /// the bug the dual-store key format must not reintroduce.
    pub fn pad10(self) -> String {
        format!("{:010}", self.0)
    }
}

impl fmt::Display for RangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RangeId {
    fn from(v: u32) -> Self {
        RangeId(v)
    }
}

/// Opaque value bytes. Typically 32 bytes in production traces, but the
/// core places no constraint on length or content.
pub type Value = Vec<u8>;

/// A single write: one value at one version for one key.
///
/// The *same* AddrSlot may appear more than once at the same version within
/// one write batch; which value wins is unspecified (last-applied-wins) and
/// callers should avoid relying on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRecord {
    /// Version (block number) this write is recorded at.
    pub version: Version,
    /// Key being written.
    pub addr_slot: AddrSlot,
    /// Value bytes.
    pub value: Value,
}

impl DataRecord {
    /// Construct a new record.
    pub fn new(version: impl Into<Version>, addr_slot: impl Into<AddrSlot>, value: Value) -> Self {
        Self {
            version: version.into(),
            addr_slot: addr_slot.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_hex16_is_zero_padded_and_sortable() {
        assert_eq!(Version(0).hex16(), "0000000000000000");
        assert_eq!(Version(0xabc).hex16(), "0000000000000abc");
        assert!(Version(0xabc).hex16() < Version(0xabd).hex16());
        assert!(Version(9).hex16() < Version(10).hex16());
    }

    #[test]
    fn version_pad10_sorts_numerically() {
        assert!(Version(9).pad10() < Version(10).pad10());
        assert!(Version(99999).pad10() < Version(100000).pad10());
    }

    #[test]
    fn range_id_pad10_sorts_numerically_across_magnitudes() {
        let r9 = RangeId(9).pad10();
        let r10 = RangeId(10).pad10();
        let r100000 = RangeId(100_000).pad10();
        assert!(r9 < r10);
        assert!(r10 < r100000);
    }

    #[test]
    fn addr_slot_orders_lexicographically() {
        let a = AddrSlot::from("a01");
        let b = AddrSlot::from("a02");
        assert!(a < b);
    }

    #[test]
    fn version_range_id_matches_division() {
        assert_eq!(Version(15_000).range_id(10_000), RangeId(1));
        assert_eq!(Version(9_999).range_id(10_000), RangeId(0));
        assert_eq!(Version(20_000).range_id(10_000), RangeId(2));
    }
}
