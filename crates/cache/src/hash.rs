//! Addr-slot aware hash combiner (SPEC_FULL.md §4.6).

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const SLOT_MARKER: &[u8] = b"#slot";

/// Hash an AddrSlot's raw bytes for segment/bucket selection.
///
/// For the canonical `0x<40 hex>#slot<decimal>` form this splits the address
/// prefix from the trailing decimal slot and combines them as
/// `addr_hash XOR (slot_hash << 16)`, giving better distribution across
/// segments than hashing the whole string when most of the entropy lives in
/// the address prefix and slots cluster in small ranges. Any other byte
/// string falls back to a plain hash of the whole key.
pub fn addr_hash(addr_slot: &[u8]) -> u64 {
    if let Some(pos) = find(addr_slot, SLOT_MARKER) {
        let digits = &addr_slot[pos + SLOT_MARKER.len()..];
        if !digits.is_empty() && digits.iter().all(u8::is_ascii_digit) {
            let slot_hash = digits.iter().fold(0u64, |acc, &b| {
                acc.wrapping_mul(10).wrapping_add((b - b'0') as u64)
            });
            let addr_hash = plain_hash(&addr_slot[..pos]);
            return addr_hash ^ (slot_hash << 16);
        }
    }
    plain_hash(addr_slot)
}

fn plain_hash(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
