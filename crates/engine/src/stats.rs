//! Statistics pass-through (SPEC_FULL.md §4.1, §10.4).
//!
//! The counters here come from rocksdb's `Statistics` object, not the
//! `DB::Properties` allowlist (`rocksdb.estimate-num-keys` and friends):
//! those two are different subsystems. The Rust binding exposes
//! `Statistics` only as the text dump `Options::get_statistics()` returns
//! (the same format `Statistics::ToString()` produces in C++), so reading a
//! ticker means parsing its `"<name> COUNT : <value>"` line out of that
//! dump rather than calling `property_int_value`.

/// Counters pulled from rocksdb's `Statistics` object, surfaced unchanged up
/// through the DB manager for the metrics reporter.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineStats {
    /// Bloom filter checks that correctly predicted "not present".
    pub bloom_useful: u64,
    /// Bloom filter checks that returned a full positive (key may be
    /// present; a real block read followed).
    pub bloom_full_positive: u64,
    /// Bytes read during background compaction.
    pub compact_read_bytes: u64,
    /// Bytes written during background compaction.
    pub compact_write_bytes: u64,
}

impl EngineStats {
    pub(crate) fn from_statistics(dump: Option<String>) -> Self {
        let dump = dump.unwrap_or_default();
        Self {
            bloom_useful: ticker(&dump, "rocksdb.bloom.filter.useful"),
            bloom_full_positive: ticker(&dump, "rocksdb.bloom.filter.full.positive"),
            compact_read_bytes: ticker(&dump, "rocksdb.compact.read.bytes"),
            compact_write_bytes: ticker(&dump, "rocksdb.compact.write.bytes"),
        }
    }
}

/// Ticker lines in the statistics dump look like `"<name> COUNT : <value>"`.
/// Histogram lines (e.g. `db.get.micros`) start the same way but interleave
/// percentile fields before `COUNT`, so matching the literal `"<name> COUNT : "`
/// prefix is enough to tell the two apart.
fn ticker(dump: &str, name: &str) -> u64 {
    let prefix = format!("{name} COUNT : ");
    dump.lines()
        .find_map(|line| line.strip_prefix(prefix.as_str()))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tickers_and_ignores_histograms() {
        let dump = "rocksdb.block.cache.miss COUNT : 5\n\
                     rocksdb.bloom.filter.useful COUNT : 42\n\
                     rocksdb.bloom.filter.full.positive COUNT : 3\n\
                     rocksdb.compact.read.bytes COUNT : 1024\n\
                     rocksdb.compact.write.bytes COUNT : 2048\n\
                     rocksdb.db.get.micros P50 : 1.0 P95 : 2.0 P99 : 3.0 P100 : 4.0 COUNT : 99 SUM : 100\n";

        let stats = EngineStats::from_statistics(Some(dump.to_string()));
        assert_eq!(stats.bloom_useful, 42);
        assert_eq!(stats.bloom_full_positive, 3);
        assert_eq!(stats.compact_read_bytes, 1024);
        assert_eq!(stats.compact_write_bytes, 2048);
    }

    #[test]
    fn missing_dump_yields_zeroed_stats() {
        let stats = EngineStats::from_statistics(None);
        assert_eq!(stats.bloom_useful, 0);
        assert_eq!(stats.compact_write_bytes, 0);
    }
}
