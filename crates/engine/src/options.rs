//! Engine open options (SPEC_FULL.md §4.1, §6).

/// Portable engine configuration applied to every L0 store this crate opens.
///
/// | Option | Value |
/// |---|---|
/// | `create_if_missing` | configurable, default `true` |
/// | `compression` | none |
/// | `filter` | bloom, 10 bits/key |
/// | `statistics` | enabled |
/// | `optimize_filters_for_hits` | on |
/// | `level_compaction_dynamic_level_bytes` | on |
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Create the store directory if it doesn't exist.
    pub create_if_missing: bool,
    /// Hint the table-block cache to skip filter checks on the last level,
    /// since point lookups there are expected to hit.
    pub optimize_filters_for_hits: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            optimize_filters_for_hits: true,
        }
    }
}

impl EngineOptions {
    /// Build the `rocksdb::Options` this configuration maps to.
    pub(crate) fn to_rocksdb_options(self) -> rocksdb::Options {
        let mut opts = rocksdb::Options::default();
        opts.create_if_missing(self.create_if_missing);
        opts.set_compression_type(rocksdb::DBCompressionType::None);
        opts.enable_statistics();
        opts.set_level_compaction_dynamic_level_bytes(true);
        opts.set_optimize_filters_for_hits(self.optimize_filters_for_hits);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        opts.set_block_based_table_factory(&block_opts);

        opts
    }
}
