//! Initial-load and hotspot-update phase runner, grounded in the original
//! benchmark's `ScenarioRunner`/`StrategyScenarioRunner`.

use ledgerkv_core::Version;
use ledgerkv_db::DbManager;
use ledgerkv_engine::EngineStats;
use tracing::info;

use crate::workload::WorkloadGenerator;

/// Drives the initial-load phase (deferred-mode bulk import) and the
/// hotspot-update phase (immediate-mode writes with interleaved historical
/// queries) against a [`DbManager`], mirroring the original benchmark's two
/// fixed phases.
pub struct ScenarioRunner<'a> {
    db: &'a DbManager,
}

/// Summary of one phase: the last version written and how many blocks were
/// written.
#[derive(Debug, Clone, Copy)]
pub struct PhaseSummary {
    /// Greatest version written during the phase.
    pub end_version: Version,
    /// Number of blocks written.
    pub blocks_written: usize,
}

impl<'a> ScenarioRunner<'a> {
    /// Build a runner over an already-open `db`.
    pub fn new(db: &'a DbManager) -> Self {
        Self { db }
    }

    /// Bulk-load `total_blocks` blocks of `block_size` records each, one
    /// full keyspace sweep per block, via `write_initial_load_batch`
    /// (deferred mode).
    pub fn run_initial_load_phase(
        &self,
        workload: &mut WorkloadGenerator,
        total_blocks: usize,
        block_size: usize,
    ) -> PhaseSummary {
        info!(total_blocks, block_size, "starting initial load phase");
        let mut end_version = Version(0);
        for block_idx in 0..total_blocks {
            let version = Version(block_idx as u64);
            let start = (block_idx * block_size) % workload.keys().len().max(1);
            let records = workload.generate_full_sweep_block(version, start, block_size);
            self.db
                .write_initial_load_batch(&records)
                .expect("initial load batch write failed");
            end_version = version;
        }
        self.db.flush_all().expect("flush after initial load failed");
        info!(?end_version, "initial load phase complete");
        PhaseSummary { end_version, blocks_written: total_blocks }
    }

    /// Apply `total_blocks` hotspot-weighted update blocks via `write_batch`
    /// (immediate mode), running `queries_per_block` historical queries
    /// after each block to sanity-check visibility.
    pub fn run_hotspot_update_phase(
        &self,
        workload: &mut WorkloadGenerator,
        starting_version: Version,
        total_blocks: usize,
        block_size: usize,
        queries_per_block: usize,
    ) -> PhaseSummary {
        info!(total_blocks, block_size, "starting hotspot update phase");
        let mut end_version = starting_version;
        for i in 0..total_blocks {
            let version = Version(starting_version.0 + 1 + i as u64);
            let records = workload.generate_block(version, block_size);
            self.db.write_batch(&records).expect("hotspot update write failed");
            end_version = version;
            self.run_historical_queries(workload, version, queries_per_block);
        }
        info!(?end_version, "hotspot update phase complete");
        PhaseSummary { end_version, blocks_written: total_blocks }
    }

    fn run_historical_queries(&self, workload: &mut WorkloadGenerator, at_most: Version, count: usize) {
        for _ in 0..count {
            let addr = workload.sample_uniform_key();
            let _ = self.db.query_historical(&addr, at_most);
        }
    }

    /// Pull the current statistics off every L0 handle the open strategy
    /// owns.
    pub fn collect_rocksdb_statistics(&self) -> Vec<EngineStats> {
        self.db.engine_stats().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::WorkloadConfig;
    use ledgerkv_db::{DbConfig, Strategy};

    #[test]
    fn initial_load_then_hotspot_update_leave_data_queryable() {
        let dir = tempfile::tempdir().unwrap();
        let db = DbManager::new(DbConfig {
            db_path: dir.path().join("db"),
            strategy: Strategy::DualRangePartitioned,
            range_size: 100,
            max_batch_size_blocks: 3,
            max_batch_size_bytes: 1 << 20,
        })
        .unwrap();
        db.open(false).unwrap();

        let mut workload = WorkloadGenerator::new(WorkloadConfig { total_keys: 20, seed: 11, ..Default::default() });
        let runner = ScenarioRunner::new(&db);

        let initial = runner.run_initial_load_phase(&mut workload, 5, 20);
        assert_eq!(initial.blocks_written, 5);

        let hotspot = runner.run_hotspot_update_phase(&mut workload, initial.end_version, 3, 5, 2);
        assert_eq!(hotspot.blocks_written, 3);
        assert!(hotspot.end_version.0 > initial.end_version.0);

        for addr in workload.keys() {
            assert!(db.query_latest(addr).unwrap().is_some());
        }

        let stats = runner.collect_rocksdb_statistics();
        assert!(!stats.is_empty());

        db.close().unwrap();
    }
}
