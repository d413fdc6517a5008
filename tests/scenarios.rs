//! End-to-end scenarios from SPEC_FULL.md §8, exercised against the public
//! crate surface.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ledgerkv::prelude::*;
use ledgerkv_bench::{ConcurrentRwCoordinator, CoordinatorConfig, ScenarioRunner, WorkloadConfig, WorkloadGenerator};

const RANGE_SIZE: u64 = 10_000;

fn scenario_writes() -> Vec<(u64, &'static str)> {
    vec![
        (100, "v100"),
        (500, "v500"),
        (15_000, "v15000"),
        (16_000, "v16000"),
        (25_000, "v25000"),
        (26_000, "v26000"),
    ]
}

fn assert_scenario_assertions(strategy: &dyn StorageStrategy, addr: &AddrSlot) {
    let at = |v: u64| strategy.query_historical(addr, Version(v)).unwrap();
    assert_eq!(at(200), Some(b"v100".to_vec()));
    assert_eq!(at(500), Some(b"v500".to_vec()));
    assert_eq!(at(1_000), Some(b"v500".to_vec()));
    assert_eq!(at(15_500), Some(b"v15000".to_vec()));
    assert_eq!(at(20_000), Some(b"v16000".to_vec()));
    assert_eq!(at(25_500), Some(b"v25000".to_vec()));
    assert_eq!(at(30_000), Some(b"v26000".to_vec()));
    assert_eq!(at(50), None);
}

mod dual_store_inter_range_history {
    use super::*;

    #[test]
    fn scenario_1() {
        let dir = tempfile::tempdir().unwrap();
        let strategy = DualStoreStrategy::open(
            dir.path().join("db"),
            ledgerkv::engine::EngineOptions::default(),
            false,
            RANGE_SIZE,
            5,
            1 << 20,
        )
        .unwrap();
        let addr = AddrSlot::from("a01");
        for (version, value) in scenario_writes() {
            strategy.write_batch(&[DataRecord::new(Version(version), addr.clone(), value.as_bytes().to_vec())]).unwrap();
        }
        assert_scenario_assertions(&strategy, &addr);
    }
}

mod direct_version_same_semantics {
    use super::*;

    #[test]
    fn scenario_2() {
        let dir = tempfile::tempdir().unwrap();
        let strategy =
            DirectVersionStrategy::open(dir.path().join("db"), ledgerkv::engine::EngineOptions::default(), false, 5, 1 << 20)
                .unwrap();
        let addr = AddrSlot::from("a01");
        for (version, value) in scenario_writes() {
            strategy.write_batch(&[DataRecord::new(Version(version), addr.clone(), value.as_bytes().to_vec())]).unwrap();
        }
        assert_scenario_assertions(&strategy, &addr);
    }
}

mod bulk_import_idempotence {
    use super::*;

    // Scenario 4. The exact flush count (ceil(50/3) = 17) is exercised by
    // `ledgerkv-storage`'s batching-coordinator unit test
    // `deferred_mode_flush_count_matches_ceil_of_blocks_over_threshold`,
    // which observes individual handle flushes directly via key
    // visibility; this test checks the externally-observable contract:
    // every key is queryable at its greatest written version after a
    // close/reopen cycle.
    #[test]
    fn scenario_4() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("db");

        let mut workload = WorkloadGenerator::new(WorkloadConfig { total_keys: 10, seed: 5, ..Default::default() });
        let mut last_value = std::collections::HashMap::new();

        {
            let db = DbManager::new(DbConfig {
                db_path: db_path.clone(),
                strategy: Strategy::DualRangePartitioned,
                range_size: RANGE_SIZE,
                max_batch_size_blocks: 3,
                max_batch_size_bytes: 1 << 20,
            })
            .unwrap();
            db.open(false).unwrap();

            for block in 0..50u64 {
                let records = workload.generate_block(Version(block), 10);
                for r in &records {
                    last_value.insert(r.addr_slot.clone(), r.value.clone());
                }
                db.write_initial_load_batch(&records).unwrap();
            }
            db.close().unwrap();
        }

        let db = DbManager::new(DbConfig {
            db_path,
            strategy: Strategy::DualRangePartitioned,
            range_size: RANGE_SIZE,
            max_batch_size_blocks: 3,
            max_batch_size_bytes: 1 << 20,
        })
        .unwrap();
        db.open(false).unwrap();
        for (addr, value) in &last_value {
            assert_eq!(db.query_latest(addr).unwrap(), Some(value.clone()));
        }
        db.close().unwrap();
    }
}

mod single_flight_dedup {
    use super::*;
    use ledgerkv::cache::{CacheError, SegmentedCache};

    #[test]
    fn scenario_5() {
        let cache = Arc::new(SegmentedCache::new());
        let invocations = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let invocations = Arc::clone(&invocations);
                std::thread::spawn(move || {
                    cache
                        .get_or_load(b"shared-key", || {
                            invocations.fetch_add(1, Ordering::SeqCst);
                            std::thread::sleep(Duration::from_millis(50));
                            Ok::<_, CacheError>([RangeId(3), RangeId(7)].into_iter().collect::<RangeList>())
                        })
                        .unwrap()
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(invocations.load(Ordering::SeqCst), 1, "loader should run exactly once");
        let expected: RangeList = [RangeId(3), RangeId(7)].into_iter().collect();
        for r in results {
            assert_eq!(r, expected);
        }
    }
}

mod concurrent_rw_progress {
    use super::*;

    #[test]
    fn scenario_6() {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(
            DbManager::new(DbConfig {
                db_path: dir.path().join("db"),
                strategy: Strategy::DirectVersion,
                range_size: RANGE_SIZE,
                max_batch_size_blocks: 5,
                max_batch_size_bytes: 1 << 20,
            })
            .unwrap(),
        );
        db.open(false).unwrap();

        let mut workload = WorkloadGenerator::new(WorkloadConfig { total_keys: 1_000, seed: 99, ..Default::default() });
        let initial = ScenarioRunner::new(&db).run_initial_load_phase(&mut workload, 1, 1_000);

        let keys = Arc::new(workload.keys().to_vec());
        let coordinator = ConcurrentRwCoordinator::new(CoordinatorConfig {
            block_size: 20,
            write_sleep: Duration::from_millis(200),
            warm_up: Duration::from_millis(100),
            duration: Duration::from_secs(3),
            reader_count: Some(10),
        });

        let report = coordinator.run(Arc::clone(&db), workload, initial.end_version, keys);

        assert!(report.writer.count >= 1, "writer should complete at least one block in 3s");
        assert!(report.reader.count >= 10, "readers should collectively complete multiple queries in 3s");
        assert!(report.reader.success_rate() > 0.0);

        db.close().unwrap();
    }
}
