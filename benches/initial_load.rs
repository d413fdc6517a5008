//! Initial-load workload end to end through the DB manager (SPEC_FULL.md
//! §10.5): bulk-importing blocks via deferred-mode `write_initial_load_batch`
//! for both storage strategies.
//!
//! Run with: cargo bench --bench initial_load

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use ledgerkv_bench::{WorkloadConfig, WorkloadGenerator};
use ledgerkv_db::{DbConfig, DbManager, Strategy};

fn run_initial_load(strategy: Strategy, total_keys: usize, blocks: usize, block_size: usize) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = DbManager::new(DbConfig {
        db_path: dir.path().join("db"),
        strategy,
        range_size: 10_000,
        max_batch_size_blocks: 5,
        max_batch_size_bytes: 4 << 20,
    })
    .expect("valid config");
    db.open(false).expect("open");

    let mut workload = WorkloadGenerator::new(WorkloadConfig { total_keys, seed: 1, ..Default::default() });
    for block_idx in 0..blocks {
        let start = (block_idx * block_size) % total_keys.max(1);
        let records = workload.generate_full_sweep_block(ledgerkv_core::Version(block_idx as u64), start, block_size);
        db.write_initial_load_batch(&records).expect("write_initial_load_batch");
    }
    db.flush_all().expect("flush_all");
    db.close().expect("close");
}

fn initial_load_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("initial_load");

    for strategy in [Strategy::DirectVersion, Strategy::DualRangePartitioned] {
        let label = match strategy {
            Strategy::DirectVersion => "direct-version",
            Strategy::DualRangePartitioned => "dual-range-partitioned",
        };
        group.bench_with_input(BenchmarkId::new("bulk_import", label), &strategy, |b, &strategy| {
            b.iter(|| run_initial_load(strategy, 1_000, 10, 100));
        });
    }

    group.finish();
}

criterion_group!(benches, initial_load_benchmarks);
criterion_main!(benches);
