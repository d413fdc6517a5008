//! The concurrent read-write coordinator (SPEC_FULL.md §4.7): one writer
//! thread and `M` reader threads driven against a shared [`DbManager`].
//!
//! Two unrelated mutexes guard shared state: one around the writer's
//! latency vector and op counter, one around the *merged* reader latency
//! vector and success counter. Readers accumulate into a thread-local
//! vector lock-free and merge it into the global exactly once, at thread
//! exit, so the steady-state read path never contends on a mutex per query.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rand::Rng;
use tracing::info;

use ledgerkv_core::{AddrSlot, Version};
use ledgerkv_db::DbManager;

use crate::metrics::{LatencyStats, RunReport};
use crate::workload::WorkloadGenerator;

/// Tuning knobs for one coordinator run.
#[derive(Debug, Clone, Copy)]
pub struct CoordinatorConfig {
    /// Records per writer block.
    pub block_size: usize,
    /// Sleep between writer blocks.
    pub write_sleep: Duration,
    /// Warm-up delay between starting the writer and starting readers.
    pub warm_up: Duration,
    /// Total wall-clock duration of the run.
    pub duration: Duration,
    /// Reader thread count. `None` defaults to `2 * available_parallelism`.
    pub reader_count: Option<usize>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            block_size: 10_000,
            write_sleep: Duration::from_secs(3),
            warm_up: Duration::from_secs(1),
            duration: Duration::from_secs(360 * 60),
            reader_count: None,
        }
    }
}

#[derive(Default)]
struct MergedLatencies {
    latencies: Vec<Duration>,
    successes: usize,
}

/// Drives one writer and M readers over a fixed duration and collects
/// per-operation latencies, per §4.7.
pub struct ConcurrentRwCoordinator {
    config: CoordinatorConfig,
}

impl ConcurrentRwCoordinator {
    /// Build a coordinator with the given config.
    pub fn new(config: CoordinatorConfig) -> Self {
        Self { config }
    }

    /// Run the writer/reader mix against `db`, starting writes at
    /// `initial_load_end_block + 1` and sampling reader queries uniformly
    /// over `keys` and over versions in `[initial_load_end_block,
    /// current_max_block]`.
    pub fn run(
        &self,
        db: Arc<DbManager>,
        mut workload: WorkloadGenerator,
        initial_load_end_block: Version,
        keys: Arc<Vec<AddrSlot>>,
    ) -> RunReport {
        let test_running = Arc::new(AtomicBool::new(true));
        let current_max_block = Arc::new(Mutex::new(initial_load_end_block));
        let write_perf_mutex = Arc::new(Mutex::new(MergedLatencies::default()));
        let query_merge_mutex = Arc::new(Mutex::new(MergedLatencies::default()));

        let deadline = Instant::now() + self.config.duration;
        let write_run_start = Instant::now();

        let writer_handle = {
            let db = Arc::clone(&db);
            let running = Arc::clone(&test_running);
            let max_block = Arc::clone(&current_max_block);
            let perf = Arc::clone(&write_perf_mutex);
            let block_size = self.config.block_size;
            let write_sleep = self.config.write_sleep;
            thread::spawn(move || {
                let mut next_version = initial_load_end_block.0.saturating_add(1);
                while running.load(Ordering::SeqCst) && Instant::now() < deadline {
                    let block = workload.generate_block(Version(next_version), block_size);
                    let start = Instant::now();
                    let result = db.write_batch(&block);
                    let elapsed = start.elapsed();
                    if result.is_ok() {
                        *max_block.lock() = Version(next_version);
                    }
                    {
                        let mut perf = perf.lock();
                        perf.latencies.push(elapsed);
                        if result.is_ok() {
                            perf.successes += 1;
                        }
                    }
                    next_version += 1;
                    thread::sleep(write_sleep);
                }
            })
        };

        thread::sleep(self.config.warm_up);

        let reader_count = self
            .config
            .reader_count
            .unwrap_or_else(|| 2 * thread::available_parallelism().map(|n| n.get()).unwrap_or(1));

        info!(reader_count, "starting reader threads");

        let reader_handles: Vec<_> = (0..reader_count)
            .map(|_| {
                let db = Arc::clone(&db);
                let running = Arc::clone(&test_running);
                let max_block = Arc::clone(&current_max_block);
                let merge = Arc::clone(&query_merge_mutex);
                let keys = Arc::clone(&keys);
                thread::spawn(move || {
                    let mut rng = rand::thread_rng();
                    let mut local_latencies = Vec::new();
                    let mut local_successes = 0usize;
                    while running.load(Ordering::SeqCst) && Instant::now() < deadline {
                        if keys.is_empty() {
                            break;
                        }
                        let addr = &keys[rng.gen_range(0..keys.len())];
                        let snapshot = *max_block.lock();
                        let lo = initial_load_end_block.0;
                        let hi = snapshot.0.max(lo);
                        let target = if hi > lo { rng.gen_range(lo..=hi) } else { lo };

                        let start = Instant::now();
                        let result = db.query_historical(addr, Version(target));
                        local_latencies.push(start.elapsed());
                        if matches!(result, Ok(Some(_))) {
                            local_successes += 1;
                        }
                    }
                    let mut merged = merge.lock();
                    merged.latencies.extend(local_latencies);
                    merged.successes += local_successes;
                })
            })
            .collect();

        writer_handle.join().expect("writer thread panicked");
        test_running.store(false, Ordering::SeqCst);
        for handle in reader_handles {
            handle.join().expect("reader thread panicked");
        }
        let write_wall_clock = write_run_start.elapsed();

        let writer_merged = Arc::try_unwrap(write_perf_mutex)
            .unwrap_or_else(|arc| Mutex::new(std::mem::take(&mut *arc.lock())))
            .into_inner();
        let reader_merged = Arc::try_unwrap(query_merge_mutex)
            .unwrap_or_else(|arc| Mutex::new(std::mem::take(&mut *arc.lock())))
            .into_inner();

        let writer_sample_count = writer_merged.latencies.len();
        let reader_sample_count = reader_merged.latencies.len();
        let writer_stats = LatencyStats::compute(writer_merged.latencies, writer_merged.successes, write_wall_clock);
        let reader_stats = LatencyStats::compute(reader_merged.latencies, reader_merged.successes, write_wall_clock);

        info!(writer_sample_count, reader_sample_count, "concurrent run complete");

        RunReport { writer: writer_stats, reader: reader_stats, engine_stats: db.engine_stats().unwrap_or_default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerkv_db::{DbConfig, Strategy};

    #[test]
    fn writer_progresses_and_readers_observe_successes_within_a_short_run() {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(
            DbManager::new(DbConfig {
                db_path: dir.path().join("db"),
                strategy: Strategy::DirectVersion,
                range_size: 10_000,
                max_batch_size_blocks: 5,
                max_batch_size_bytes: 1 << 20,
            })
            .unwrap(),
        );
        db.open(false).unwrap();

        let mut workload = WorkloadGenerator::new(crate::workload::WorkloadConfig {
            total_keys: 1_000,
            seed: 9,
            ..Default::default()
        });
        let preload = workload.generate_full_sweep_block(Version(0), 0, 1_000);
        db.write_initial_load_batch(&preload).unwrap();
        db.flush_all().unwrap();

        let keys = Arc::new(workload.keys().to_vec());
        let coordinator = ConcurrentRwCoordinator::new(CoordinatorConfig {
            block_size: 10,
            write_sleep: Duration::from_millis(50),
            warm_up: Duration::from_millis(50),
            duration: Duration::from_millis(800),
            reader_count: Some(4),
        });

        let report = coordinator.run(Arc::clone(&db), workload, Version(0), keys);

        assert!(report.writer.count >= 1, "writer should complete at least one block");
        assert!(report.reader.count >= 1, "readers should complete at least one query");
        assert!(report.reader.success_rate() > 0.0);

        db.close().unwrap();
    }
}
