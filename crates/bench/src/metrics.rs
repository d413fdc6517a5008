//! Aggregate latency statistics and the metrics reporter (SPEC_FULL.md §4.7,
//! §10.4).

use std::time::Duration;

use ledgerkv_engine::EngineStats;

/// Aggregate statistics over a set of operation latencies: count, avg, min,
/// max, p50/p95/p99, ops/sec and success rate, exactly the set computed in
/// §4.7.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LatencyStats {
    /// Number of operations the stats were computed over.
    pub count: usize,
    /// Number of those operations that succeeded.
    pub successes: usize,
    /// Mean latency.
    pub avg: Duration,
    /// Minimum observed latency.
    pub min: Duration,
    /// Maximum observed latency.
    pub max: Duration,
    /// 50th percentile latency.
    pub p50: Duration,
    /// 95th percentile latency.
    pub p95: Duration,
    /// 99th percentile latency.
    pub p99: Duration,
    /// Operations per second over `wall_clock`.
    pub ops_per_sec: f64,
}

impl LatencyStats {
    /// Compute aggregate stats from a flat list of latencies observed over
    /// `wall_clock` wall time. `successes` counts how many of those
    /// operations were successful (used for the success-rate figure).
    pub fn compute(mut latencies: Vec<Duration>, successes: usize, wall_clock: Duration) -> Self {
        if latencies.is_empty() {
            return Self::default();
        }
        latencies.sort_unstable();
        let count = latencies.len();
        let sum: Duration = latencies.iter().sum();
        let avg = sum / count as u32;
        let min = latencies[0];
        let max = latencies[count - 1];
        let percentile = |p: f64| -> Duration {
            let idx = ((p * count as f64).ceil() as usize).saturating_sub(1).min(count - 1);
            latencies[idx]
        };
        let ops_per_sec = if wall_clock.as_secs_f64() > 0.0 {
            count as f64 / wall_clock.as_secs_f64()
        } else {
            0.0
        };
        Self {
            count,
            successes,
            avg,
            min,
            max,
            p50: percentile(0.50),
            p95: percentile(0.95),
            p99: percentile(0.99),
            ops_per_sec,
        }
    }

    /// Fraction of operations that succeeded, in `[0, 1]`.
    pub fn success_rate(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.successes as f64 / self.count as f64
        }
    }
}

/// Everything the concurrent read-write coordinator measured for one run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Writer-side latency stats.
    pub writer: LatencyStats,
    /// Reader-side latency stats, merged across every reader thread.
    pub reader: LatencyStats,
    /// Per-L0-handle engine statistics at the end of the run.
    pub engine_stats: Vec<EngineStats>,
}

/// Pretty-print a [`RunReport`] the way the benchmark binary reports results.
/// Pure formatting: all aggregation already happened in §4.7.
pub fn format_report(report: &RunReport) -> String {
    let mut out = String::new();
    out.push_str("=== writer ===\n");
    push_latency_block(&mut out, &report.writer);
    out.push_str("=== reader ===\n");
    push_latency_block(&mut out, &report.reader);
    out.push_str("=== engine statistics ===\n");
    for (i, stats) in report.engine_stats.iter().enumerate() {
        out.push_str(&format!(
            "handle[{i}]: bloom_useful={} bloom_full_positive={} compact_read_bytes={} compact_write_bytes={}\n",
            stats.bloom_useful, stats.bloom_full_positive, stats.compact_read_bytes, stats.compact_write_bytes
        ));
    }
    out
}

fn push_latency_block(out: &mut String, stats: &LatencyStats) {
    out.push_str(&format!(
        "count={} success_rate={:.2}% avg={:?} min={:?} max={:?} p50={:?} p95={:?} p99={:?} ops/sec={:.2}\n",
        stats.count,
        stats.success_rate() * 100.0,
        stats.avg,
        stats.min,
        stats.max,
        stats.p50,
        stats.p95,
        stats.p99,
        stats.ops_per_sec,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_latencies_yield_zeroed_stats() {
        let stats = LatencyStats::compute(vec![], 0, Duration::from_secs(1));
        assert_eq!(stats, LatencyStats::default());
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[test]
    fn percentiles_and_bounds_are_sane_on_a_known_sequence() {
        let latencies = (1..=100).map(|ms| Duration::from_millis(ms)).collect::<Vec<_>>();
        let stats = LatencyStats::compute(latencies, 100, Duration::from_secs(1));
        assert_eq!(stats.count, 100);
        assert_eq!(stats.min, Duration::from_millis(1));
        assert_eq!(stats.max, Duration::from_millis(100));
        assert_eq!(stats.p50, Duration::from_millis(50));
        assert_eq!(stats.p95, Duration::from_millis(95));
        assert_eq!(stats.p99, Duration::from_millis(99));
        assert_eq!(stats.success_rate(), 1.0);
    }

    #[test]
    fn format_report_includes_every_section() {
        let report = RunReport {
            writer: LatencyStats::compute(vec![Duration::from_millis(1)], 1, Duration::from_secs(1)),
            reader: LatencyStats::compute(vec![Duration::from_millis(2)], 2, Duration::from_secs(1)),
            engine_stats: vec![EngineStats::default()],
        };
        let text = format_report(&report);
        assert!(text.contains("writer"));
        assert!(text.contains("reader"));
        assert!(text.contains("engine statistics"));
    }
}
