//! Benchmark harness collaborators (SPEC_FULL.md §4.7, §10.3, §10.4): a
//! seedable workload generator, the concurrent read-write coordinator, the
//! phase runner used by the initial-load/hotspot-update scenarios, and a
//! metrics reporter. The `cli` crate wires these together behind a command
//! line; `benches/` wires them into `criterion`.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod coordinator;
mod metrics;
mod scenario;
mod workload;

pub use coordinator::{ConcurrentRwCoordinator, CoordinatorConfig};
pub use metrics::{format_report, LatencyStats, RunReport};
pub use scenario::{PhaseSummary, ScenarioRunner};
pub use workload::{TierSplit, WorkloadConfig, WorkloadGenerator};
