//! Benchmark harness binary (SPEC_FULL.md §6): a thin front end over the DB
//! manager and the benchmark driver. Opens the configured strategy, runs an
//! initial-load phase, a hotspot-update + concurrent read/write phase for
//! the configured duration, then prints the aggregate report.

mod config;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::{CliArgs, ResolvedConfig};
use ledgerkv_bench::{format_report, ConcurrentRwCoordinator, CoordinatorConfig, ScenarioRunner, WorkloadConfig, WorkloadGenerator};
use ledgerkv_db::{DbConfig, DbManager};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = ResolvedConfig::resolve(args)?;

    let db = Arc::new(DbManager::new(DbConfig {
        db_path: config.db_path.clone(),
        strategy: config.strategy,
        range_size: config.range_size,
        max_batch_size_blocks: config.batch_size_blocks,
        max_batch_size_bytes: config.max_batch_size_bytes,
    })?);
    db.open(config.clean_data)?;

    let mut workload = WorkloadGenerator::new(WorkloadConfig {
        total_keys: config.total_keys,
        seed: 0,
        ..Default::default()
    });

    let initial = {
        let runner = ScenarioRunner::new(&db);
        runner.run_initial_load_phase(&mut workload, 1, config.total_keys)
    };

    let keys = Arc::new(workload.keys().to_vec());
    let coordinator = ConcurrentRwCoordinator::new(CoordinatorConfig { duration: config.duration, ..Default::default() });
    let report = coordinator.run(Arc::clone(&db), workload, initial.end_version, keys);

    println!("{}", format_report(&report));

    db.close()?;
    Ok(())
}
