//! Single-flight de-duplication of concurrent cache misses (SPEC_FULL.md
//! §4.6).

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use ledgerkv_core::RangeList;

use crate::error::CacheError;

/// Waiters give up on an in-flight call after this long and run the loader
/// themselves; safe because the loader is required to be idempotent.
pub(crate) const WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// In-flight calls older than this are assumed abandoned (e.g. the owning
/// thread panicked before publishing a result) and are dropped from the
/// flight table on the next miss.
pub(crate) const FLIGHT_TIMEOUT: Duration = Duration::from_secs(30);

type FlightResult = Result<RangeList, CacheError>;

enum FlightState {
    Pending,
    Done(FlightResult),
}

/// A shared handle representing one outstanding loader call for a key.
pub(crate) struct Flight {
    state: Mutex<FlightState>,
    cond: Condvar,
    started: Instant,
}

impl Flight {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FlightState::Pending),
            cond: Condvar::new(),
            started: Instant::now(),
        })
    }

    pub(crate) fn is_stale(&self) -> bool {
        self.started.elapsed() > FLIGHT_TIMEOUT
    }

    /// Publish the loader's result and wake every waiter.
    pub(crate) fn publish(&self, result: FlightResult) {
        let mut state = self.state.lock();
        *state = FlightState::Done(result);
        self.cond.notify_all();
    }

    /// Wait up to [`WAIT_TIMEOUT`] for the owning caller to publish a
    /// result. Returns `None` on timeout, meaning the caller should fall
    /// back to running the loader itself.
    pub(crate) fn wait(&self) -> Option<FlightResult> {
        let mut state = self.state.lock();
        let deadline = Instant::now() + WAIT_TIMEOUT;
        loop {
            match &*state {
                FlightState::Done(result) => return Some(result.clone()),
                FlightState::Pending => {
                    let now = Instant::now();
                    if now >= deadline {
                        return None;
                    }
                    let timed_out = self.cond.wait_for(&mut state, deadline - now).timed_out();
                    if timed_out {
                        return match &*state {
                            FlightState::Done(result) => Some(result.clone()),
                            FlightState::Pending => None,
                        };
                    }
                }
            }
        }
    }
}
