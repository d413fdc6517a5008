//! Write-batching coordinator (SPEC_FULL.md §4.4).
//!
//! Owned by a strategy, one pending [`WriteBatch`] per L0 handle the
//! strategy writes to (one for direct-version, two for dual-store). All
//! staging and flushing goes through a single mutex so a flush never
//! interleaves with an `add` from another thread.

use parking_lot::Mutex;

use ledgerkv_engine::{KvHandle, WriteBatch};

use crate::error::StorageError;

/// One handle's worth of staged puts for a single block.
pub type HandlePuts = Vec<(Vec<u8>, Vec<u8>)>;

struct State {
    batches: Vec<WriteBatch>,
    pending_blocks: usize,
}

/// Accumulates per-block writes into bounded batches and flushes them
/// atomically, one batch per handle, in the order the caller supplies
/// handles in.
pub struct BatchingCoordinator {
    state: Mutex<State>,
    max_blocks: usize,
    max_bytes: usize,
    hard_ceiling_bytes: usize,
}

impl BatchingCoordinator {
    /// `handle_count` is the number of L0 handles the owning strategy
    /// writes to (1 for direct-version, 2 for dual-store). Flushes trigger
    /// once `pending_blocks >= max_blocks` or `pending_bytes >= max_bytes`.
    /// `hard_ceiling_bytes` is a backstop well above `max_bytes`: pending
    /// bytes crossing it without a flush having relieved them is a fatal
    /// [`StorageError::BatchOverflow`], not just a flush trigger.
    pub fn new(handle_count: usize, max_blocks: usize, max_bytes: usize, hard_ceiling_bytes: usize) -> Self {
        let batches = (0..handle_count).map(|_| WriteBatch::new()).collect();
        Self {
            state: Mutex::new(State { batches, pending_blocks: 0 }),
            max_blocks: max_blocks.max(1),
            max_bytes,
            hard_ceiling_bytes,
        }
    }

    /// Stage one block and flush it immediately, ignoring the deferred
    /// thresholds. Used by the hotspot-update (immediate-mode) write path.
    pub fn write_immediate(&self, handles: &[&KvHandle], puts: Vec<HandlePuts>) -> Result<(), StorageError> {
        let mut state = self.state.lock();
        Self::stage(&mut state, puts);
        state.pending_blocks += 1;
        Self::flush_locked(&mut state, handles, false)
    }

    /// Stage one block under deferred-mode accounting, flushing only once
    /// a threshold is crossed.
    pub fn write_deferred(&self, handles: &[&KvHandle], puts: Vec<HandlePuts>) -> Result<(), StorageError> {
        let mut state = self.state.lock();
        Self::stage(&mut state, puts);
        state.pending_blocks += 1;

        let pending_bytes = Self::pending_bytes(&state);
        if pending_bytes > self.hard_ceiling_bytes {
            return Err(StorageError::BatchOverflow {
                pending_bytes,
                ceiling_bytes: self.hard_ceiling_bytes,
            });
        }
        if state.pending_blocks >= self.max_blocks || pending_bytes >= self.max_bytes {
            Self::flush_locked(&mut state, handles, false)?;
        }
        Ok(())
    }

    /// Force a flush of whatever is pending, even an empty batch (a no-op
    /// in that case). Called on close.
    pub fn flush_all(&self, handles: &[&KvHandle]) -> Result<(), StorageError> {
        let mut state = self.state.lock();
        Self::flush_locked(&mut state, handles, true)
    }

    fn stage(state: &mut State, puts: Vec<HandlePuts>) {
        for (batch, ops) in state.batches.iter_mut().zip(puts) {
            for (key, value) in ops {
                batch.put(key, value);
            }
        }
    }

    fn pending_bytes(state: &State) -> usize {
        state.batches.iter().map(WriteBatch::approx_size_bytes).sum()
    }

    fn flush_locked(state: &mut State, handles: &[&KvHandle], sync: bool) -> Result<(), StorageError> {
        debug_assert_eq!(state.batches.len(), handles.len());
        for (batch_slot, handle) in state.batches.iter_mut().zip(handles) {
            if batch_slot.is_empty() {
                continue;
            }
            let batch = std::mem::replace(batch_slot, WriteBatch::new());
            handle.write_batch(batch, sync)?;
        }
        state.pending_blocks = 0;
        Ok(())
    }
}
