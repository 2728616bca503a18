//! WAL Batcher
//!
//! Accumulates submitted lines into the current batch and seals batches
//! onto the flush queue.
//!
//! Sealing happens inside the batcher's critical section, so the order
//! batches enter the queue is the order they were created in. The flusher
//! consumes that queue on a single thread, which keeps cross-batch write
//! order equal to submission order.

use std::mem;

use crossbeam::channel::Sender;
use parking_lot::Mutex;

use super::entry::{Batch, FlushTrigger, LogEntry};
use crate::error::{WalError, WalResult};
use crate::sync::Waiter;

struct Pending {
    entries: Vec<LogEntry>,
    next_seq: u64,
    accepted: u64,
    closed: bool,
}

/// Collects entries and hands full (or timed-out) batches to the flusher
pub struct Batcher {
    batch_size: usize,
    pending: Mutex<Pending>,
    queue: Sender<Batch>,
}

impl Batcher {
    /// Create a batcher sealing onto `queue` every `batch_size` entries
    pub fn new(batch_size: usize, queue: Sender<Batch>) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            batch_size,
            pending: Mutex::new(Pending {
                entries: Vec::with_capacity(batch_size),
                next_seq: 0,
                accepted: 0,
                closed: false,
            }),
            queue,
        }
    }

    /// Append a line to the current batch.
    ///
    /// Never performs I/O. When the batch reaches `batch_size` it is sealed
    /// onto the flush queue and a fresh batch starts. After [`close`] the
    /// returned waiter is already resolved with [`WalError::Closed`].
    ///
    /// [`close`]: Batcher::close
    pub fn submit(&self, payload: String) -> Waiter<WalResult> {
        let mut pending = self.pending.lock();
        if pending.closed {
            return Waiter::resolved(Err(WalError::Closed));
        }

        let (entry, waiter) = LogEntry::new(payload);
        pending.entries.push(entry);
        pending.accepted += 1;

        if pending.entries.len() >= self.batch_size {
            self.seal_locked(&mut pending, FlushTrigger::Size);
        }
        waiter
    }

    /// Seal the current batch if it holds anything. Returns whether a batch
    /// was queued.
    pub fn seal(&self, trigger: FlushTrigger) -> bool {
        let mut pending = self.pending.lock();
        if pending.closed {
            return false;
        }
        self.seal_locked(&mut pending, trigger)
    }

    /// Seal the remainder as the shutdown batch and refuse further
    /// submissions. Only the first call does anything.
    pub fn close(&self) -> bool {
        let mut pending = self.pending.lock();
        if pending.closed {
            return false;
        }
        self.seal_locked(&mut pending, FlushTrigger::Shutdown);
        pending.closed = true;
        true
    }

    pub fn is_closed(&self) -> bool {
        self.pending.lock().closed
    }

    /// Submissions taken since creation (rejected ones excluded)
    pub fn accepted(&self) -> u64 {
        self.pending.lock().accepted
    }

    /// Entries waiting in the current (unsealed) batch
    pub fn pending_len(&self) -> usize {
        self.pending.lock().entries.len()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn seal_locked(&self, pending: &mut Pending, trigger: FlushTrigger) -> bool {
        if pending.entries.is_empty() {
            return false;
        }

        let entries = mem::replace(
            &mut pending.entries,
            Vec::with_capacity(self.batch_size),
        );
        let batch = Batch {
            seq: pending.next_seq,
            trigger,
            entries,
        };
        pending.next_seq += 1;

        match self.queue.send(batch) {
            Ok(()) => true,
            Err(err) => {
                // Flusher is gone; dropping the batch resolves its entries
                // with `Closed`.
                let batch = err.into_inner();
                tracing::warn!(
                    seq = batch.seq,
                    entries = batch.len(),
                    "flush queue disconnected, failing batch"
                );
                false
            }
        }
    }
}
