//! WAL Flusher
//!
//! The single background thread that performs every physical write. It
//! consumes the flush queue in order, seals partial batches when the flush
//! interval elapses, and drains exactly once on shutdown.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam::channel::Receiver;
use crossbeam::select;

use super::batcher::Batcher;
use super::entry::{Batch, FlushTrigger};
use super::writer::SegmentWriter;

/// Counters updated after each batch write
#[derive(Debug, Default)]
pub(crate) struct FlushStats {
    size_triggered: AtomicU64,
    timer_triggered: AtomicU64,
    shutdown_triggered: AtomicU64,
    entries_written: AtomicU64,
    failed_batches: AtomicU64,
}

/// Point-in-time copy of the flush counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStatsSnapshot {
    pub size_triggered: u64,
    pub timer_triggered: u64,
    pub shutdown_triggered: u64,
    pub entries_written: u64,
    pub failed_batches: u64,
}

impl FlushStats {
    fn record(&self, trigger: FlushTrigger, entries: usize, ok: bool) {
        let counter = match trigger {
            FlushTrigger::Size => &self.size_triggered,
            FlushTrigger::Timer => &self.timer_triggered,
            FlushTrigger::Shutdown => &self.shutdown_triggered,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        if ok {
            self.entries_written
                .fetch_add(entries as u64, Ordering::Relaxed);
        } else {
            self.failed_batches.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self) -> FlushStatsSnapshot {
        FlushStatsSnapshot {
            size_triggered: self.size_triggered.load(Ordering::Relaxed),
            timer_triggered: self.timer_triggered.load(Ordering::Relaxed),
            shutdown_triggered: self.shutdown_triggered.load(Ordering::Relaxed),
            entries_written: self.entries_written.load(Ordering::Relaxed),
            failed_batches: self.failed_batches.load(Ordering::Relaxed),
        }
    }
}

pub(crate) struct Flusher {
    pub(crate) writer: Arc<SegmentWriter>,
    pub(crate) batcher: Arc<Batcher>,
    pub(crate) queue: Receiver<Batch>,
    pub(crate) shutdown: Receiver<()>,
    pub(crate) interval: Duration,
    pub(crate) stats: Arc<FlushStats>,
}

impl Flusher {
    /// Run until the shutdown signal fires (or its sender is dropped)
    pub(crate) fn run(self) {
        tracing::debug!(interval_ms = self.interval.as_millis() as u64, "WAL flusher started");
        let mut deadline = Instant::now() + self.interval;

        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            select! {
                recv(self.queue) -> msg => match msg {
                    Ok(batch) => {
                        self.flush(batch);
                        deadline = Instant::now() + self.interval;
                    }
                    Err(_) => break,
                },
                recv(self.shutdown) -> _ => {
                    self.drain();
                    break;
                },
                default(timeout) => {
                    self.batcher.seal(FlushTrigger::Timer);
                    deadline = Instant::now() + self.interval;
                },
            }
        }

        tracing::debug!("WAL flusher stopped");
    }

    /// Seal the remainder, then write everything still queued, in order
    fn drain(&self) {
        self.batcher.close();
        let mut drained = 0usize;
        while let Ok(batch) = self.queue.try_recv() {
            drained += batch.len();
            self.flush(batch);
        }
        tracing::debug!(entries = drained, "WAL drained on shutdown");
    }

    fn flush(&self, batch: Batch) {
        let seq = batch.seq;
        let trigger = batch.trigger;
        let entries = batch.len();

        let result = self.writer.write(batch);
        self.stats.record(trigger, entries, result.is_ok());
        tracing::debug!(seq, ?trigger, entries, ok = result.is_ok(), "flushed WAL batch");
    }
}
