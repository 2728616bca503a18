//! Active WAL
//!
//! Wires the batcher, the segment writer and reader, and the flusher
//! thread behind `write_set` / `write_del` / `recover`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Sender};
use parking_lot::Mutex;

use super::batcher::Batcher;
use super::entry::Operation;
use super::flusher::{FlushStats, FlushStatsSnapshot, Flusher};
use super::reader::SegmentReader;
use super::recovery::{CommandExecutor, Recovery, RecoveryReport};
use super::writer::SegmentWriter;
use crate::config::WalConfig;
use crate::error::{KvError, Result, WalResult};
use crate::sync::Waiter;
use crate::types::{Key, Value};

/// A running write-ahead log
pub struct Wal {
    batcher: Arc<Batcher>,
    writer: Arc<SegmentWriter>,
    reader: SegmentReader,
    stats: Arc<FlushStats>,

    /// Set by the first `recover` call
    recovered: AtomicBool,

    shutdown: Mutex<Option<Sender<()>>>,
    flusher: Mutex<Option<JoinHandle<()>>>,
}

impl Wal {
    /// Open the WAL directory and start the flusher thread
    pub fn open(config: &WalConfig) -> Result<Self> {
        let config = config.clone().normalized();

        let writer = Arc::new(SegmentWriter::open(&config.dir, config.max_segment_size)?);
        let reader = SegmentReader::new(&config.dir);

        let (queue_tx, queue_rx) = channel::unbounded();
        let (shutdown_tx, shutdown_rx) = channel::bounded(1);
        let batcher = Arc::new(Batcher::new(config.batch_size, queue_tx));
        let stats = Arc::new(FlushStats::default());

        let flusher = Flusher {
            writer: Arc::clone(&writer),
            batcher: Arc::clone(&batcher),
            queue: queue_rx,
            shutdown: shutdown_rx,
            interval: config.flush_interval(),
            stats: Arc::clone(&stats),
        };
        let handle = thread::Builder::new()
            .name("walkv-wal-flusher".to_string())
            .spawn(move || flusher.run())?;

        tracing::info!(
            dir = %config.dir.display(),
            batch_size = config.batch_size,
            flush_interval_ms = config.flush_interval_ms,
            max_segment_size = config.max_segment_size,
            "WAL opened"
        );

        Ok(Self {
            batcher,
            writer,
            reader,
            stats,
            recovered: AtomicBool::new(false),
            shutdown: Mutex::new(Some(shutdown_tx)),
            flusher: Mutex::new(Some(handle)),
        })
    }

    /// Log `SET key value`; returns once durably persisted
    pub fn write_set(&self, key: &Key, value: &Value) -> Result<()> {
        self.write(Operation::Set {
            key: key.clone(),
            value: value.clone(),
        })
    }

    /// Log `DEL key`; returns once durably persisted
    pub fn write_del(&self, key: &Key) -> Result<()> {
        self.write(Operation::Del { key: key.clone() })
    }

    fn write(&self, op: Operation) -> Result<()> {
        self.submit(&op).wait()?;
        Ok(())
    }

    /// Queue an operation without waiting for it
    pub fn submit(&self, op: &Operation) -> Waiter<WalResult> {
        self.batcher.submit(op.encode())
    }

    /// Replay the whole log through `executor`.
    ///
    /// Runs at most once, and only before the first submission; later calls
    /// fail with [`KvError::RecoveryNotAllowed`]. Replayed lines are already
    /// persisted, so `executor` must apply them without logging them again.
    /// Writes submitted while replay runs are logged as usual.
    pub fn recover(&self, executor: &dyn CommandExecutor) -> Result<RecoveryReport> {
        if self.recovered.swap(true, Ordering::AcqRel) || self.batcher.accepted() > 0 {
            return Err(KvError::RecoveryNotAllowed);
        }
        Recovery::new(self.reader.clone()).replay(executor)
    }

    /// Drain pending entries and stop the flusher. Idempotent.
    pub fn shutdown(&self) {
        if let Some(signal) = self.shutdown.lock().take() {
            // A send error means the flusher already exited
            let _ = signal.send(());
        }
        if let Some(handle) = self.flusher.lock().take() {
            if handle.join().is_err() {
                tracing::error!("WAL flusher thread panicked");
            }
            tracing::info!(stats = ?self.stats.snapshot(), "WAL shut down");
        }
    }

    pub fn stats(&self) -> FlushStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn is_closed(&self) -> bool {
        self.batcher.is_closed()
    }

    pub fn segment_writer(&self) -> &SegmentWriter {
        &self.writer
    }
}

impl Drop for Wal {
    fn drop(&mut self) {
        self.shutdown();
    }
}
