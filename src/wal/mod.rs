//! Write-Ahead Log (WAL) Module
//!
//! Provides durability guarantees through append-only, batched logging.
//!
//! ## Responsibilities
//! - Encode every mutation as one text line before it takes effect
//! - Group concurrent writes into batches, one `write` + `fsync` per batch
//! - Rotate segments past a size bound, resume the latest one on restart
//! - Replay every persisted line through the live command path on startup
//!
//! ## Write Path
//! ```text
//!  write_set / write_del
//!        │  (encode line, fresh completion handle)
//!        ▼
//!  ┌───────────┐  size reached / timer / shutdown   ┌─────────────┐
//!  │  Batcher  │ ─────────── seal ────────────────► │ flush queue │ (FIFO)
//!  └───────────┘                                    └──────┬──────┘
//!                                                          │ one flusher thread
//!                                                          ▼
//!                                                  ┌───────────────┐
//!                                                  │ SegmentWriter │ rotate? write, fsync
//!                                                  └───────┬───────┘
//!                                                          │ resolve every entry
//!                                                          ▼
//!                                                    caller unblocks
//! ```
//!
//! ## File Layout
//! ```text
//! {wal_dir}/
//!   ├── 20240101T000000.wal          SET foo bar\nDEL foo\n...
//!   ├── 20240101T000000_000001.wal   (same-second rotation)
//!   └── 20240101T000107.wal          (active segment)
//! ```

mod batcher;
mod entry;
mod facade;
mod flusher;
mod log;
mod reader;
mod recovery;
mod writer;

pub use batcher::Batcher;
pub use entry::{Batch, FlushTrigger, LogEntry, Operation};
pub use facade::WriteAheadLog;
pub use flusher::FlushStatsSnapshot;
pub use log::Wal;
pub use reader::{list_segments, SegmentReader, SegmentScan};
pub use recovery::{CommandExecutor, Recovery, RecoveryReport};
pub use writer::{SegmentWriter, SEGMENT_EXTENSION};
