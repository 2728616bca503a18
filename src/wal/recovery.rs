//! WAL Recovery
//!
//! Rebuilds in-memory state at startup by replaying every persisted line
//! through the same command path live traffic uses.

use super::reader::SegmentReader;
use crate::error::{KvError, Result};
use crate::protocol::Response;

/// Executes one command line
///
/// Implemented by the interpreter; recovery and live traffic share it so
/// their semantics cannot diverge.
pub trait CommandExecutor {
    fn execute(&self, line: &str) -> Result<Response>;
}

/// Result of a recovery operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Number of segment files read
    pub segments_read: usize,

    /// Number of commands replayed successfully
    pub commands_replayed: usize,

    /// Unterminated trailing records that were skipped
    pub torn_tails_dropped: usize,
}

/// Replays a WAL directory into a command executor
pub struct Recovery {
    reader: SegmentReader,
}

impl Recovery {
    pub fn new(reader: SegmentReader) -> Self {
        Self { reader }
    }

    /// Replay every line in order.
    ///
    /// Stops at the first failing line: the store must not start serving
    /// a partially replayed state.
    pub fn replay(&self, executor: &dyn CommandExecutor) -> Result<RecoveryReport> {
        let scan = self.reader.scan()?;
        let mut report = RecoveryReport {
            segments_read: scan.segments.len(),
            commands_replayed: 0,
            torn_tails_dropped: scan.torn_tails,
        };

        for (idx, line) in scan.lines.into_iter().enumerate() {
            if let Err(source) = executor.execute(&line) {
                return Err(KvError::RecoveryReplayFailed {
                    line_no: idx + 1,
                    line,
                    source: Box::new(source),
                });
            }
            report.commands_replayed += 1;
        }

        tracing::info!(
            dir = %self.reader.dir().display(),
            segments = report.segments_read,
            commands = report.commands_replayed,
            torn_tails = report.torn_tails_dropped,
            "WAL recovery complete"
        );
        Ok(report)
    }
}
