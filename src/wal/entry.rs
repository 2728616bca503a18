//! WAL Entry definitions
//!
//! Defines the logged operations, the in-flight entry that pairs a payload
//! with its completion handle, and the batch that groups entries for one
//! physical write.

use std::fmt;

use crate::error::{WalError, WalResult};
use crate::sync::{completion_pair, Resolver, Waiter};
use crate::types::{Key, Value};

/// Operations that can be logged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Set a key to a value
    Set { key: Key, value: Value },

    /// Delete a key
    Del { key: Key },
}

impl Operation {
    /// Encode as one command line (without the trailing newline).
    ///
    /// The grammar is the one the interpreter accepts, so a persisted line
    /// can be replayed verbatim.
    pub fn encode(&self) -> String {
        match self {
            Operation::Set { key, value } => format!("SET {} {}", key, value),
            Operation::Del { key } => format!("DEL {}", key),
        }
    }
}

/// A pending write: the encoded line plus the handle its writer waits on
pub struct LogEntry {
    payload: String,
    resolver: Resolver<WalResult>,
}

impl LogEntry {
    /// Create an entry and the waiter connected to it
    pub fn new(payload: String) -> (Self, Waiter<WalResult>) {
        let (resolver, waiter) = completion_pair();
        (Self { payload, resolver }, waiter)
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Deliver the outcome to the waiting writer (first call wins)
    pub fn resolve(&self, result: WalResult) {
        self.resolver.resolve(result);
    }
}

impl Drop for LogEntry {
    fn drop(&mut self) {
        // An entry that never reached the writer must not leave its caller
        // blocked forever. No-op when already resolved.
        self.resolver.resolve(Err(WalError::Closed));
    }
}

impl fmt::Debug for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogEntry")
            .field("payload", &self.payload)
            .field("resolved", &self.resolver.is_resolved())
            .finish()
    }
}

/// Why a batch was sealed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushTrigger {
    /// The batch reached the configured size
    Size,

    /// The flush interval elapsed with a partial batch
    Timer,

    /// Final drain on shutdown
    Shutdown,
}

/// Entries flushed together by one write + sync
#[derive(Debug)]
pub struct Batch {
    /// Creation order, strictly increasing per batcher
    pub seq: u64,

    pub trigger: FlushTrigger,

    /// Submission order
    pub entries: Vec<LogEntry>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Concatenate payloads, one newline-terminated line per entry
    pub fn encode(&self) -> Vec<u8> {
        let capacity = self.entries.iter().map(|e| e.payload.len() + 1).sum();
        let mut buf = Vec::with_capacity(capacity);
        for entry in &self.entries {
            buf.extend_from_slice(entry.payload.as_bytes());
            buf.push(b'\n');
        }
        buf
    }

    /// Resolve every entry with the same outcome
    pub fn resolve_all(&self, result: &WalResult) {
        for entry in &self.entries {
            entry.resolve(result.clone());
        }
    }
}
