//! Error types for WalKV
//!
//! Provides a unified error type for all operations, plus the cloneable
//! [`WalError`] delivered to every waiter of a failed batch.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Outcome of a single WAL entry, as seen by the writer that submitted it
pub type WalResult = std::result::Result<(), WalError>;

/// Unified error type for WalKV operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot access directory {}: {source}", path.display())]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // -------------------------------------------------------------------------
    // Validation Errors
    // -------------------------------------------------------------------------
    #[error("key is not valid")]
    InvalidKey,

    #[error("value is not valid")]
    InvalidValue,

    #[error("invalid command")]
    InvalidCommand,

    #[error("key not found")]
    KeyNotFound,

    // -------------------------------------------------------------------------
    // WAL Errors
    // -------------------------------------------------------------------------
    #[error("WAL error: {0}")]
    Wal(#[from] WalError),

    #[error("WAL recovery must run once, before any write is submitted")]
    RecoveryNotAllowed,

    #[error("WAL replay failed at line {line_no} ({line:?}): {source}")]
    RecoveryReplayFailed {
        line_no: usize,
        line: String,
        #[source]
        source: Box<KvError>,
    },

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Physical persistence failures.
///
/// One error value is shared by every entry of the affected batch, so the
/// I/O cause sits behind an `Arc`.
#[derive(Debug, Clone, Error)]
pub enum WalError {
    #[error("segment rotation failed: {0}")]
    RotationFailed(Arc<io::Error>),

    #[error("segment write failed: {0}")]
    WriteFailed(Arc<io::Error>),

    #[error("short write to WAL: wrote {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    #[error("segment sync failed: {0}")]
    SyncFailed(Arc<io::Error>),

    #[error("WAL is closed")]
    Closed,
}

impl WalError {
    pub(crate) fn rotation(err: io::Error) -> Self {
        WalError::RotationFailed(Arc::new(err))
    }

    pub(crate) fn write(err: io::Error) -> Self {
        WalError::WriteFailed(Arc::new(err))
    }

    pub(crate) fn sync(err: io::Error) -> Self {
        WalError::SyncFailed(Arc::new(err))
    }
}
