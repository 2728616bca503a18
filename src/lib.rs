//! # WalKV
//!
//! A small persistent key-value store with:
//! - A batched write-ahead log (size or timer triggered group commit)
//! - Size-based segment rotation with resumption of the latest segment
//! - Crash recovery by replaying every segment through the interpreter
//! - A line-oriented TCP protocol and CLI
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              TCP Server / CLI REPL / Recovery               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  "SET k v" / "GET k" / "DEL k"
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Interpreter                            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Engine                               │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │ 1. log (blocks until durable)    │ 2. apply
//!            ▼                                  ▼
//!   ┌─────────────────┐                 ┌─────────────┐
//!   │       WAL       │                 │  MemTable   │
//!   │ batcher→flusher │                 │  (RwLock)   │
//!   └────────┬────────┘                 └─────────────┘
//!            ▼
//!   ┌─────────────────┐
//!   │  segment files  │
//!   │ 20240101T...wal │
//!   └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod types;
pub mod sync;

pub mod wal;
pub mod memtable;
pub mod protocol;
pub mod interpreter;
pub mod network;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result, WalError};
pub use config::Config;
pub use engine::Engine;
pub use types::{Key, Value};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of WalKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
