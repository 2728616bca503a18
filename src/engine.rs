//! Engine Module
//!
//! The application layer that coordinates the WAL and the MemTable.
//!
//! ## Responsibilities
//! - Log every mutation durably before applying it in memory
//! - Serve reads from the MemTable
//! - Replay the WAL on startup, before any request is accepted
//! - Drain the WAL on close

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

use parking_lot::{Mutex, MutexGuard};

use crate::config::Config;
use crate::error::{KvError, Result};
use crate::interpreter::{Application, Interpreter};
use crate::memtable::MemTable;
use crate::protocol::Response;
use crate::types::{Key, Value};
use crate::wal::{FlushStatsSnapshot, RecoveryReport, WriteAheadLog};

/// Number of per-key write locks
const KEY_LOCK_STRIPES: usize = 64;

/// The main storage engine
///
/// ## Write path
/// `set` / `delete` block until the WAL reports the entry durable, then
/// update the MemTable. A WAL failure is returned to the caller and the
/// MemTable is left untouched, so nothing is acknowledged that a restart
/// would lose.
///
/// ## Concurrency
/// Each connection thread calls the engine directly. A mutation holds its
/// key's stripe lock from the WAL write through the MemTable update, so
/// writes to one key reach the MemTable in log order. Writers on
/// different stripes still share WAL batches.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Durability layer (active or disabled, fixed at open)
    wal: WriteAheadLog,

    /// Current state of every key
    memtable: MemTable,

    /// What startup replay found
    recovery: RecoveryReport,

    /// Striped per-key write locks
    key_locks: Vec<Mutex<()>>,
}

impl Engine {
    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Open the WAL (creates the directory, resumes the latest segment)
    /// 2. Replay every persisted command into the MemTable
    /// 3. Ready to serve requests
    pub fn open(config: Config) -> Result<Self> {
        let wal = WriteAheadLog::open(&config.wal)?;
        let mut engine = Self {
            config,
            wal,
            memtable: MemTable::new(),
            recovery: RecoveryReport::default(),
            key_locks: (0..KEY_LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
        };

        let report = engine.wal.recover(&Interpreter::new(Replay(&engine)))?;
        if report.commands_replayed > 0 {
            tracing::info!(
                commands = report.commands_replayed,
                keys = engine.memtable.len(),
                "state restored from WAL"
            );
        }
        engine.recovery = report;

        Ok(engine)
    }

    /// Open with a WAL directory (convenience method)
    ///
    /// Uses default config with the specified WAL directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().wal_dir(path).build())
    }

    /// Open without durability
    pub fn in_memory() -> Result<Self> {
        Self::open(Config::builder().wal_enabled(false).build())
    }

    /// Execute a request line and build the client response
    pub fn execute_line(&self, line: &str) -> Response {
        Interpreter::new(self).handle(line)
    }

    /// Get a value by key
    pub fn get(&self, key: &Key) -> Result<Value> {
        tracing::trace!(%key, "get");
        self.memtable.get(key).ok_or(KvError::KeyNotFound)
    }

    /// Set a key to a value
    ///
    /// Steps:
    /// 1. Write to WAL (blocks until durable)
    /// 2. Write to MemTable
    pub fn set(&self, key: Key, value: Value) -> Result<()> {
        tracing::debug!(%key, %value, "set");
        let _guard = self.lock_key(&key);
        if let Err(e) = self.wal.write_set(&key, &value) {
            tracing::error!(%key, error = %e, "failed to log set");
            return Err(e);
        }
        self.memtable.set(key, value);
        Ok(())
    }

    /// Delete a key
    ///
    /// Deleting an absent key succeeds (and is still logged).
    pub fn delete(&self, key: &Key) -> Result<()> {
        tracing::debug!(%key, "delete");
        let _guard = self.lock_key(key);
        if let Err(e) = self.wal.write_del(key) {
            tracing::error!(%key, error = %e, "failed to log delete");
            return Err(e);
        }
        self.memtable.delete(key);
        Ok(())
    }

    fn lock_key(&self, key: &Key) -> MutexGuard<'_, ()> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let stripe = (hasher.finish() % self.key_locks.len() as u64) as usize;
        self.key_locks[stripe].lock()
    }

    /// Close the engine gracefully
    ///
    /// Flushes the pending WAL batch; later writes fail.
    pub fn close(&self) {
        self.wal.shutdown();
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.memtable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memtable.is_empty()
    }

    /// Whether writes are persisted
    pub fn is_durable(&self) -> bool {
        self.wal.is_enabled()
    }

    /// What startup replay found
    pub fn recovery_report(&self) -> &RecoveryReport {
        &self.recovery
    }

    /// WAL flush counters
    pub fn wal_stats(&self) -> FlushStatsSnapshot {
        self.wal.stats()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Application for Engine {
    fn get(&self, key: &Key) -> Result<Value> {
        Engine::get(self, key)
    }

    fn set(&self, key: Key, value: Value) -> Result<()> {
        Engine::set(self, key, value)
    }

    fn delete(&self, key: &Key) -> Result<()> {
        Engine::delete(self, key)
    }
}

/// Startup view of the engine: replayed lines are already in the WAL, so
/// mutations go straight to the MemTable.
struct Replay<'a>(&'a Engine);

impl Application for Replay<'_> {
    fn get(&self, key: &Key) -> Result<Value> {
        self.0.get(key)
    }

    fn set(&self, key: Key, value: Value) -> Result<()> {
        self.0.memtable.set(key, value);
        Ok(())
    }

    fn delete(&self, key: &Key) -> Result<()> {
        self.0.memtable.delete(key);
        Ok(())
    }
}
