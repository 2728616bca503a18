//! WAL facade
//!
//! The durability contract the engine depends on. Chosen once at startup;
//! the engine never branches on which variant it holds.

use super::flusher::FlushStatsSnapshot;
use super::log::Wal;
use super::recovery::{CommandExecutor, RecoveryReport};
use crate::config::WalConfig;
use crate::error::Result;
use crate::types::{Key, Value};

/// Write-ahead log, either persisting or disabled
pub enum WriteAheadLog {
    /// Batched, segment-rotated log on disk
    Active(Wal),

    /// Accepts every write, persists nothing
    Disabled,
}

impl WriteAheadLog {
    /// Build the variant selected by `config.enabled`
    pub fn open(config: &WalConfig) -> Result<Self> {
        if config.enabled {
            Ok(WriteAheadLog::Active(Wal::open(config)?))
        } else {
            tracing::info!("WAL disabled, running in memory only");
            Ok(WriteAheadLog::Disabled)
        }
    }

    /// Persist `SET key value`. `Ok` means durable.
    pub fn write_set(&self, key: &Key, value: &Value) -> Result<()> {
        match self {
            WriteAheadLog::Active(wal) => wal.write_set(key, value),
            WriteAheadLog::Disabled => Ok(()),
        }
    }

    /// Persist `DEL key`. `Ok` means durable.
    pub fn write_del(&self, key: &Key) -> Result<()> {
        match self {
            WriteAheadLog::Active(wal) => wal.write_del(key),
            WriteAheadLog::Disabled => Ok(()),
        }
    }

    /// Replay persisted history through `executor`
    pub fn recover(&self, executor: &dyn CommandExecutor) -> Result<RecoveryReport> {
        match self {
            WriteAheadLog::Active(wal) => wal.recover(executor),
            WriteAheadLog::Disabled => Ok(RecoveryReport::default()),
        }
    }

    /// Final drain; later writes fail with `WalError::Closed`
    pub fn shutdown(&self) {
        if let WriteAheadLog::Active(wal) = self {
            wal.shutdown();
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, WriteAheadLog::Active(_))
    }

    /// Flush counters (all zero when disabled)
    pub fn stats(&self) -> FlushStatsSnapshot {
        match self {
            WriteAheadLog::Active(wal) => wal.stats(),
            WriteAheadLog::Disabled => FlushStatsSnapshot::default(),
        }
    }
}
