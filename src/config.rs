//! Configuration for WalKV
//!
//! Centralized configuration with sensible defaults. Every field may be
//! omitted from the TOML file; missing values take the defaults below.
//!
//! ```toml
//! [wal]
//! enabled = true
//! batch_size = 10
//! flush_interval_ms = 10
//! dir = "./wal"
//! max_segment_size = 10485760
//!
//! [network]
//! listen_addr = "127.0.0.1:3223"
//! max_connections = 1024
//!
//! [logging]
//! level = "info"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{KvError, Result};

/// Main configuration for a WalKV instance
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub wal: WalConfig,
    pub network: NetworkConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// WAL Configuration
// =============================================================================

/// Write-ahead log settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WalConfig {
    /// When false the store runs purely in memory
    pub enabled: bool,

    /// Entries per batch before a size-triggered flush
    pub batch_size: usize,

    /// Upper bound on how long a partial batch waits (milliseconds)
    pub flush_interval_ms: u64,

    /// Directory holding the `.wal` segments
    pub dir: PathBuf,

    /// Segment size (bytes) past which the writer rotates
    pub max_segment_size: u64,
}

impl WalConfig {
    pub const DEFAULT_BATCH_SIZE: usize = 10;
    pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 10;
    pub const DEFAULT_DIR: &'static str = "./wal";
    pub const DEFAULT_MAX_SEGMENT_SIZE: u64 = 10 * 1024 * 1024; // 10 MiB

    /// Flush interval as a `Duration`
    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    /// Replace zero / empty values with defaults
    pub fn normalized(mut self) -> Self {
        if self.batch_size == 0 {
            self.batch_size = Self::DEFAULT_BATCH_SIZE;
        }
        if self.flush_interval_ms == 0 {
            self.flush_interval_ms = Self::DEFAULT_FLUSH_INTERVAL_MS;
        }
        if self.dir.as_os_str().is_empty() {
            self.dir = PathBuf::from(Self::DEFAULT_DIR);
        }
        if self.max_segment_size == 0 {
            self.max_segment_size = Self::DEFAULT_MAX_SEGMENT_SIZE;
        }
        self
    }
}

impl Default for WalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            batch_size: Self::DEFAULT_BATCH_SIZE,
            flush_interval_ms: Self::DEFAULT_FLUSH_INTERVAL_MS,
            dir: PathBuf::from(Self::DEFAULT_DIR),
            max_segment_size: Self::DEFAULT_MAX_SEGMENT_SIZE,
        }
    }
}

// =============================================================================
// Network Configuration
// =============================================================================

/// TCP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// TCP listen address
    pub listen_addr: String,

    /// Max concurrent client connections
    pub max_connections: usize,

    /// Longest accepted request line (bytes)
    pub max_message_size: usize,

    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3223".to_string(),
            max_connections: 1024,
            max_message_size: 4096,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
        }
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging settings (consumed by the binaries when installing a subscriber)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Parse a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).map_err(|e| KvError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Load a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            KvError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Enable or disable the write-ahead log
    pub fn wal_enabled(mut self, enabled: bool) -> Self {
        self.config.wal.enabled = enabled;
        self
    }

    /// Set the WAL directory
    pub fn wal_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.wal.dir = path.into();
        self
    }

    /// Set the number of entries per batch
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.wal.batch_size = size;
        self
    }

    /// Set the flush interval (millisecond granularity, rounded up)
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        let ms = interval.as_nanos().div_ceil(1_000_000);
        self.config.wal.flush_interval_ms = u64::try_from(ms).unwrap_or(u64::MAX);
        self
    }

    /// Set the segment rotation threshold (in bytes)
    pub fn max_segment_size(mut self, bytes: u64) -> Self {
        self.config.wal.max_segment_size = bytes;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.network.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.network.max_connections = count;
        self
    }

    /// Set the longest accepted request line (in bytes)
    pub fn max_message_size(mut self, bytes: usize) -> Self {
        self.config.network.max_message_size = bytes;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.network.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.network.write_timeout_ms = ms;
        self
    }

    /// Set the default log filter
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
