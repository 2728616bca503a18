//! Tests for the write-ahead log
//!
//! These tests verify:
//! - Size and timer triggered batching
//! - Segment rotation and resumption
//! - Shutdown drain and writes after close
//! - Failure propagation to every waiter of a batch

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use walkv::config::WalConfig;
use walkv::error::WalResult;
use walkv::sync::Waiter;
use walkv::wal::{list_segments, FlushStatsSnapshot, Operation, SegmentReader, Wal};
use walkv::{Key, Value};

mod batching;
mod rotation;

// =============================================================================
// Helper Functions
// =============================================================================

fn wal_config(dir: &Path, batch_size: usize, interval_ms: u64) -> WalConfig {
    WalConfig {
        enabled: true,
        batch_size,
        flush_interval_ms: interval_ms,
        dir: dir.to_path_buf(),
        ..WalConfig::default()
    }
}

fn set(key: &str, value: &str) -> Operation {
    Operation::Set {
        key: Key::new(key).unwrap(),
        value: Value::new(value).unwrap(),
    }
}

fn del(key: &str) -> Operation {
    Operation::Del {
        key: Key::new(key).unwrap(),
    }
}

fn wait_all(waiters: &[Waiter<WalResult>]) {
    for waiter in waiters {
        waiter.wait().unwrap();
    }
}

/// Every persisted line in the directory, in order
fn persisted(dir: &Path) -> Vec<String> {
    SegmentReader::new(dir).read().unwrap()
}

/// Stats are recorded just after waiters resolve; poll until `done` holds
fn wait_for_stats(wal: &Wal, done: impl Fn(&FlushStatsSnapshot) -> bool) -> FlushStatsSnapshot {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let stats = wal.stats();
        if done(&stats) || Instant::now() > deadline {
            return stats;
        }
        thread::sleep(Duration::from_millis(5));
    }
}

fn segment_count(dir: &Path) -> usize {
    list_segments(dir).unwrap().len()
}
