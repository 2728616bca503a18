//! WAL Segment Writer
//!
//! Appends batches to the active segment, rotating to a fresh file once a
//! batch would push the segment past its size bound.
//!
//! ## Segment naming
//! `<YYYYMMDDThhmmss>.wal` (UTC). A rotation within the same second as the
//! active segment (or after the clock went backwards) appends a counter:
//! `<stamp>_000001.wal`, `<stamp>_000002.wal`, ... `_` sorts after `.`, so
//! filename order stays creation order.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::entry::Batch;
use super::reader::list_segments;
use crate::error::{KvError, Result, WalError, WalResult};

/// Extension shared by every segment file
pub const SEGMENT_EXTENSION: &str = "wal";

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";
const TAIL_SCAN_CHUNK: u64 = 4096;

/// The one open segment
struct ActiveSegment {
    file: File,
    path: PathBuf,
    size: u64,
}

impl ActiveSegment {
    /// Reopen an existing segment for append, dropping any torn tail
    fn resume(path: PathBuf) -> io::Result<Self> {
        let mut file = OpenOptions::new().read(true).append(true).open(&path)?;
        let size = file.metadata()?.len();

        let complete = complete_prefix_len(&mut file, size)?;
        if complete < size {
            tracing::warn!(
                segment = %path.display(),
                dropped_bytes = size - complete,
                "truncating torn tail of WAL segment"
            );
            file.set_len(complete)?;
            file.sync_all()?;
        }

        Ok(Self {
            file,
            path,
            size: complete,
        })
    }

    /// Create the next segment after `previous`
    fn create(dir: &Path, previous: Option<&Path>) -> io::Result<Self> {
        let path = next_segment_path(dir, previous, Utc::now());
        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create_new(true)
            .open(&path)?;

        Ok(Self {
            file,
            path,
            size: 0,
        })
    }

    /// Undo a failed append so the segment ends at `size` again
    fn rollback(&mut self, size: u64) {
        let result = self.file.set_len(size).and_then(|_| self.file.sync_all());
        if let Err(e) = result {
            tracing::warn!(
                segment = %self.path.display(),
                error = %e,
                "could not roll back failed WAL write"
            );
        }
        self.size = size;
    }
}

/// Writes batches to rotating segment files
///
/// Rotation, write and sync for one batch form a single critical section,
/// so batches never interleave on disk.
pub struct SegmentWriter {
    dir: PathBuf,
    max_segment_size: u64,
    active: Mutex<ActiveSegment>,

    #[cfg(test)]
    fail_next_sync: std::sync::atomic::AtomicBool,
}

impl SegmentWriter {
    /// Open the writer on `dir`.
    ///
    /// Resumes the most recently modified segment so history continues
    /// across restarts; creates a fresh segment in an empty directory.
    pub fn open(dir: impl AsRef<Path>, max_segment_size: u64) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| KvError::DirectoryAccess {
            path: dir.clone(),
            source,
        })?;

        let active = match latest_modified_segment(&dir)? {
            Some(path) => {
                let segment = ActiveSegment::resume(path)?;
                tracing::info!(
                    segment = %segment.path.display(),
                    size = segment.size,
                    "resuming WAL segment"
                );
                segment
            }
            None => {
                let segment = ActiveSegment::create(&dir, None).map_err(|source| {
                    KvError::DirectoryAccess {
                        path: dir.clone(),
                        source,
                    }
                })?;
                tracing::info!(segment = %segment.path.display(), "created WAL segment");
                segment
            }
        };

        Ok(Self {
            dir,
            max_segment_size,
            active: Mutex::new(active),
            #[cfg(test)]
            fail_next_sync: std::sync::atomic::AtomicBool::new(false),
        })
    }

    /// Persist a batch and resolve every entry with the outcome.
    ///
    /// Either the whole batch is written and synced (every entry gets
    /// `Ok`), or every entry gets the same error and the batch's bytes are
    /// rolled back out of the segment.
    pub fn write(&self, batch: Batch) -> WalResult {
        let buf = batch.encode();
        let result = {
            let mut active = self.active.lock();
            self.write_locked(&mut active, &buf)
        };

        if let Err(e) = &result {
            tracing::warn!(
                seq = batch.seq,
                entries = batch.len(),
                error = %e,
                "WAL batch failed"
            );
        }
        batch.resolve_all(&result);
        result
    }

    fn write_locked(&self, active: &mut ActiveSegment, buf: &[u8]) -> WalResult {
        let len = buf.len() as u64;
        if active.size > 0 && active.size + len > self.max_segment_size {
            self.rotate(active)?;
        }

        let before = active.size;
        match self.append(active, buf) {
            Ok(()) => {
                active.size += len;
                Ok(())
            }
            Err(e) => {
                active.rollback(before);
                Err(e)
            }
        }
    }

    fn append(&self, active: &mut ActiveSegment, buf: &[u8]) -> WalResult {
        let written = active.file.write(buf).map_err(WalError::write)?;
        if written < buf.len() {
            return Err(WalError::ShortWrite {
                written,
                expected: buf.len(),
            });
        }
        self.sync(active)
    }

    fn sync(&self, active: &mut ActiveSegment) -> WalResult {
        #[cfg(test)]
        if self
            .fail_next_sync
            .swap(false, std::sync::atomic::Ordering::SeqCst)
        {
            return Err(WalError::sync(io::Error::new(
                io::ErrorKind::Other,
                "injected sync failure",
            )));
        }

        active.file.sync_all().map_err(WalError::sync)
    }

    fn rotate(&self, active: &mut ActiveSegment) -> WalResult {
        let next =
            ActiveSegment::create(&self.dir, Some(&active.path)).map_err(WalError::rotation)?;
        let previous = std::mem::replace(active, next);
        tracing::info!(
            from = %previous.path.display(),
            to = %active.path.display(),
            closed_size = previous.size,
            "rotated WAL segment"
        );
        Ok(())
    }

    /// Directory holding the segments
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the segment currently appended to
    pub fn active_path(&self) -> PathBuf {
        self.active.lock().path.clone()
    }

    /// Bytes in the active segment
    pub fn active_size(&self) -> u64 {
        self.active.lock().size
    }

    /// Make the next sync fail (test hook)
    #[cfg(test)]
    pub(crate) fn fail_next_sync(&self) {
        self.fail_next_sync
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

/// Segment with the newest modification time (name breaks ties)
fn latest_modified_segment(dir: &Path) -> Result<Option<PathBuf>> {
    let mut latest: Option<(std::time::SystemTime, PathBuf)> = None;
    for path in list_segments(dir)? {
        let modified = fs::metadata(&path)?.modified()?;
        let newer = match &latest {
            Some((t, p)) => (modified, &path) > (*t, p),
            None => true,
        };
        if newer {
            latest = Some((modified, path));
        }
    }
    Ok(latest.map(|(_, path)| path))
}

/// Name for the segment following `previous`, created at `now`
fn next_segment_path(dir: &Path, previous: Option<&Path>, now: DateTime<Utc>) -> PathBuf {
    let candidate = format!("{}.{}", now.format(TIMESTAMP_FORMAT), SEGMENT_EXTENSION);
    let previous_name = previous
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str());

    let mut name = match previous_name {
        Some(prev) if candidate.as_str() <= prev => bump_segment_name(prev),
        _ => candidate,
    };
    while dir.join(&name).exists() {
        name = bump_segment_name(&name);
    }
    dir.join(name)
}

/// `<stem>.wal` -> `<stem>_000001.wal`, `<base>_000007.wal` -> `<base>_000008.wal`
fn bump_segment_name(name: &str) -> String {
    let stem = name
        .strip_suffix(SEGMENT_EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
        .unwrap_or(name);

    let (base, counter) = match stem.rsplit_once('_') {
        Some((base, suffix)) => match suffix.parse::<u32>() {
            Ok(n) => (base, n + 1),
            Err(_) => (stem, 1),
        },
        None => (stem, 1),
    };
    format!("{}_{:06}.{}", base, counter, SEGMENT_EXTENSION)
}

/// Length of the prefix ending with the last `\n`
fn complete_prefix_len(file: &mut File, size: u64) -> io::Result<u64> {
    let mut buf = vec![0u8; TAIL_SCAN_CHUNK as usize];
    let mut end = size;
    while end > 0 {
        let start = end.saturating_sub(TAIL_SCAN_CHUNK);
        let chunk = &mut buf[..(end - start) as usize];
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(chunk)?;
        if let Some(pos) = chunk.iter().rposition(|&b| b == b'\n') {
            return Ok(start + pos as u64 + 1);
        }
        end = start;
    }
    Ok(0)
}
