//! WAL Segment Reader
//!
//! Reads every segment in filename order and returns their lines,
//! concatenated. Used once at startup; the whole log is materialized.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::writer::SEGMENT_EXTENSION;
use crate::error::Result;

/// Every `*.wal` file in `dir`, sorted by name (chronological for
/// timestamp-named segments). A missing directory has no segments.
pub fn list_segments(dir: &Path) -> io::Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut segments = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some(SEGMENT_EXTENSION) {
            segments.push(path);
        }
    }

    segments.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(segments)
}

/// Everything read from a WAL directory
#[derive(Debug, Default)]
pub struct SegmentScan {
    /// Command lines in log order
    pub lines: Vec<String>,

    /// Segments read, in order
    pub segments: Vec<PathBuf>,

    /// Unterminated trailing fragments dropped (torn writes)
    pub torn_tails: usize,
}

/// Reads the WAL directory
#[derive(Debug, Clone)]
pub struct SegmentReader {
    dir: PathBuf,
}

impl SegmentReader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All persisted lines, in order
    pub fn read(&self) -> Result<Vec<String>> {
        Ok(self.scan()?.lines)
    }

    /// All persisted lines plus per-segment bookkeeping.
    ///
    /// Every record is newline-terminated, so bytes after a segment's last
    /// `\n` are a write that never completed; they are skipped.
    pub fn scan(&self) -> Result<SegmentScan> {
        let mut scan = SegmentScan::default();

        for path in list_segments(&self.dir)? {
            let contents = fs::read_to_string(&path)?;
            let complete = contents.rfind('\n').map_or(0, |i| i + 1);
            let (body, tail) = contents.split_at(complete);

            if !tail.is_empty() {
                tracing::warn!(
                    segment = %path.display(),
                    bytes = tail.len(),
                    "skipping unterminated WAL record"
                );
                scan.torn_tails += 1;
            }

            scan.lines.extend(body.lines().map(str::to_string));
            scan.segments.push(path);
        }

        Ok(scan)
    }
}
