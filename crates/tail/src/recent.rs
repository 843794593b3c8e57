//! Recent-line reconstruction
//!
//! Rebuilds the last N lines of the log file by scanning backward from
//! end-of-file, without reading the whole file. The scan is performed
//! fresh on every request; nothing is maintained incrementally.
//!
//! A line is the bytes up to and including a newline. The segment before
//! the first newline of the file (no preceding newline to cross) is
//! included as the oldest entry if non-empty, and bytes after the last
//! newline (a line still being written) are included as the newest entry.
//! Invalid UTF-8 is decoded lossily.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{Result, TailError};

/// Chunk size for the backward scan
const SCAN_CHUNK_SIZE: usize = 8 * 1024;

/// Read up to `n` most recent lines from the file, oldest first
///
/// Scans backward from end-of-file, accumulating bytes and emitting a line
/// each time a newline boundary is crossed, until `n` lines are collected
/// or start-of-file is reached. Cost is O(bytes scanned), which is bounded
/// by the length of the last `n` lines.
///
/// This is a blocking call; use [`SnapshotReader::read_async`] from async
/// contexts.
///
/// # Errors
///
/// Returns [`TailError::FileAccess`] if the file cannot be opened or read.
pub fn read_last_lines<P: AsRef<Path>>(path: P, n: usize) -> Result<Vec<String>> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| TailError::file_access(path, e))?;
    let mut pos = file
        .seek(SeekFrom::End(0))
        .map_err(|e| TailError::file_access(path, e))?;

    if n == 0 || pos == 0 {
        return Ok(Vec::new());
    }

    // Lines collected newest first; reversed before returning.
    let mut lines: Vec<String> = Vec::with_capacity(n);
    // Bytes of the line currently being assembled, in reverse order.
    let mut acc: Vec<u8> = Vec::new();
    let mut chunk = vec![0u8; SCAN_CHUNK_SIZE];

    'scan: while pos > 0 {
        let chunk_len = SCAN_CHUNK_SIZE.min(pos as usize);
        pos -= chunk_len as u64;

        file.seek(SeekFrom::Start(pos))
            .map_err(|e| TailError::file_access(path, e))?;
        file.read_exact(&mut chunk[..chunk_len])
            .map_err(|e| TailError::file_access(path, e))?;

        for &byte in chunk[..chunk_len].iter().rev() {
            // A newline that precedes accumulated bytes terminates the
            // line before it; the accumulation is a complete entry.
            if byte == b'\n' && !acc.is_empty() {
                lines.push(take_reversed(&mut acc));
                if lines.len() == n {
                    break 'scan;
                }
            }
            acc.push(byte);
        }
    }

    // Start-of-file remainder: the oldest entry, which has no preceding
    // newline to cross.
    if lines.len() < n && !acc.is_empty() {
        lines.push(take_reversed(&mut acc));
    }

    lines.reverse();
    Ok(lines)
}

/// Drain the reversed accumulator into a lossily decoded line
fn take_reversed(acc: &mut Vec<u8>) -> String {
    acc.reverse();
    let line = String::from_utf8_lossy(acc).into_owned();
    acc.clear();
    line
}

/// On-demand snapshot source for new subscribers
///
/// Bundles the file path and line limit so the stream server can produce
/// connect-time snapshots without knowing about files.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    path: PathBuf,
    limit: usize,
}

impl SnapshotReader {
    /// Create a snapshot reader for a file and line limit
    pub fn new<P: AsRef<Path>>(path: P, limit: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            limit,
        }
    }

    /// Get the configured line limit
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Read the snapshot payload: up to `limit` recent lines, concatenated
    ///
    /// Blocking; prefer [`read_async`](Self::read_async) from async code.
    pub fn read(&self) -> Result<String> {
        Ok(read_last_lines(&self.path, self.limit)?.concat())
    }

    /// Read the snapshot payload off the async runtime's blocking pool
    pub async fn read_async(&self) -> Result<String> {
        let reader = self.clone();
        tokio::task::spawn_blocking(move || reader.read()).await?
    }
}

#[cfg(test)]
#[path = "recent_test.rs"]
mod tests;
