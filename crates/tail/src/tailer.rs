//! Polling log tailer
//!
//! `LogTailer` opens the target file, seeks to end-of-file, and repeatedly
//! reads whatever bytes have been appended since the last attempt. Each
//! newline-terminated segment is emitted as one [`LogLine`]; bytes after the
//! last newline stay buffered until a later read completes them. When the
//! file yields no new data the loop sleeps for the configured poll interval
//! and retries.
//!
//! Polling is a deliberate portability tradeoff against OS file-watch APIs;
//! the interval is the latency/CPU knob.
//!
//! # Rotation and truncation
//!
//! The read offset never rewinds. If the file is truncated in place the
//! tailer stalls at its old offset until the file grows past it again; on
//! Unix a deleted file keeps serving EOF through the open descriptor. Both
//! are outside the supported append-only contract.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::BytesMut;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{Result, TailError};
use crate::line::LogLine;

/// Default poll interval when no new data is available (100ms)
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Initial capacity of the read buffer
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Tailer configuration
#[derive(Debug, Clone)]
pub struct TailerConfig {
    /// Path to the log file to tail
    pub path: PathBuf,

    /// Sleep interval between read attempts at end-of-file
    pub poll_interval: Duration,
}

impl TailerConfig {
    /// Create config for a file path with the default poll interval
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Polling log tailer
///
/// Emits each newly appended complete line onto the channel passed to
/// [`run`](Self::run), in file append order.
pub struct LogTailer {
    config: TailerConfig,
}

impl LogTailer {
    /// Create a new tailer
    pub fn new(config: TailerConfig) -> Self {
        Self { config }
    }

    /// Get the tailed file path
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Run the tail loop
    ///
    /// Opens the file, seeks to end-of-file, and emits every subsequently
    /// completed line until the token is cancelled or every receiver is
    /// gone. Lines present before startup are not emitted.
    ///
    /// # Errors
    ///
    /// Returns [`TailError::FileAccess`] if the file cannot be opened or a
    /// read fails mid-run. The caller decides how loudly to report it; the
    /// loop itself never swallows a fatal error.
    pub async fn run(&self, tx: mpsc::Sender<LogLine>, cancel: CancellationToken) -> Result<()> {
        let path = &self.config.path;

        let mut file = File::open(path)
            .await
            .map_err(|e| TailError::file_access(path, e))?;
        let offset = file
            .seek(SeekFrom::End(0))
            .await
            .map_err(|e| TailError::file_access(path, e))?;

        info!(path = %path.display(), offset, "tailing from end of file");

        // Bytes read but not yet terminated by a newline.
        let mut pending = BytesMut::with_capacity(READ_BUFFER_SIZE);

        loop {
            let read = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(path = %path.display(), "tail loop cancelled");
                    return Ok(());
                }
                res = file.read_buf(&mut pending) => {
                    res.map_err(|e| TailError::file_access(path, e))?
                }
            };

            if read == 0 {
                // At end-of-file; wait for the file to grow.
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!(path = %path.display(), "tail loop cancelled");
                        return Ok(());
                    }
                    _ = tokio::time::sleep(self.config.poll_interval) => {}
                }
                continue;
            }

            // Emit every complete line; the remainder stays in `pending`.
            while let Some(pos) = pending.iter().position(|&b| b == b'\n') {
                let raw = pending.split_to(pos + 1);
                let text = String::from_utf8_lossy(&raw).into_owned();
                let line = LogLine::new(text);

                debug!(len = line.len(), "new log line");

                if tx.send(line).await.is_err() {
                    // All consumers are gone; nothing left to tail for.
                    debug!(path = %path.display(), "all line receivers dropped, stopping tail");
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tailer_test.rs"]
mod tests;
