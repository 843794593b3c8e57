//! tailview Tail - log file tailing and recent-line reconstruction
//!
//! This crate provides the file-facing half of tailview:
//!
//! - [`LogTailer`] polls a growing log file and emits each newly completed
//!   line onto a channel. Lines written before startup are never emitted;
//!   a partially written line is buffered until its newline arrives.
//! - [`read_last_lines`] / [`SnapshotReader`] reconstruct the last N lines
//!   of the file by scanning backward from end-of-file, for the one-time
//!   snapshot a subscriber receives at connect time.
//!
//! Both paths decode bytes lossily: invalid UTF-8 sequences become U+FFFD
//! and never abort the read.
//!
//! # Architecture
//!
//! ```text
//! log file ──► LogTailer ──► mpsc::Sender<LogLine> ──► broadcast
//!     │
//!     └──► SnapshotReader (backward scan, on demand) ──► connect snapshot
//! ```

mod error;
mod line;
pub mod recent;
pub mod tailer;

pub use error::{Result, TailError};
pub use line::LogLine;
pub use recent::{read_last_lines, SnapshotReader};
pub use tailer::{LogTailer, TailerConfig};
