//! Error types for the tail crate

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while tailing or scanning the log file
#[derive(Debug, Error)]
pub enum TailError {
    /// The log file is missing or unreadable (fatal for the tail loop)
    #[error("cannot access log file '{path}': {source}")]
    FileAccess {
        /// Path to the log file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// A background task failed to complete
    #[error("background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl TailError {
    /// Create a FileAccess error
    pub fn file_access(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::FileAccess {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Result type for tail operations
pub type Result<T> = std::result::Result<T, TailError>;
