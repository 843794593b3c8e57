//! Shared log line value

use std::fmt;
use std::sync::Arc;

/// A single line from the tailed file
///
/// The trailing newline is preserved exactly as stored in the file. The
/// text is reference-counted so one line can be fanned out to every
/// subscriber without copying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    text: Arc<str>,
}

impl LogLine {
    /// Create a new log line
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self { text: text.into() }
    }

    /// Get the line text (trailing newline included)
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length of the line in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the line is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl AsRef<str> for LogLine {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
