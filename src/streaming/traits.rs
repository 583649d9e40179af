//! Core traits for streaming the archive.
//!
//! This module defines:
//! - [`ThreadIterator`] - Iterator over raw thread fragments with progress tracking
//! - [`StreamingConfig`] - Configuration options

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::RawThread;

/// Iterator over raw thread fragments with progress tracking.
///
/// Extends the standard [`Iterator`] trait with methods for monitoring
/// scanning progress, useful for logging on very large archives.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> threadpack::Result<()> {
/// use threadpack::streaming::{ArchiveScanner, ThreadIterator};
///
/// let mut iter = ArchiveScanner::new().scan("messages.htm")?;
///
/// while let Some(result) = iter.next() {
///     let thread = result?;
///     if let Some(pct) = iter.progress() {
///         eprintln!("\r{:.1}% ({})", pct, thread.title);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub trait ThreadIterator: Iterator<Item = Result<RawThread>> {
    /// Returns approximate progress as a percentage (0.0 to 100.0).
    ///
    /// Returns `None` if progress cannot be determined (e.g., unknown file size).
    fn progress(&self) -> Option<f64> {
        let total = self.total_bytes()?;
        if total == 0 {
            return Some(100.0);
        }
        Some((self.bytes_processed() as f64 / total as f64 * 100.0).min(100.0))
    }

    /// Returns the number of bytes processed so far.
    fn bytes_processed(&self) -> u64;

    /// Returns the total file size in bytes, if known.
    fn total_bytes(&self) -> Option<u64> {
        None
    }
}

/// Smallest read buffer the scanner uses. Smaller values, zero included, are
/// raised to this.
pub const MIN_BUFFER_SIZE: usize = 8 * 1024;

/// Configuration options for the archive scanner.
///
/// # Examples
///
/// ```
/// use threadpack::streaming::StreamingConfig;
///
/// let config = StreamingConfig::new()
///     .with_buffer_size(128 * 1024)
///     .with_progress_interval(500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingConfig {
    /// Buffer size for file reading.
    ///
    /// Default: 64KB. Larger buffers improve throughput but use more memory.
    /// Never below [`MIN_BUFFER_SIZE`].
    pub buffer_size: usize,

    /// Log progress every N thread fragments.
    ///
    /// Default: 1,000.
    pub progress_interval: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            buffer_size: 64 * 1024, // 64KB
            progress_interval: 1_000,
        }
    }
}

impl StreamingConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the buffer size, raised to at least [`MIN_BUFFER_SIZE`].
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(MIN_BUFFER_SIZE);
        self
    }

    /// Buffer size to read with. Covers configs built without the builder,
    /// e.g. deserialized ones.
    pub fn effective_buffer_size(&self) -> usize {
        self.buffer_size.max(MIN_BUFFER_SIZE)
    }

    /// Sets the progress reporting interval.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }
}
