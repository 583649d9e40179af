//! Unified error types for threadpack.
//!
//! This module provides a single [`ThreadpackError`] enum that covers all error
//! cases in the library, following the same pattern as `csv` and `serde_json`:
//! one typed enum, source chains preserved, and a crate-wide [`Result`] alias.
//!
//! # Error Taxonomy
//!
//! - **Input errors** (missing archive or replacement file) are fatal and
//!   reported before any parsing starts
//! - **Malformed markup** aborts the whole run unless the archive was
//!   sanitized first
//! - **Identity-resolution exhaustion** ([`ThreadpackError::EmptyTitle`]) means
//!   the owner aliases stripped a thread title down to nothing
//! - **Unsupported export formats** and output encodings are rejected before
//!   any file is touched
//! - **Unencodable characters** fail the thread being exported; its file is
//!   not opened

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for threadpack operations.
///
/// # Example
///
/// ```rust
/// use threadpack::error::Result;
/// use threadpack::ConsolidatedThread;
///
/// fn my_function() -> Result<Vec<ConsolidatedThread>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ThreadpackError>;

/// The error type for all threadpack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ThreadpackError {
    /// An I/O error occurred while reading the archive or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A required input file does not exist.
    #[error("Couldn't find {kind} file: {}", path.display())]
    InputNotFound {
        /// What the file was supposed to be ("input", "replacements")
        kind: &'static str,
        /// The path that was checked
        path: PathBuf,
    },

    /// The archive markup could not be parsed.
    #[error("Malformed markup in {} at byte {position}: {source}", path.display())]
    Markup {
        /// Archive path
        path: PathBuf,
        /// Byte offset reported by the reader
        position: usize,
        /// The underlying reader error
        #[source]
        source: quick_xml::Error,
    },

    /// A message header carried a timestamp that could not be understood.
    #[error("Unrecognized timestamp '{input}'")]
    InvalidTimestamp {
        /// The raw timestamp text
        input: String,
    },

    /// A line of the replacement file is not of the form `variant=Name`.
    #[error("Invalid replacement on line {line}: '{content}' (expected 'old name=new name')")]
    InvalidReplacement {
        /// 1-based line number
        line: usize,
        /// The offending line
        content: String,
    },

    /// Identity resolution removed every participant from a thread title.
    #[error("Ran out of names while resolving thread title '{raw_title}'")]
    EmptyTitle {
        /// The title as it appeared in the archive
        raw_title: String,
    },

    /// The requested export format does not exist.
    #[error("Unsupported export format '{name}'. Expected one of: csv, txt, json, stdout")]
    UnsupportedFormat {
        /// The name that was requested
        name: String,
    },

    /// No output encoding has this label.
    #[error("Unsupported output encoding '{label}'")]
    UnsupportedEncoding {
        /// The label that was requested
        label: String,
    },

    /// A character cannot be represented in the output encoding.
    #[error("Character {character:?} cannot be encoded as {encoding}")]
    Unencodable {
        /// Name of the output encoding
        encoding: &'static str,
        /// The first character that failed
        character: char,
    },

    /// The sanitation pass could not swap the cleaned archive into place.
    #[error("Failed to sanitize {}: {source}", path.display())]
    Sanitize {
        /// Archive path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ThreadpackError {
    /// Creates a missing-input error.
    pub fn input_not_found(kind: &'static str, path: impl Into<PathBuf>) -> Self {
        ThreadpackError::InputNotFound {
            kind,
            path: path.into(),
        }
    }

    /// Creates a markup error for the archive at `path`.
    pub fn markup(path: impl Into<PathBuf>, position: usize, source: quick_xml::Error) -> Self {
        ThreadpackError::Markup {
            path: path.into(),
            position,
            source,
        }
    }

    /// Creates an invalid timestamp error.
    pub fn invalid_timestamp(input: impl Into<String>) -> Self {
        ThreadpackError::InvalidTimestamp {
            input: input.into(),
        }
    }

    /// Creates an invalid replacement-line error.
    pub fn invalid_replacement(line: usize, content: impl Into<String>) -> Self {
        ThreadpackError::InvalidReplacement {
            line,
            content: content.into(),
        }
    }

    /// Creates an empty title error.
    pub fn empty_title(raw_title: impl Into<String>) -> Self {
        ThreadpackError::EmptyTitle {
            raw_title: raw_title.into(),
        }
    }

    /// Creates an unsupported format error.
    pub fn unsupported_format(name: impl Into<String>) -> Self {
        ThreadpackError::UnsupportedFormat { name: name.into() }
    }

    /// Creates an unsupported encoding error.
    pub fn unsupported_encoding(label: impl Into<String>) -> Self {
        ThreadpackError::UnsupportedEncoding {
            label: label.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ThreadpackError::Io(_))
    }

    /// Returns `true` if a required input file was missing.
    pub fn is_input_not_found(&self) -> bool {
        matches!(self, ThreadpackError::InputNotFound { .. })
    }

    /// Returns `true` if this is a markup error.
    pub fn is_markup(&self) -> bool {
        matches!(self, ThreadpackError::Markup { .. })
    }

    /// Returns `true` if identity resolution emptied a title.
    pub fn is_empty_title(&self) -> bool {
        matches!(self, ThreadpackError::EmptyTitle { .. })
    }
}
