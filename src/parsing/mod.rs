//! Shared parsing utilities for archive records.
//!
//! This module contains the pieces used by both the scanner and the thread
//! builder that are independent of markup: timestamp parsing and rendering.

pub mod timestamp;

// Re-export commonly used items
pub use timestamp::{
    CSV_TIMESTAMP_FORMAT, TIMESTAMP_FORMAT, format_timestamp, parse_archive_timestamp,
};
