//! Core processing logic for threadpack.
//!
//! This module contains:
//! - [`merge`] - Merging fragments into consolidated threads, statistics
//! - [`models`] - Exporter configuration
//! - [`output`] - Export adapters (CSV, TXT, JSON, console)
//!
//! # Quick Start
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() {
//! use threadpack::core::{
//!     ArchiveStats, OutputConfig, merge_fragments,
//!     write_csv, write_json, write_txt,
//! };
//! # }
//! ```

pub mod merge;
pub mod models;
pub mod output;

// Re-export main types for convenience
pub use merge::{ArchiveStats, merge_fragments};
pub use models::{OutputConfig, OutputEncoding};

// Conditionally re-export output writers
#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{ThreadRecord, to_json, write_json};
pub use output::{print_thread, to_txt, write_console, write_txt};
