//! Streaming scanner for memory-efficient processing of large archives.
//!
//! A full `messages.htm` can run to hundreds of megabytes; this module reads
//! it as a stream of markup events and yields one [`RawThread`] at a time,
//! never building the whole document tree.
//!
//! # Architecture
//!
//! - [`ArchiveScanner`] opens an archive and produces a [`ThreadNodes`] iterator
//! - [`ThreadIterator`] is the progress-tracking iterator trait it implements
//!
//! # Example
//!
//! ```rust,no_run
//! use threadpack::streaming::ArchiveScanner;
//!
//! let scanner = ArchiveScanner::new();
//!
//! for result in scanner.scan("messages.htm").unwrap() {
//!     match result {
//!         Ok(thread) => println!("{}: {} nodes", thread.title, thread.nodes.len()),
//!         Err(e) => eprintln!("Malformed archive: {}", e),
//!     }
//! }
//! ```

mod archive;
mod traits;

pub use archive::{ArchiveScanner, RawNode, RawThread, ThreadNodes};
pub use traits::{MIN_BUFFER_SIZE, StreamingConfig, ThreadIterator};
