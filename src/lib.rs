//! # Threadpack
//!
//! A Rust library for rebuilding conversations from a Facebook Messenger
//! `messages.htm` archive and exporting them to CSV, TXT or JSON.
//!
//! ## Overview
//!
//! The archive splits each conversation into many `div.thread` fragments and
//! lists messages newest-first, with the same person showing up under
//! several names. Threadpack:
//! - streams the archive markup without loading the whole document
//! - assembles messages per fragment and puts them in chronological order
//! - folds aliases, old display names and UIDs into one canonical name each
//! - merges fragments that share a participant set into one thread
//! - exports each thread to its own file
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use threadpack::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let owner = OwnerIdentity::new().with_uid("12345").with_name("Me");
//!     let config = ArchiveConfig::new().with_owner(owner);
//!
//!     let mut archive = MessageArchive::new("messages.htm", config)?;
//!     for thread in archive.threads()? {
//!         println!("{}: {} messages", thread, thread.messages().len());
//!     }
//!
//!     archive.write("threadpack_out", ExportFormat::Json)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`archive`] — [`MessageArchive`], the whole pipeline
//! - [`streaming`] — [`ArchiveScanner`](streaming::ArchiveScanner), the markup scanner
//! - [`message`] — [`Message`] and the [`PendingMessage`](message::PendingMessage) builder
//! - [`thread`] — [`ThreadFragment`] and [`ConsolidatedThread`]
//! - [`identity`] — [`OwnerIdentity`], [`ReplacementNames`], [`AliasTable`](identity::AliasTable)
//! - [`core`] — fragment merging and export adapters
//! - [`format`] — [`ExportFormat`] and batch export
//! - [`sanitize`] — optional in-place cleanup of the archive
//! - [`config`] — [`ArchiveConfig`]
//! - [`parsing`] — header timestamp parsing
//! - [`error`] — [`ThreadpackError`] and [`Result`]
//! - [`prelude`] — Convenient re-exports

pub mod archive;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod identity;
pub mod message;
pub mod parsing;
pub mod sanitize;
pub mod streaming;
pub mod thread;

// Re-export the main types at the crate root for convenience
pub use archive::MessageArchive;
pub use config::ArchiveConfig;
pub use error::{Result, ThreadpackError};
pub use format::ExportFormat;
pub use identity::{OwnerIdentity, ReplacementNames};
pub use message::Message;
pub use thread::{ConsolidatedThread, ThreadFragment};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use threadpack::prelude::*;
/// ```
pub mod prelude {
    // Pipeline
    pub use crate::archive::MessageArchive;
    pub use crate::config::ArchiveConfig;

    // Records
    pub use crate::message::Message;
    pub use crate::thread::{ConsolidatedThread, ThreadFragment};

    // Error types
    pub use crate::error::{Result, ThreadpackError};

    // Identity
    pub use crate::identity::{AliasTable, OwnerIdentity, ReplacementNames, resolve_fragment};

    // Merging
    pub use crate::core::merge::{ArchiveStats, merge_fragments};

    // Output
    pub use crate::core::models::{OutputConfig, OutputEncoding};
    pub use crate::format::{ExportFormat, write_threads};

    // Streaming
    pub use crate::streaming::{ArchiveScanner, StreamingConfig, ThreadIterator};
}
