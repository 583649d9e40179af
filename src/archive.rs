//! The archive pipeline: scan, assemble, resolve, merge, export.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> threadpack::Result<()> {
//! use threadpack::{ArchiveConfig, ExportFormat, MessageArchive, OwnerIdentity};
//!
//! let config = ArchiveConfig::new()
//!     .with_owner(OwnerIdentity::new().with_uid("12345").with_name("Me"));
//!
//! let mut archive = MessageArchive::new("messages.htm", config)?;
//! for thread in archive.threads()? {
//!     println!("{} ({} messages)", thread.title(), thread.messages().len());
//! }
//! archive.write("threadpack_out", ExportFormat::Csv)?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::ArchiveConfig;
use crate::core::merge::{ArchiveStats, merge_fragments};
use crate::core::models::OutputConfig;
use crate::error::{Result, ThreadpackError};
use crate::format::{ExportFormat, write_threads};
use crate::identity::{AliasTable, resolve_fragment};
use crate::sanitize::sanitize_archive;
use crate::streaming::{ArchiveScanner, ThreadIterator};
use crate::thread::{ConsolidatedThread, ThreadFragment};

/// A `messages.htm` archive and the threads parsed from it.
///
/// Parsing happens on the first call to [`threads`](Self::threads) and the
/// result is kept until [`reparse`](Self::reparse).
#[derive(Debug)]
pub struct MessageArchive {
    path: PathBuf,
    config: ArchiveConfig,
    aliases: AliasTable,
    threads: Option<Vec<ConsolidatedThread>>,
    stats: Option<ArchiveStats>,
    backup: Option<PathBuf>,
}

impl MessageArchive {
    /// Prepares the archive at `path`. Nothing is read yet.
    ///
    /// # Errors
    ///
    /// Returns [`ThreadpackError::InputNotFound`] if `path` is not a file.
    pub fn new(path: impl Into<PathBuf>, config: ArchiveConfig) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(ThreadpackError::input_not_found("input", path));
        }
        let aliases = AliasTable::build(&config.replacements, &config.owner);
        debug!(aliases = aliases.len(), "built alias table");

        Ok(Self {
            path,
            config,
            aliases,
            threads: None,
            stats: None,
            backup: None,
        })
    }

    /// Returns the archive path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Returns the consolidated threads, parsing the archive if needed.
    pub fn threads(&mut self) -> Result<&[ConsolidatedThread]> {
        if self.threads.is_none() {
            self.parse()?;
        }
        Ok(self.threads.as_deref().unwrap_or_default())
    }

    /// Discards the cached threads and parses the archive again.
    pub fn reparse(&mut self) -> Result<&[ConsolidatedThread]> {
        self.threads = None;
        self.stats = None;
        self.threads()
    }

    /// Returns statistics of the last parse, if any.
    pub fn stats(&self) -> Option<ArchiveStats> {
        self.stats
    }

    /// Returns the backup written by the sanitation pass, if it ran.
    pub fn backup_path(&self) -> Option<&Path> {
        self.backup.as_deref()
    }

    /// Exporter settings for this archive: the owner is hidden from
    /// participant lists and files use the configured encoding.
    pub fn output_config(&self) -> OutputConfig {
        let config = OutputConfig::new().with_encoding(self.config.encoding);
        match self.config.owner.canonical_name() {
            Some(name) => config.with_hide_participant(name),
            None => config,
        }
    }

    /// Writes every thread into `dir` in `format`, parsing first if needed.
    ///
    /// Returns the files written.
    pub fn write(&mut self, dir: impl AsRef<Path>, format: ExportFormat) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let config = self.output_config();
        let threads = self.threads()?;
        let written = write_threads(threads, dir, format, &config)?;
        info!(format = %format, dir = %dir.display(), files = written.len(), "exported threads");
        Ok(written)
    }

    fn parse(&mut self) -> Result<()> {
        if self.config.sanitize && self.backup.is_none() {
            self.backup = Some(sanitize_archive(&self.path)?);
        }

        info!(path = %self.path.display(), "parsing archive");
        let scanner = ArchiveScanner::with_config(self.config.streaming);
        let mut iter = scanner.scan(&self.path)?;
        let interval = self.config.streaming.progress_interval.max(1);

        let mut resolved = Vec::new();
        while let Some(raw) = iter.next() {
            let raw = raw?;
            let fragment = ThreadFragment::from_raw(raw, self.config.skip_invalid)?;
            debug!(
                title = fragment.title_raw(),
                messages = fragment.messages().len(),
                "read thread fragment"
            );
            resolved.push(resolve_fragment(fragment, &self.aliases, &self.config.owner)?);

            if resolved.len() % interval == 0 {
                info!(
                    fragments = resolved.len(),
                    percent = iter.progress().unwrap_or_default(),
                    "scanning"
                );
            }
        }

        let fragments = resolved.len();
        let threads = merge_fragments(resolved);
        let stats = ArchiveStats::collect(fragments, &threads);
        info!(
            fragments = stats.fragments,
            threads = stats.threads,
            messages = stats.messages,
            "merged threads"
        );

        self.stats = Some(stats);
        self.threads = Some(threads);
        Ok(())
    }
}
