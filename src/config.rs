//! Configuration for reading an archive.
//!
//! [`ArchiveConfig`] gathers everything the pipeline needs besides the
//! archive path: who the owner is, which names to merge, and how to treat
//! damaged input. It has no CLI framework dependencies and can be loaded from
//! any serde format.
//!
//! # Example
//!
//! ```rust
//! use threadpack::config::ArchiveConfig;
//! use threadpack::identity::OwnerIdentity;
//!
//! let config = ArchiveConfig::new()
//!     .with_owner(OwnerIdentity::new().with_uid("12345").with_name("Me"))
//!     .with_sanitize(true)
//!     .with_buffer_size(128 * 1024);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::models::OutputEncoding;
use crate::identity::{OwnerIdentity, ReplacementNames};
use crate::streaming::StreamingConfig;

/// Configuration for [`MessageArchive`](crate::MessageArchive).
///
/// | Field | Default | Meaning |
/// |-------|---------|---------|
/// | `owner` | empty | Owner removal is skipped when empty |
/// | `replacements` | empty | Canonical name → variants |
/// | `sanitize` | `false` | Strip invalid characters before parsing |
/// | `skip_invalid` | `false` | Drop messages with unparseable timestamps |
/// | `streaming` | 64KB buffer | Reader tuning |
/// | `encoding` | UTF-8 | Encoding of exported files |
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// The person who exported the archive.
    #[serde(default)]
    pub owner: OwnerIdentity,

    /// Extra names to fold into one canonical name.
    #[serde(default)]
    pub replacements: ReplacementNames,

    /// Rewrite the archive without invalid characters before the first parse.
    #[serde(default)]
    pub sanitize: bool,

    /// Skip messages with unrecognized timestamps instead of failing.
    #[serde(default)]
    pub skip_invalid: bool,

    /// Reader buffer and progress logging.
    #[serde(default)]
    pub streaming: StreamingConfig,

    /// Encoding of exported files.
    #[serde(default)]
    pub encoding: OutputEncoding,
}

impl ArchiveConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the archive owner.
    #[must_use]
    pub fn with_owner(mut self, owner: OwnerIdentity) -> Self {
        self.owner = owner;
        self
    }

    /// Sets the name replacements.
    #[must_use]
    pub fn with_replacements(mut self, replacements: ReplacementNames) -> Self {
        self.replacements = replacements;
        self
    }

    /// Enables or disables the sanitation pass.
    #[must_use]
    pub fn with_sanitize(mut self, sanitize: bool) -> Self {
        self.sanitize = sanitize;
        self
    }

    /// Sets whether to skip messages with invalid timestamps.
    #[must_use]
    pub fn with_skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }

    /// Sets the reader buffer size. See [`StreamingConfig::with_buffer_size`].
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.streaming = self.streaming.with_buffer_size(size);
        self
    }

    /// Sets the encoding of exported files.
    #[must_use]
    pub fn with_encoding(mut self, encoding: OutputEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets the full reader configuration.
    #[must_use]
    pub fn with_streaming(mut self, streaming: StreamingConfig) -> Self {
        self.streaming = streaming;
        self
    }
}
