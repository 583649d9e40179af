//! Exporter configuration.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ThreadpackError};
use crate::thread::ConsolidatedThread;

/// Character encoding of exported files.
///
/// Accepts any WHATWG label that `encoding_rs` can encode into (`utf-8`,
/// `latin1`, `windows-1251`, `shift_jis`, ...). UTF-16 labels are rejected
/// since they can only be decoded. Console output is always UTF-8.
///
/// # Example
///
/// ```rust
/// use threadpack::core::models::OutputEncoding;
///
/// let latin1: OutputEncoding = "latin1".parse().unwrap();
/// assert_eq!(latin1.name(), "windows-1252");
/// assert_eq!(latin1.encode("café").unwrap().as_ref(), b"caf\xE9");
/// assert!("utf-16le".parse::<OutputEncoding>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OutputEncoding(&'static Encoding);

impl Default for OutputEncoding {
    fn default() -> Self {
        Self(encoding_rs::UTF_8)
    }
}

impl OutputEncoding {
    /// Looks up an encoding by label, ignoring case and surrounding spaces.
    pub fn for_label(label: &str) -> Result<Self> {
        match Encoding::for_label(label.trim().as_bytes()) {
            Some(encoding) if encoding.output_encoding() == encoding => Ok(Self(encoding)),
            _ => Err(ThreadpackError::unsupported_encoding(label)),
        }
    }

    /// Canonical name of the encoding.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn is_utf8(&self) -> bool {
        self.0 == encoding_rs::UTF_8
    }

    /// Encodes `text`, failing on the first character the encoding cannot
    /// represent.
    pub fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>> {
        let (bytes, _, had_errors) = self.0.encode(text);
        if had_errors {
            let character = text
                .chars()
                .find(|c| self.0.encode(c.encode_utf8(&mut [0; 4])).2)
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            return Err(ThreadpackError::Unencodable {
                encoding: self.name(),
                character,
            });
        }
        Ok(bytes)
    }
}

impl fmt::Display for OutputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputEncoding {
    type Err = ThreadpackError;

    fn from_str(s: &str) -> Result<Self> {
        Self::for_label(s)
    }
}

impl TryFrom<String> for OutputEncoding {
    type Error = ThreadpackError;

    fn try_from(label: String) -> Result<Self> {
        Self::for_label(&label)
    }
}

impl From<OutputEncoding> for String {
    fn from(encoding: OutputEncoding) -> Self {
        encoding.name().to_string()
    }
}

/// Configuration shared by all export adapters.
///
/// # Example
///
/// ```rust
/// use threadpack::core::models::OutputConfig;
///
/// let config = OutputConfig::new().with_hide_participant("Me");
/// assert_eq!(config.hide_participant.as_deref(), Some("Me"));
/// assert!(config.encoding.is_utf8());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Name left out of exported participant lists, unless it is the only
    /// participant. Usually the owner's canonical name.
    pub hide_participant: Option<String>,

    /// Encoding of exported files. Default: UTF-8.
    #[serde(default)]
    pub encoding: OutputEncoding,
}

impl OutputConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_hide_participant(mut self, name: impl Into<String>) -> Self {
        self.hide_participant = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: OutputEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Returns the participant list to export for `thread`.
    pub fn participants(&self, thread: &ConsolidatedThread) -> Vec<String> {
        match &self.hide_participant {
            Some(name) => thread.participants_without(name),
            None => thread.participants().to_vec(),
        }
    }
}
