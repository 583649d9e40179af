//! Message records reconstructed from the archive.
//!
//! This module provides [`Message`], one chat message as it appeared in a
//! thread fragment, and [`PendingMessage`], the builder that collects a
//! message's parts while the scanner walks the markup.
//!
//! # Completeness
//!
//! The archive spreads a message over two sibling elements: a header
//! (`div.message` holding sender and timestamp) and a body (`p`). A message is
//! only emitted once all three of sender, timestamp and body are known:
//!
//! ```
//! use threadpack::message::PendingMessage;
//! use threadpack::parsing::parse_archive_timestamp;
//!
//! let raw = "Monday, August 10, 2015 at 10:40pm EDT";
//! let mut pending = PendingMessage::default();
//! pending.set_header(Some("Alice".into()), parse_archive_timestamp(raw).map(|ts| (raw.to_string(), ts)));
//! assert!(pending.take_complete().is_none());
//!
//! // An attachment-only message has no text, which still completes it
//! pending.set_body(None);
//! let msg = pending.take_complete().unwrap();
//! assert_eq!(msg.body(), "");
//! ```

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::parsing::format_timestamp;

/// A single chat message.
///
/// Immutable once built; identity resolution produces a new value through
/// [`Message::with_sender`] instead of editing in place.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `sender` | `String` | Display name or UID string of the author |
/// | `timestamp` | `NaiveDateTime` | Parsed wall-clock time (minute precision) |
/// | `original_timestamp` | `String` | Header text exactly as in the archive |
/// | `body` | `String` | Message text, empty for attachment-only messages |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    sender: String,
    timestamp: NaiveDateTime,
    original_timestamp: String,
    body: String,
}

impl Message {
    /// Creates a message from all of its parts.
    pub fn new(
        sender: impl Into<String>,
        timestamp: NaiveDateTime,
        original_timestamp: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            timestamp,
            original_timestamp: original_timestamp.into(),
            body: body.into(),
        }
    }

    /// Returns a copy of this message attributed to `sender`.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Returns the sender name.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the parsed timestamp.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Returns the timestamp text as it appeared in the archive.
    pub fn original_timestamp(&self) -> &str {
        &self.original_timestamp
    }

    /// Returns the message text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns `true` if the body is empty (e.g. a sticker or photo).
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// `[2015-08-10 22:40] Alice: hello`
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:16}] {}: {}",
            format_timestamp(&self.timestamp),
            self.sender,
            self.body
        )
    }
}

/// Parts of a message collected so far.
///
/// Each part is an explicit `Option`: a body that is present but empty is
/// `Some("")`, which differs from a body that was never seen.
#[derive(Debug, Default)]
pub struct PendingMessage {
    sender: Option<String>,
    timestamp: Option<(String, NaiveDateTime)>,
    body: Option<String>,
}

impl PendingMessage {
    /// Records the header parts. A later header replaces an earlier one.
    pub fn set_header(&mut self, sender: Option<String>, timestamp: Option<(String, NaiveDateTime)>) {
        self.sender = sender;
        self.timestamp = timestamp;
    }

    /// Records the body. A body element without text becomes `""`.
    pub fn set_body(&mut self, body: Option<String>) {
        self.body = Some(body.unwrap_or_default());
    }

    /// Returns `true` if sender, timestamp and body are all set.
    pub fn is_complete(&self) -> bool {
        self.sender.is_some() && self.timestamp.is_some() && self.body.is_some()
    }

    /// Returns `true` if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.sender.is_none() && self.timestamp.is_none() && self.body.is_none()
    }

    /// Builds the message and resets the builder, if the message is complete.
    pub fn take_complete(&mut self) -> Option<Message> {
        if !self.is_complete() {
            return None;
        }
        let PendingMessage {
            sender,
            timestamp,
            body,
        } = std::mem::take(self);
        let (original, timestamp) = timestamp?;
        Some(Message::new(sender?, timestamp, original, body?))
    }
}
