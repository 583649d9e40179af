//! Thread fragments and consolidated threads.
//!
//! The archive splits one conversation into several `div.thread` fragments,
//! each listing its messages newest-first. [`ThreadFragment`] is one such
//! fragment with its messages assembled and put in chronological order;
//! [`ConsolidatedThread`] is the conversation after all fragments with the
//! same participants have been merged.

use std::cell::OnceCell;
use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::error::{Result, ThreadpackError};
use crate::message::{Message, PendingMessage};
use crate::parsing::parse_archive_timestamp;
use crate::streaming::{RawNode, RawThread};

/// One thread fragment with its messages in chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadFragment {
    title_raw: String,
    messages: Vec<Message>,
}

impl ThreadFragment {
    /// Creates a fragment from messages that are already chronological.
    pub fn new(title_raw: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            title_raw: title_raw.into(),
            messages,
        }
    }

    /// Assembles the messages of a scanned fragment.
    ///
    /// Header and body nodes are fed to a [`PendingMessage`]; a message is
    /// appended the moment it becomes complete. The archive lists messages
    /// newest-first, so the list is reversed once at the end. Individual
    /// timestamps are never used for ordering: they lack seconds.
    ///
    /// With `skip_invalid`, a header whose timestamp cannot be parsed drops
    /// that message (and its body) instead of failing.
    pub fn from_raw(raw: RawThread, skip_invalid: bool) -> Result<Self> {
        let mut pending = PendingMessage::default();
        let mut messages = Vec::new();
        let mut skip_body = false;

        for node in raw.nodes {
            match node {
                RawNode::Header { user, meta } => {
                    skip_body = false;
                    let timestamp = match meta {
                        Some(text) => match parse_archive_timestamp(&text) {
                            Some(ts) => Some((text, ts)),
                            None if skip_invalid => {
                                warn!(thread = %raw.title, timestamp = %text, "skipping message with unrecognized timestamp");
                                pending = PendingMessage::default();
                                skip_body = true;
                                continue;
                            }
                            None => return Err(ThreadpackError::invalid_timestamp(text)),
                        },
                        None => None,
                    };
                    pending.set_header(user, timestamp);
                }
                RawNode::Body(_) if skip_body => {
                    skip_body = false;
                    continue;
                }
                RawNode::Body(body) => pending.set_body(body),
            }

            if let Some(message) = pending.take_complete() {
                messages.push(message);
            }
        }

        if !pending.is_empty() {
            debug!(thread = %raw.title, "discarding incomplete trailing message");
        }

        Ok(Self {
            title_raw: raw.title,
            messages: into_chronological(messages),
        })
    }

    /// Returns the title as written in the archive (`"Alice, Bob"`).
    pub fn title_raw(&self) -> &str {
        &self.title_raw
    }

    /// Returns the messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the timestamp of the oldest message, if any.
    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.messages.first().map(Message::timestamp)
    }

    /// Splits the fragment into its title and messages.
    pub fn into_parts(self) -> (String, Vec<Message>) {
        (self.title_raw, self.messages)
    }
}

/// Turns a fragment's newest-first message list into chronological order.
///
/// Applying it twice gives back the archive order.
pub fn into_chronological(mut archive_order: Vec<Message>) -> Vec<Message> {
    archive_order.reverse();
    archive_order
}

/// One conversation after merging every fragment that shares its title.
///
/// The participant list is derived from the messages on first use and
/// memoized.
#[derive(Debug, Clone)]
pub struct ConsolidatedThread {
    title: String,
    messages: Vec<Message>,
    participants: OnceCell<Vec<String>>,
}

impl ConsolidatedThread {
    /// Creates a thread from its final title and ordered messages.
    pub fn new(title: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            title: title.into(),
            messages,
            participants: OnceCell::new(),
        }
    }

    /// Returns the thread title (`"Alice"` or `"Alice,Bob"`).
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the messages in conversation order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the distinct senders, sorted.
    ///
    /// A thread without messages falls back to the names in its title.
    pub fn participants(&self) -> &[String] {
        self.participants.get_or_init(|| {
            let names: BTreeSet<&str> = self.messages.iter().map(Message::sender).collect();
            if names.is_empty() {
                self.title
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            } else {
                names.into_iter().map(str::to_string).collect()
            }
        })
    }

    /// Returns the participants without `name`, unless `name` is the only one.
    pub fn participants_without(&self, name: &str) -> Vec<String> {
        let all = self.participants();
        if all.len() > 1 {
            all.iter().filter(|p| *p != name).cloned().collect()
        } else {
            all.to_vec()
        }
    }
}

impl PartialEq for ConsolidatedThread {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.messages == other.messages
    }
}

impl Eq for ConsolidatedThread {}

impl std::fmt::Display for ConsolidatedThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Thread: {}", self.participants().join(", "))
    }
}
