//! JSON output writer.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::core::models::OutputConfig;
use crate::error::Result;
use crate::parsing::format_timestamp;
use crate::thread::ConsolidatedThread;

/// JSON shape of one exported thread.
///
/// Fields are declared in alphabetical order so the output has sorted keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadRecord {
    pub messages: Vec<MessageRecord>,
    pub participants: Vec<String>,
    pub title: String,
}

/// JSON shape of one exported message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub text: String,
    /// `YYYY-MM-DD HH:MM`
    pub timestamp: String,
    pub user: String,
}

impl ThreadRecord {
    /// Builds the export record for `thread`.
    pub fn from_thread(thread: &ConsolidatedThread, config: &OutputConfig) -> Self {
        Self {
            messages: thread
                .messages()
                .iter()
                .map(|m| MessageRecord {
                    text: m.body().to_string(),
                    timestamp: format_timestamp(&m.timestamp()),
                    user: m.sender().to_string(),
                })
                .collect(),
            participants: config.participants(thread),
            title: thread.title().to_string(),
        }
    }
}

/// Writes a thread to `<dir>/<title>.json`, appending if the file exists.
///
/// # Format
/// ```json
/// {
///     "messages": [
///         {
///             "text": "Hello",
///             "timestamp": "2015-08-10 22:40",
///             "user": "Alice"
///         }
///     ],
///     "participants": ["Alice"],
///     "title": "Alice"
/// }
/// ```
pub fn write_json(
    thread: &ConsolidatedThread,
    dir: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<PathBuf> {
    let mut json = to_json(thread, config)?;
    json.push('\n');
    super::append_export(dir.as_ref(), thread.title(), "json", &json, config)
}

/// Converts a thread to a JSON string with four-space indentation.
///
/// Same format as [`write_json`], but returns a String instead of writing to
/// a file.
pub fn to_json(thread: &ConsolidatedThread, config: &OutputConfig) -> Result<String> {
    let record = ThreadRecord::from_thread(thread, config);
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    record.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
