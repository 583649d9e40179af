//! Plain-text transcript writer.

use std::path::{Path, PathBuf};

use crate::core::models::OutputConfig;
use crate::error::Result;
use crate::thread::ConsolidatedThread;

/// Writes a thread transcript to `<dir>/<title>.txt`, appending if the file
/// exists. Returns the path written to.
pub fn write_txt(
    thread: &ConsolidatedThread,
    dir: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<PathBuf> {
    let text = to_txt(thread, config);
    super::append_export(dir.as_ref(), thread.title(), "txt", &text, config)
}

/// Renders a thread transcript.
///
/// # Format
/// ```text
/// Thread: Alice
/// Participants: Alice
/// --------------------------------------------------------------------------------
/// [2015-08-10 22:40] Alice: Hello
/// ```
pub fn to_txt(thread: &ConsolidatedThread, config: &OutputConfig) -> String {
    let mut out = format!(
        "Thread: {}\nParticipants: {}\n{}\n",
        thread.title(),
        config.participants(thread).join(", "),
        super::rule()
    );
    for msg in thread.messages() {
        out.push_str(&msg.to_string());
        out.push('\n');
    }
    out
}
