//! CSV output writer.

use std::io::Write;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::core::models::OutputConfig;
use crate::error::Result;
use crate::parsing::CSV_TIMESTAMP_FORMAT;
use crate::thread::ConsolidatedThread;

/// Writes a thread to `<dir>/<title>.csv`, appending if the file exists.
///
/// # Format
/// - Delimiter: `,`
/// - Columns: `timestamp` (`%Y-%m-%d %H:%M:%S`), `sender`, `body`
/// - Quoting only where needed, `\n` line endings, no header row
///
/// Returns the path written to.
pub fn write_csv(
    thread: &ConsolidatedThread,
    dir: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<PathBuf> {
    let rows = to_csv(thread)?;
    super::append_export(dir.as_ref(), thread.title(), "csv", &rows, config)
}

/// Converts a thread to CSV rows.
///
/// Same format as [`write_csv`], but returns a String instead of writing to a
/// file.
pub fn to_csv(thread: &ConsolidatedThread) -> Result<String> {
    let mut buf = Vec::new();
    write_rows(thread, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_rows<W: Write>(thread: &ConsolidatedThread, out: W) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    for msg in thread.messages() {
        let timestamp = msg.timestamp().format(CSV_TIMESTAMP_FORMAT).to_string();
        writer.write_record([timestamp.as_str(), msg.sender(), msg.body()])?;
    }

    writer.flush()?;
    Ok(())
}
