//! Export adapters for consolidated threads.
//!
//! Each thread is written to its own file inside an output directory:
//! - [`write_csv`] / [`to_csv`] - one row per message - requires `csv-output` feature
//! - [`write_txt`] / [`to_txt`] - human-readable transcript
//! - [`write_json`] / [`to_json`] - one object per thread - requires `json-output` feature
//! - [`write_console`] - transcript to any writer, used for stdout
//!
//! # File naming
//!
//! A thread titled `Alice,Bob` exported as CSV lands in `<dir>/Alice,Bob.csv`.
//! Titles are cut to 100 characters and path separators become `_`. Files
//! that already exist are appended to, so exporting twice into the same
//! directory duplicates content.
//!
//! # Encoding
//!
//! Files are written in [`OutputConfig::encoding`](crate::core::models::OutputConfig)
//! (UTF-8 unless configured). A thread is encoded in full before its file is
//! opened, so a character the encoding cannot represent leaves the file
//! untouched.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "csv-output")]
//! # fn main() -> threadpack::Result<()> {
//! use threadpack::core::output::{write_csv, write_txt};
//! use threadpack::core::models::OutputConfig;
//! use threadpack::ConsolidatedThread;
//!
//! let thread = ConsolidatedThread::new("Alice", vec![]);
//! let config = OutputConfig::new();
//!
//! write_csv(&thread, "threadpack_out", &config)?;
//! write_txt(&thread, "threadpack_out", &config)?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "csv-output"))]
//! # fn main() {}
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::models::OutputConfig;
use crate::error::Result;

mod console;
#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
mod txt_writer;

pub use console::{print_thread, write_console};
#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{MessageRecord, ThreadRecord, to_json, write_json};
pub use txt_writer::{to_txt, write_txt};

/// Longest title prefix used in file names, in characters.
pub const MAX_FILE_STEM: usize = 100;

/// Width of the separator rule in text exports.
pub const RULE_WIDTH: usize = 80;

/// Returns the export path for a thread titled `title`.
///
/// # Example
///
/// ```rust
/// use threadpack::core::output::export_path;
/// use std::path::Path;
///
/// let path = export_path("out", "Alice/Bob", "txt");
/// assert_eq!(path, Path::new("out/Alice_Bob.txt"));
/// ```
pub fn export_path(dir: impl AsRef<Path>, title: &str, extension: &str) -> PathBuf {
    let stem: String = title
        .chars()
        .take(MAX_FILE_STEM)
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    dir.as_ref().join(format!("{stem}.{extension}"))
}

/// Opens the export file for `title` in append mode, creating `dir` first.
pub(crate) fn open_export(dir: &Path, title: &str, extension: &str) -> Result<(File, PathBuf)> {
    fs::create_dir_all(dir)?;
    let path = export_path(dir, title, extension);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}

/// Encodes `text` and appends it to the export file for `title`.
pub(crate) fn append_export(
    dir: &Path,
    title: &str,
    extension: &str,
    text: &str,
    config: &OutputConfig,
) -> Result<PathBuf> {
    let bytes = config.encoding.encode(text)?;
    let (mut file, path) = open_export(dir, title, extension)?;
    file.write_all(&bytes)?;
    Ok(path)
}

pub(crate) fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}
