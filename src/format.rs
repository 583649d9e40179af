//! Export format selection.
//!
//! [`ExportFormat`] names one of the export adapters in
//! [`core::output`](crate::core::output) and [`write_threads`] dispatches a
//! batch of threads to it. Unknown format names are rejected when parsed, so
//! a bad request never touches the output directory.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> threadpack::Result<()> {
//! use threadpack::format::{ExportFormat, write_threads};
//! use threadpack::core::models::OutputConfig;
//! use threadpack::ConsolidatedThread;
//!
//! let threads = vec![ConsolidatedThread::new("Alice", vec![])];
//! let format: ExportFormat = "txt".parse()?;
//!
//! let written = write_threads(&threads, "threadpack_out", format, &OutputConfig::new())?;
//! assert_eq!(written.len(), 1);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::models::OutputConfig;
use crate::error::ThreadpackError;
use crate::thread::ConsolidatedThread;

/// Destination format for exported threads.
///
/// # Example
///
/// ```rust
/// use threadpack::format::ExportFormat;
/// use std::str::FromStr;
///
/// let format = ExportFormat::from_str("TXT").unwrap();
/// assert_eq!(format, ExportFormat::Txt);
/// assert_eq!(format.extension(), Some("txt"));
/// assert!(ExportFormat::from_str("xml").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// One row per message: timestamp, sender, body
    #[default]
    Csv,

    /// Human-readable transcript with a participant header
    Txt,

    /// One JSON object per thread
    Json,

    /// Transcript printed to standard output, no files written
    Stdout,
}

impl ExportFormat {
    /// Returns the file extension for this format, or `None` for
    /// [`ExportFormat::Stdout`].
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            ExportFormat::Csv => Some("csv"),
            ExportFormat::Txt => Some("txt"),
            ExportFormat::Json => Some("json"),
            ExportFormat::Stdout => None,
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["csv", "txt", "json", "stdout"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [ExportFormat] {
        &[
            ExportFormat::Csv,
            ExportFormat::Txt,
            ExportFormat::Json,
            ExportFormat::Stdout,
        ]
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "CSV"),
            ExportFormat::Txt => write!(f, "TXT"),
            ExportFormat::Json => write!(f, "JSON"),
            ExportFormat::Stdout => write!(f, "stdout"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ThreadpackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "txt" | "text" => Ok(ExportFormat::Txt),
            "json" => Ok(ExportFormat::Json),
            "stdout" => Ok(ExportFormat::Stdout),
            _ => Err(ThreadpackError::unsupported_format(s)),
        }
    }
}

/// Writes one thread in `format`.
///
/// Returns the file written to, or `None` for [`ExportFormat::Stdout`].
///
/// # Errors
///
/// Returns an error if:
/// - The required feature for the format is not enabled
/// - The file cannot be written
#[allow(unused_variables)]
pub fn write_thread(
    thread: &ConsolidatedThread,
    dir: &Path,
    format: ExportFormat,
    config: &OutputConfig,
) -> Result<Option<PathBuf>, ThreadpackError> {
    use crate::core::output;

    match format {
        #[cfg(feature = "csv-output")]
        ExportFormat::Csv => output::write_csv(thread, dir, config).map(Some),
        ExportFormat::Txt => output::write_txt(thread, dir, config).map(Some),
        #[cfg(feature = "json-output")]
        ExportFormat::Json => output::write_json(thread, dir, config).map(Some),
        ExportFormat::Stdout => output::print_thread(thread, config).map(|()| None),
        #[allow(unreachable_patterns)]
        _ => Err(ThreadpackError::unsupported_format(format!(
            "{} (requires the '{}' feature)",
            format,
            match format {
                ExportFormat::Csv => "csv-output",
                _ => "json-output",
            }
        ))),
    }
}

/// Writes every thread in `format` into `dir`.
///
/// Returns the files written, in thread order.
pub fn write_threads(
    threads: &[ConsolidatedThread],
    dir: impl AsRef<Path>,
    format: ExportFormat,
    config: &OutputConfig,
) -> Result<Vec<PathBuf>, ThreadpackError> {
    let dir = dir.as_ref();
    let mut written = Vec::with_capacity(threads.len());
    for thread in threads {
        if let Some(path) = write_thread(thread, dir, format, config)? {
            written.push(path);
        }
    }
    Ok(written)
}
