//! Console output.

use std::io::{self, ErrorKind, Write};

use tracing::warn;

use crate::core::models::OutputConfig;
use crate::error::Result;
use crate::thread::ConsolidatedThread;

/// Prints a thread transcript to stdout.
pub fn print_thread(thread: &ConsolidatedThread, config: &OutputConfig) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_console(thread, config, &mut out)
}

/// Writes a thread transcript framed by separator rules.
///
/// A message line the destination refuses as invalid data is written again
/// as escaped bytes, so one unprintable message does not end the export.
pub fn write_console<W: Write>(
    thread: &ConsolidatedThread,
    config: &OutputConfig,
    out: &mut W,
) -> Result<()> {
    let rule = super::rule();
    writeln!(out, "{rule}")?;
    writeln!(out, "Thread:       {}", thread.title())?;
    writeln!(out, "Participants: {}", config.participants(thread).join(", "))?;
    writeln!(out)?;

    for msg in thread.messages() {
        let line = format!("{msg}\n");
        match out.write_all(line.as_bytes()) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!(thread = %thread.title(), "console rejected message, writing escaped bytes");
                out.write_all(&escape_bytes(msg.to_string().as_bytes()))?;
                out.write_all(b"\n")?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    writeln!(out)?;
    writeln!(out, "{rule}")?;
    out.flush()?;
    Ok(())
}

/// `"é"` → `"\xc3\xa9"`
fn escape_bytes(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .flat_map(|b| std::ascii::escape_default(*b))
        .collect()
}
