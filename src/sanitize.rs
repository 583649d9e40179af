//! In-place removal of characters the markup reader rejects.
//!
//! Some archives contain stray control, format or private-use characters that
//! make the XML reader stop halfway. [`sanitize_archive`] rewrites the file without them and
//! keeps the untouched original next to it as `<archive>.bak`.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use unicode_general_category::{GeneralCategory, get_general_category};

use crate::error::{Result, ThreadpackError};

/// Returns `true` for characters that are kept by [`strip_invalid_chars`]:
/// whitespace and everything outside the "other" (`C*`) general categories.
pub fn is_valid_char(c: char) -> bool {
    if c.is_whitespace() {
        return true;
    }
    !matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
    )
}

/// Removes control (`Cc`), format (`Cf`), private-use (`Co`) and unassigned
/// (`Cn`) characters, keeping whitespace.
///
/// # Example
///
/// ```
/// use threadpack::sanitize::strip_invalid_chars;
///
/// assert_eq!(strip_invalid_chars("a\u{0}b\u{200B}c\n"), "abc\n");
/// ```
pub fn strip_invalid_chars(line: &str) -> String {
    line.chars().filter(|c| is_valid_char(*c)).collect()
}

/// Strips invalid characters from the archive at `path`.
///
/// The cleaned content goes to a temporary file in the same directory; the
/// original is kept as `<archive>.bak` and the temporary file is then renamed
/// over the archive. The archive is left untouched if anything fails before
/// that rename. Returns the path of the backup.
pub fn sanitize_archive(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ThreadpackError::input_not_found("archive", path));
    }
    let wrap = |source| ThreadpackError::Sanitize {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(wrap)?;
    let removed = copy_stripped(path, temp.as_file_mut()).map_err(wrap)?;
    debug!(path = %path.display(), removed, "stripped invalid characters");

    let backup = backup_path(path);
    if backup.exists() {
        warn!(backup = %backup.display(), "overwriting existing backup");
        fs::remove_file(&backup).map_err(wrap)?;
    }
    if let Err(e) = fs::hard_link(path, &backup) {
        debug!(error = %e, "hard link failed, copying backup");
        fs::copy(path, &backup).map_err(wrap)?;
    }

    // NamedTempFile removes itself if persisting fails
    temp.persist(path).map_err(|e| wrap(e.error))?;
    info!(path = %path.display(), backup = %backup.display(), removed, "sanitized archive");
    Ok(backup)
}

/// `messages.htm` → `messages.htm.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

fn copy_stripped(path: &Path, out: &mut File) -> std::io::Result<usize> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut writer = BufWriter::new(out);
    let mut line = Vec::new();
    let mut removed = 0;
    let mut number = 0;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        number += 1;
        if let Err(e) = std::str::from_utf8(&line) {
            warn!(
                path = %path.display(),
                line = number,
                offset = e.valid_up_to(),
                "invalid UTF-8, replacing with U+FFFD"
            );
        }
        let text = String::from_utf8_lossy(&line);
        let clean = strip_invalid_chars(&text);
        removed += text.chars().count() - clean.chars().count();
        writer.write_all(clean.as_bytes())?;
    }

    writer.flush()?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_strip_invalid_chars() {
        assert_eq!(strip_invalid_chars("plain text"), "plain text");
        assert_eq!(strip_invalid_chars("tab\there\r\n"), "tab\there\r\n");
        assert_eq!(strip_invalid_chars("x\u{1}y\u{1f}z\u{7f}"), "xyz");
        assert_eq!(strip_invalid_chars("a\u{FFFE}b\u{FFFF}c"), "abc");
        assert_eq!(strip_invalid_chars("émoji 👍"), "émoji 👍");
    }

    #[test]
    fn test_strip_format_and_private_use_chars() {
        // Cf: zero width space, BOM, left-to-right mark; Co: U+E000
        assert_eq!(strip_invalid_chars("a\u{200B}b\u{FEFF}c\u{E000}d\u{200E}e"), "abcde");
        // Cn: unassigned plane 3 code point
        assert_eq!(strip_invalid_chars("x\u{3FFFD}y"), "xy");
        assert!(is_valid_char('\u{2028}'));
        assert!(is_valid_char('\u{A0}'));
        assert!(is_valid_char('\u{2764}'));
    }

    #[test]
    fn test_sanitize_archive_replaces_invalid_utf8() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("messages.htm");
        fs::write(&archive, b"<p>ok\xFFthere</p>\n").unwrap();

        sanitize_archive(&archive).unwrap();
        assert_eq!(fs::read_to_string(&archive).unwrap(), "<p>ok\u{FFFD}there</p>\n");
    }

    #[test]
    fn test_backup_path() {
        assert_eq!(
            backup_path(Path::new("/tmp/messages.htm")),
            PathBuf::from("/tmp/messages.htm.bak")
        );
    }

    #[test]
    fn test_sanitize_archive_rewrites_and_backs_up() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("messages.htm");
        fs::write(&archive, "<p>hi\u{0}there</p>\n<p>ok</p>\n").unwrap();

        let backup = sanitize_archive(&archive).unwrap();

        assert_eq!(backup, dir.path().join("messages.htm.bak"));
        assert_eq!(fs::read_to_string(&archive).unwrap(), "<p>hithere</p>\n<p>ok</p>\n");
        assert_eq!(
            fs::read_to_string(&backup).unwrap(),
            "<p>hi\u{0}there</p>\n<p>ok</p>\n"
        );
    }

    #[test]
    fn test_sanitize_archive_replaces_old_backup() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("messages.htm");
        fs::write(&archive, "new\u{2}").unwrap();
        fs::write(backup_path(&archive), "stale").unwrap();

        let backup = sanitize_archive(&archive).unwrap();
        assert_eq!(fs::read_to_string(backup).unwrap(), "new\u{2}");
        assert_eq!(fs::read_to_string(&archive).unwrap(), "new");
    }

    #[test]
    fn test_sanitize_missing_archive() {
        let dir = tempdir().unwrap();
        let err = sanitize_archive(dir.path().join("nope.htm")).unwrap_err();
        assert!(err.is_input_not_found());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
