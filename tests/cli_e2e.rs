//! End-to-end CLI tests for threadpack.
//!
//! These tests verify the complete CLI workflow by running the actual binary
//! with various arguments and checking the output.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::{TempDir, tempdir};

// ============================================================================
// Test Fixtures
// ============================================================================

const ARCHIVE: &str = r#"<html><body><div class="contents"><h1>Jane Doe</h1>
<div class="thread">John Smith, 12345@facebook.com
<div class="message"><div class="message_header"><span class="user">John Smith</span><span class="meta">Wednesday, January 1, 2020 at 9:05am PST</span></div></div>
<p>happy new year</p>
<div class="message"><div class="message_header"><span class="user">12345@facebook.com</span><span class="meta">Wednesday, January 1, 2020 at 9:00am PST</span></div></div>
<p>hey</p>
</div>
<div class="thread">J Smith, 12345@facebook.com
<div class="message"><div class="message_header"><span class="user">J Smith</span><span class="meta">Saturday, June 1, 2019 at 5:12pm PDT</span></div></div>
<p>old name</p>
</div>
<div class="thread">Alice, 12345@facebook.com
<div class="message"><div class="message_header"><span class="user">Alice</span><span class="meta">Monday, August 10, 2015 at 10:40pm EDT</span></div></div>
<p><img src="sticker.png"/></p>
</div>
</div></body></html>"#;

fn setup() -> (TempDir, PathBuf) {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("messages.htm");
    fs::write(&path, ARCHIVE).unwrap();
    fs::write(dir.path().join("replace.ini"), "J Smith=John Smith\n").unwrap();
    (dir, path)
}

fn threadpack() -> Command {
    Command::cargo_bin("threadpack").unwrap()
}

// ============================================================================
// Basic functionality
// ============================================================================

#[test]
fn test_help() {
    threadpack()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--replace"))
        .stdout(predicate::str::contains("EXAMPLES"));
}

#[test]
fn test_parse_only_prints_summary() {
    let (dir, input) = setup();
    threadpack()
        .arg(&input)
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 threads"))
        .stdout(predicate::str::contains("Done"));
    assert!(!dir.path().join("threadpack_out").exists());
}

#[test]
fn test_csv_export_to_default_dir() {
    let (dir, input) = setup();
    threadpack()
        .args([input.to_str().unwrap(), "--csv", "--uid", "12345", "--name", "Jane Doe"])
        .current_dir(dir.path())
        .assert()
        .success();

    let out = dir.path().join("threadpack_out");
    let john = fs::read_to_string(out.join("John Smith.csv")).unwrap();
    assert_eq!(
        john,
        "2020-01-01 09:00:00,Jane Doe,hey\n2020-01-01 09:05:00,John Smith,happy new year\n"
    );
    assert!(out.join("J Smith.csv").exists());
    assert_eq!(
        fs::read_to_string(out.join("Alice.csv")).unwrap(),
        "2015-08-10 22:40:00,Alice,\n"
    );
}

#[test]
fn test_replacements_merge_threads() {
    let (dir, input) = setup();
    let out = dir.path().join("exports");
    threadpack()
        .arg(&input)
        .args(["--text", "--uid", "12345", "--replace"])
        .arg(dir.path().join("replace.ini"))
        .arg("--dir")
        .arg(&out)
        .assert()
        .success();

    let txt = fs::read_to_string(out.join("John Smith.txt")).unwrap();
    assert!(txt.starts_with("Thread: John Smith\nParticipants: John Smith\n"));
    let old = txt.find("John Smith: old name").unwrap();
    let new = txt.find("John Smith: happy new year").unwrap();
    assert!(old < new);
    assert!(!out.join("J Smith.txt").exists());
}

#[test]
fn test_json_and_stdout_together() {
    let (dir, input) = setup();
    let out = dir.path().join("json");
    threadpack()
        .arg(&input)
        .args(["--json", "--stdout", "--uid", "12345", "--dir"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Thread:       Alice"))
        .stdout(predicate::str::contains("[2015-08-10 22:40] Alice: "))
        .stdout(predicate::str::contains("Summary").not());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("Alice.json")).unwrap()).unwrap();
    assert_eq!(json["messages"][0]["text"], "");
    assert_eq!(json["participants"], serde_json::json!(["Alice"]));
}

#[test]
fn test_sanitize_creates_backup() {
    let (dir, input) = setup();
    threadpack()
        .arg(&input)
        .arg("--sanitize")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup saved"));
    assert!(dir.path().join("messages.htm.bak").exists());
}

#[test]
fn test_verbose_logs_to_stderr() {
    let (_dir, input) = setup();
    threadpack()
        .arg(&input)
        .arg("-v")
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("merged threads"));
}

// ============================================================================
// Error handling
// ============================================================================

#[test]
fn test_missing_input() {
    threadpack()
        .arg("/definitely/not/here.htm")
        .arg("--csv")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Couldn't find input file"));
}

#[test]
fn test_missing_replacements() {
    let (dir, input) = setup();
    threadpack()
        .arg(&input)
        .args(["--csv", "--replace", "nope.ini"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Couldn't find replacements file"));
    assert!(!dir.path().join("threadpack_out").exists());
}

#[test]
fn test_unsupported_encoding() {
    let (dir, input) = setup();
    threadpack()
        .arg(&input)
        .args(["--text", "--encoding", "utf-16"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported output encoding 'utf-16'"));
    assert!(!dir.path().join("threadpack_out").exists());
}

#[test]
fn test_latin1_export() {
    let (dir, input) = setup();
    fs::write(&input, ARCHIVE.replace("old name", "très vieux")).unwrap();
    threadpack()
        .arg(&input)
        .args(["--text", "--encoding", "latin1", "--uid", "12345"])
        .current_dir(dir.path())
        .assert()
        .success();

    let bytes = fs::read(dir.path().join("threadpack_out").join("J Smith.txt")).unwrap();
    assert!(bytes.windows(5).any(|w| w == b"tr\xE8s "));
}

#[test]
fn test_malformed_archive() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("messages.htm");
    fs::write(&input, r#"<div class="thread">Eve<p>broken</div>"#).unwrap();
    threadpack()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed markup"));
}

#[test]
fn test_missing_argument() {
    threadpack()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
