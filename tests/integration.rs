//! Integration tests for the full archive pipeline with real files.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};
use threadpack::prelude::*;

// ============================================================================
// Test Fixtures
// ============================================================================

/// Builds one `div.thread` with messages given newest-first, as the archive
/// lists them.
fn thread_markup(title: &str, messages: &[(&str, &str, &str)]) -> String {
    let mut out = format!("<div class=\"thread\">{title}\n");
    for (user, meta, body) in messages {
        out.push_str(&format!(
            "<div class=\"message\"><div class=\"message_header\">\
             <span class=\"user\">{user}</span><span class=\"meta\">{meta}</span>\
             </div></div>\n<p>{body}</p>\n"
        ));
    }
    out.push_str("</div>\n");
    out
}

fn archive_markup(threads: &[String]) -> String {
    format!(
        "<html><head><title>Messages</title></head><body>\
         <div class=\"contents\"><h1>Jane Doe</h1>\n{}</div></body></html>",
        threads.concat()
    )
}

fn sample_archive() -> String {
    archive_markup(&[
        thread_markup(
            "John Smith, 12345@facebook.com",
            &[
                ("John Smith", "Wednesday, January 1, 2020 at 9:05am PST", "happy new year"),
                ("12345@facebook.com", "Wednesday, January 1, 2020 at 9:00am PST", "hey"),
            ],
        ),
        thread_markup(
            "Alice, Jane Doe",
            &[("Alice", "Monday, August 10, 2015 at 10:40pm EDT", "just alice")],
        ),
        thread_markup(
            "7890@facebook.com, Jane Doe",
            &[
                ("7890@facebook.com", "Saturday, June 1, 2019 at 5:12pm PDT", "old account"),
                ("Jane Doe", "Saturday, June 1, 2019 at 5:10pm PDT", "hi john"),
            ],
        ),
        thread_markup("Alice, Jane Doe", &[]),
    ])
}

fn setup(markup: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("messages.htm");
    fs::write(&path, markup).unwrap();
    (dir, path)
}

fn config() -> ArchiveConfig {
    let mut replacements = ReplacementNames::new();
    replacements.insert("John Smith", "7890@facebook.com");
    ArchiveConfig::new()
        .with_owner(
            OwnerIdentity::new()
                .with_uid("12345")
                .with_name("Jane Doe"),
        )
        .with_replacements(replacements)
}

fn titles(threads: &[ConsolidatedThread]) -> Vec<&str> {
    threads.iter().map(ConsolidatedThread::title).collect()
}

fn bodies(thread: &ConsolidatedThread) -> Vec<&str> {
    thread.messages().iter().map(Message::body).collect()
}

// ============================================================================
// Pipeline
// ============================================================================

#[test]
fn test_pipeline_merges_aliases_into_one_thread() {
    let (_dir, path) = setup(&sample_archive());
    let mut archive = MessageArchive::new(&path, config()).unwrap();

    let threads = archive.threads().unwrap();
    assert_eq!(titles(threads), vec!["Alice", "John Smith"]);

    let john = &threads[1];
    assert_eq!(
        bodies(john),
        vec!["hi john", "old account", "hey", "happy new year"]
    );
    let senders: Vec<_> = john.messages().iter().map(Message::sender).collect();
    assert_eq!(senders, vec!["Jane Doe", "John Smith", "Jane Doe", "John Smith"]);
    assert_eq!(
        john.participants(),
        ["Jane Doe".to_string(), "John Smith".to_string()]
    );
}

#[test]
fn test_pipeline_keeps_empty_fragment_participants() {
    let (_dir, path) = setup(&sample_archive());
    let mut archive = MessageArchive::new(&path, config()).unwrap();

    let threads = archive.threads().unwrap();
    let alice = &threads[0];
    assert_eq!(bodies(alice), vec!["just alice"]);
    assert_eq!(alice.participants(), ["Alice".to_string()]);
}

#[test]
fn test_pipeline_stats() {
    let (_dir, path) = setup(&sample_archive());
    let mut archive = MessageArchive::new(&path, config()).unwrap();
    archive.threads().unwrap();

    let stats = archive.stats().unwrap();
    assert_eq!(stats.fragments, 4);
    assert_eq!(stats.threads, 2);
    assert_eq!(stats.messages, 5);
}

#[test]
fn test_pipeline_without_owner_keeps_uid_titles() {
    let (_dir, path) = setup(&sample_archive());
    let mut archive = MessageArchive::new(&path, ArchiveConfig::new()).unwrap();

    let threads = archive.threads().unwrap();
    assert_eq!(
        titles(threads),
        vec![
            "12345@facebook.com,John Smith",
            "7890@facebook.com,Jane Doe",
            "Alice,Jane Doe",
        ]
    );
}

#[test]
fn test_fragments_merge_in_chronological_order() {
    let markup = archive_markup(&[
        thread_markup(
            "Alice",
            &[
                ("Alice", "Thursday, January 2, 2020 at 10:00am UTC", "2020 b"),
                ("Alice", "Wednesday, January 1, 2020 at 10:00am UTC", "2020 a"),
            ],
        ),
        thread_markup(
            "Alice",
            &[
                ("Alice", "Monday, June 3, 2019 at 10:00am UTC", "2019 c"),
                ("Alice", "Sunday, June 2, 2019 at 10:00am UTC", "2019 b"),
                ("Alice", "Saturday, June 1, 2019 at 10:00am UTC", "2019 a"),
            ],
        ),
    ]);
    let (_dir, path) = setup(&markup);
    let mut archive = MessageArchive::new(&path, ArchiveConfig::new()).unwrap();

    let threads = archive.threads().unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(
        bodies(&threads[0]),
        vec!["2019 a", "2019 b", "2019 c", "2020 a", "2020 b"]
    );
}

#[test]
fn test_replacement_file_round_trip() {
    let (dir, path) = setup(&sample_archive());
    let replace = dir.path().join("replace.ini");
    fs::write(&replace, "# friends\n7890@facebook.com=John Smith\n").unwrap();

    let config = ArchiveConfig::new()
        .with_owner(OwnerIdentity::new().with_uid("12345").with_name("Jane Doe"))
        .with_replacements(ReplacementNames::load(&replace).unwrap());
    let mut archive = MessageArchive::new(&path, config).unwrap();

    assert_eq!(titles(archive.threads().unwrap()), vec!["Alice", "John Smith"]);
}

#[test]
fn test_owner_alias_maps_old_name() {
    let markup = archive_markup(&[thread_markup(
        "Alice, Janie",
        &[("Janie", "Monday, August 10, 2015 at 10:40pm EDT", "old me")],
    )]);
    let (_dir, path) = setup(&markup);
    let config = ArchiveConfig::new().with_owner(
        OwnerIdentity::new()
            .with_name("Jane Doe")
            .with_alias("Janie"),
    );
    let mut archive = MessageArchive::new(&path, config).unwrap();

    let threads = archive.threads().unwrap();
    assert_eq!(threads[0].title(), "Alice");
    assert_eq!(threads[0].messages()[0].sender(), "Jane Doe");
}

// ============================================================================
// Export
// ============================================================================

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_write_all_formats() {
    let (dir, path) = setup(&sample_archive());
    let out = dir.path().join("out");
    let mut archive = MessageArchive::new(&path, config()).unwrap();

    for format in [ExportFormat::Csv, ExportFormat::Txt, ExportFormat::Json] {
        let written = archive.write(&out, format).unwrap();
        assert_eq!(written.len(), 2);
    }

    let csv = read(&out.join("John Smith.csv"));
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.starts_with("2019-06-01 17:10:00,Jane Doe,hi john\n"));

    let txt = read(&out.join("John Smith.txt"));
    assert!(txt.starts_with("Thread: John Smith\nParticipants: John Smith\n"));
    assert!(txt.contains("[2020-01-01 09:05] John Smith: happy new year"));

    let json: serde_json::Value = serde_json::from_str(&read(&out.join("Alice.json"))).unwrap();
    assert_eq!(json["title"], "Alice");
    assert_eq!(json["messages"][0]["timestamp"], "2015-08-10 22:40");
}

#[test]
fn test_write_appends_on_second_run() {
    let (dir, path) = setup(&sample_archive());
    let out = dir.path().join("out");
    let mut archive = MessageArchive::new(&path, config()).unwrap();

    archive.write(&out, ExportFormat::Csv).unwrap();
    archive.write(&out, ExportFormat::Csv).unwrap();

    assert_eq!(read(&out.join("Alice.csv")).lines().count(), 2);
}

#[test]
fn test_sanitized_archive_parses() {
    let markup = archive_markup(&[thread_markup(
        "Alice",
        &[("Alice", "Monday, August 10, 2015 at 10:40pm EDT", "bell\u{7}char")],
    )]);
    let (_dir, path) = setup(&markup);

    let mut archive =
        MessageArchive::new(&path, ArchiveConfig::new().with_sanitize(true)).unwrap();
    let threads = archive.threads().unwrap();
    assert_eq!(bodies(&threads[0]), vec!["bellchar"]);

    let backup = archive.backup_path().unwrap();
    assert!(read(backup).contains('\u{7}'));
}
