//! Tests for the export adapters through the public API.

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::tempdir;

use threadpack::core::output::{ThreadRecord, export_path, to_csv, to_json, to_txt, write_console};
use threadpack::core::OutputConfig;
use threadpack::format::write_threads;
use threadpack::parsing::format_timestamp;
use threadpack::{ConsolidatedThread, ExportFormat, Message};

fn ts(day: u32, hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2017, 12, day)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
}

fn sample_thread() -> ConsolidatedThread {
    ConsolidatedThread::new(
        "Bob,Carol",
        vec![
            Message::new("Bob", ts(11, 17, 12), "Monday, December 11, 2017 at 5:12pm PST", "Hello"),
            Message::new("Me", ts(11, 17, 13), "Monday, December 11, 2017 at 5:13pm PST", ""),
            Message::new("Carol", ts(12, 8, 0), "Tuesday, December 12, 2017 at 8:00am PST", "Привет 🎉"),
            Message::new("Bob", ts(12, 8, 1), "Tuesday, December 12, 2017 at 8:01am PST", "a, \"quoted\"\nline"),
        ],
    )
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn test_json_round_trip() {
    let thread = sample_thread();
    let config = OutputConfig::new().with_hide_participant("Me");
    let json = to_json(&thread, &config).unwrap();

    let record: ThreadRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(record.title, thread.title());
    assert_eq!(record.participants, vec!["Bob".to_string(), "Carol".to_string()]);
    assert_eq!(record.messages.len(), thread.messages().len());
    for (exported, original) in record.messages.iter().zip(thread.messages()) {
        assert_eq!(exported.user, original.sender());
        assert_eq!(exported.timestamp, format_timestamp(&original.timestamp()));
        assert_eq!(exported.text, original.body());
    }
}

#[test]
fn test_json_keeps_unicode() {
    let json = to_json(&sample_thread(), &OutputConfig::new()).unwrap();
    assert!(json.contains("Привет 🎉"));
}

// ============================================================================
// CSV
// ============================================================================

#[test]
fn test_csv_parses_back() {
    let csv = to_csv(&sample_thread()).unwrap();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(csv.as_bytes());

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(&rows[0][0], "2017-12-11 17:12:00");
    assert_eq!(&rows[1][2], "");
    assert_eq!(&rows[3][2], "a, \"quoted\"\nline");
}

// ============================================================================
// TXT / console
// ============================================================================

#[test]
fn test_txt_message_lines() {
    let txt = to_txt(&sample_thread(), &OutputConfig::new());
    assert!(txt.contains("Participants: Bob, Carol, Me\n"));
    assert!(txt.contains("\n[2017-12-11 17:13] Me: \n"));
    assert!(txt.contains("\n[2017-12-12 08:00] Carol: Привет 🎉\n"));
}

#[test]
fn test_console_hides_owner() {
    let mut out = Vec::new();
    let config = OutputConfig::new().with_hide_participant("Me");
    write_console(&sample_thread(), &config, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Participants: Bob, Carol\n"));
    assert!(text.contains("[2017-12-11 17:12] Bob: Hello"));
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_write_threads_each_format() {
    let dir = tempdir().unwrap();
    let threads = vec![sample_thread(), ConsolidatedThread::new("Dan", vec![])];
    let config = OutputConfig::new();

    for format in [ExportFormat::Csv, ExportFormat::Txt, ExportFormat::Json] {
        let written = write_threads(&threads, dir.path(), format, &config).unwrap();
        let ext = format.extension().unwrap();
        assert_eq!(
            written,
            vec![
                export_path(dir.path(), "Bob,Carol", ext),
                export_path(dir.path(), "Dan", ext),
            ]
        );
        assert!(written.iter().all(|p| p.exists()));
    }

    // A thread without messages still gets an (empty) CSV file
    let empty = std::fs::read_to_string(dir.path().join("Dan.csv")).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn test_unknown_format_rejected_before_io() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("never");
    let parsed = "xml".parse::<ExportFormat>();
    assert!(parsed.is_err());
    assert!(!out.exists());
}
