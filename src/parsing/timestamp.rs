//! Timestamp parsing for the archive's verbose message headers.
//!
//! The archive writes headers such as `Monday, August 10, 2015 at 10:40pm EDT`
//! or `Saturday, December 11, 2017 at 05:12 PM`. The layout depends on the
//! locale the export was made with, so parsing is permissive: the weekday,
//! the `at` connector and the zone token are all optional, and the date and
//! time halves are tried against several chrono formats each.
//!
//! Zone abbreviations are ignored. The archive never includes seconds, and
//! the wall-clock time as printed is what every exporter renders.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

/// Rendering used by the JSON and TXT exporters: `2017-12-11 17:12`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Rendering used by the CSV exporter: `2017-12-11 17:12:00`.
pub const CSV_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static HEADER_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        ^\s*
        (?:[a-z]+,\s*)?                                   # weekday
        (?P<date>.+?)
        (?:,?\s+at)?                                      # connector
        \s+
        (?P<time>\d{1,2}:\d{2}(?::\d{2})?\s*(?:[ap]\.?\s?m\.?)?)
        (?:\s+(?P<zone>[a-z]{2,5}(?:[+-]\d{1,2}(?::?\d{2})?)?|[+-]\d{2}:?\d{2}))?
        \s*$",
    )
    .unwrap()
});

const DATE_FORMATS: &[&str] = &[
    "%B %d %Y", // August 10 2015
    "%b %d %Y", // Aug 10 2015
    "%d %B %Y", // 10 August 2015
    "%d %b %Y", // 10 Aug 2015
    "%Y-%m-%d", // 2015-08-10
    "%m/%d/%Y", // 08/10/2015
];

const TIME_FORMATS: &[&str] = &["%I:%M%p", "%I:%M:%S%p", "%H:%M", "%H:%M:%S"];

/// Parses a header timestamp into a naive calendar timestamp.
///
/// Returns `None` when neither half of the text matches a known layout.
///
/// # Example
///
/// ```rust
/// use threadpack::parsing::parse_archive_timestamp;
///
/// let ts = parse_archive_timestamp("Monday, August 10, 2015 at 10:40pm EDT").unwrap();
/// assert_eq!(ts.format("%Y-%m-%d %H:%M").to_string(), "2015-08-10 22:40");
/// ```
pub fn parse_archive_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let caps = HEADER_TIMESTAMP.captures(raw)?;
    let date = normalize_date(caps.name("date")?.as_str());
    let time = normalize_time(caps.name("time")?.as_str());

    let date = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&date, fmt).ok())?;
    let time = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&time, fmt).ok())?;

    Some(date.and_time(time))
}

/// Renders a timestamp the way the JSON and TXT exporters do.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn normalize_date(date: &str) -> String {
    date.replace(',', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// "10:40 p.m." -> "10:40PM"
fn normalize_time(time: &str) -> String {
    time.chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect::<String>()
        .to_uppercase()
}
