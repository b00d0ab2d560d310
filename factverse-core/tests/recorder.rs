//! Saved-facts file format.

use chrono::NaiveDateTime;
use factverse_core::recorder::TIMESTAMP_FORMAT;
use factverse_core::{FactEntry, Provenance, SessionRecorder};

fn parse_line(line: &str) -> (NaiveDateTime, String, String) {
    let rest = line.strip_prefix('[').expect("line starts with timestamp");
    let (timestamp, rest) = rest.split_once("] [").expect("timestamp is bracketed");
    let (tag, fact) = rest.split_once("] ").expect("tag is bracketed");
    let timestamp = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
        .expect("timestamp parses as a date-time");
    (timestamp, tag.to_string(), fact.to_string())
}

#[tokio::test]
async fn test_record_on_fresh_sink_writes_one_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved_facts.txt");
    let mut recorder = SessionRecorder::new(&path);

    recorder
        .record("Octopuses have three hearts and blue blood.", Provenance::Remote)
        .await
        .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.ends_with('\n'));
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 1);

    let (_, tag, fact) = parse_line(lines[0]);
    assert_eq!(tag, "AI");
    assert_eq!(fact, "Octopuses have three hearts and blue blood.");
    assert_eq!(recorder.written(), 1);
}

#[tokio::test]
async fn test_record_appends_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved_facts.txt");
    std::fs::write(&path, "[2020-01-01 00:00:00] [DB] From an earlier run.\n").unwrap();

    let mut recorder = SessionRecorder::new(&path);
    recorder
        .record_entry(&FactEntry::new("Bananas are berries.", Provenance::Local))
        .await
        .unwrap();
    recorder
        .record("No facts available for category: space", Provenance::Error)
        .await
        .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "[2020-01-01 00:00:00] [DB] From an earlier run.");

    let (first_ts, tag, fact) = parse_line(lines[1]);
    assert_eq!((tag.as_str(), fact.as_str()), ("DB", "Bananas are berries."));
    let (second_ts, tag, _) = parse_line(lines[2]);
    assert_eq!(tag, "ERR");
    assert!(second_ts >= first_ts);
}
