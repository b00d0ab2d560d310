//! Append-only log of saved facts.
//!
//! Each saved fact becomes one line:
//!
//! ```text
//! [2024-05-01 12:34:56] [AI] Octopuses have three hearts.
//! ```
//!
//! The file is only ever appended to; the running process never reads it.

use crate::provider::{FactEntry, Provenance};
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Format of the timestamp field.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors from recording a fact.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Appends accepted facts to a file.
#[derive(Debug)]
pub struct SessionRecorder {
    path: PathBuf,
    written: usize,
}

impl SessionRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines written by this recorder.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Append one line for `fact`, creating the file if needed.
    pub async fn record(&mut self, fact: &str, provenance: Provenance) -> Result<(), RecordError> {
        let line = format_line(Local::now().naive_local(), provenance, fact);
        self.append(line.as_bytes())
            .await
            .map_err(|source| RecordError::Io {
                path: self.path.clone(),
                source,
            })?;
        self.written += 1;
        tracing::debug!(path = %self.path.display(), %provenance, "recorded fact");
        Ok(())
    }

    pub async fn record_entry(&mut self, entry: &FactEntry) -> Result<(), RecordError> {
        self.record(&entry.text, entry.provenance).await
    }

    async fn append(&self, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await
    }
}

/// Render one record line, including the trailing newline.
///
/// Line breaks inside the fact are flattened so that a record is always a
/// single line.
pub fn format_line(timestamp: NaiveDateTime, provenance: Provenance, fact: &str) -> String {
    let fact = fact.split_whitespace().collect::<Vec<_>>().join(" ");
    format!(
        "[{}] [{}] {}\n",
        timestamp.format(TIMESTAMP_FORMAT),
        provenance.tag(),
        fact
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at_noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 5))
            .unwrap()
    }

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line(at_noon(), Provenance::Remote, "Octopuses have three hearts."),
            "[2024-05-01 12:00:05] [AI] Octopuses have three hearts.\n"
        );
        assert_eq!(
            format_line(at_noon(), Provenance::Local, "Bananas are berries."),
            "[2024-05-01 12:00:05] [DB] Bananas are berries.\n"
        );
    }

    #[test]
    fn test_format_line_flattens_newlines() {
        let line = format_line(at_noon(), Provenance::Error, "one\ntwo\r\n  three");
        assert_eq!(line, "[2024-05-01 12:00:05] [ERR] one two three\n");
        assert_eq!(line.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_record_unwritable_path_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let mut recorder = SessionRecorder::new(dir.path());
        let err = recorder
            .record("Bananas are berries.", Provenance::Local)
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::Io { .. }));
        assert_eq!(recorder.written(), 0);
    }
}
