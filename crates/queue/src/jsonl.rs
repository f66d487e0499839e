use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::QueueError;
use crate::record::CompletionRecord;
use crate::traits::CompletionQueue;

/// File-backed queue: appends one JSON record per line.
///
/// A fulfillment worker tails the file. Appends from concurrent turns in
/// the same process are serialized so lines never interleave.
#[derive(Debug)]
pub struct JsonLinesQueue {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonLinesQueue {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonLinesQueue {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every record in the file. A missing file is an empty queue.
    pub fn records(&self) -> Result<Vec<CompletionRecord>, QueueError> {
        let file = match std::fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }
}

impl CompletionQueue for JsonLinesQueue {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    fn enqueue(&self, record: &CompletionRecord) -> Result<(), QueueError> {
        let mut line = record.to_json()?;
        line.push('\n');

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;
        tracing::debug!(path = %self.path.display(), "appended completion record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(people: &str) -> CompletionRecord {
        CompletionRecord {
            location: "manhattan".to_string(),
            cuisine: "Japanese".to_string(),
            dining_date: "2026-04-01".to_string(),
            dining_time: "20:15".to_string(),
            number_of_people: people.to_string(),
            email: "user@yahoo.com".to_string(),
        }
    }

    #[test]
    fn appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("completions.jsonl");
        let queue = JsonLinesQueue::new(&path);

        queue.enqueue(&record("2")).unwrap();
        queue.enqueue(&record("6")).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.lines().all(|l| l.starts_with("{\"Location\"")));

        let people: Vec<String> = queue
            .records()
            .unwrap()
            .into_iter()
            .map(|r| r.number_of_people)
            .collect();
        assert_eq!(people, vec!["2", "6"]);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let queue = JsonLinesQueue::new(dir.path().join("nothing-yet.jsonl"));
        assert!(queue.records().unwrap().is_empty());
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let queue = JsonLinesQueue::new(dir.path().join("no-such-dir").join("q.jsonl"));
        assert!(matches!(queue.enqueue(&record("2")), Err(QueueError::Io(_))));
    }
}
