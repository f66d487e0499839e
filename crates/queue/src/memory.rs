use std::sync::{Mutex, MutexGuard};

use crate::error::QueueError;
use crate::record::CompletionRecord;
use crate::traits::CompletionQueue;

/// In-process queue that keeps every enqueued record.
///
/// Useful when embedding the engine and for inspecting hand-offs in tests.
#[derive(Debug, Default)]
pub struct MemoryQueue {
    records: Mutex<Vec<CompletionRecord>>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<CompletionRecord>> {
        // A panic while holding the lock cannot leave a half-pushed Vec.
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of all records enqueued so far, oldest first.
    pub fn records(&self) -> Vec<CompletionRecord> {
        self.guard().clone()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    /// Remove and return all records, oldest first.
    pub fn drain(&self) -> Vec<CompletionRecord> {
        std::mem::take(&mut *self.guard())
    }
}

impl CompletionQueue for MemoryQueue {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn enqueue(&self, record: &CompletionRecord) -> Result<(), QueueError> {
        self.guard().push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(email: &str) -> CompletionRecord {
        CompletionRecord {
            location: "nyc".to_string(),
            cuisine: "Chinese".to_string(),
            dining_date: "2026-03-05".to_string(),
            dining_time: "18:30".to_string(),
            number_of_people: "2".to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn keeps_records_in_order() {
        let queue = MemoryQueue::new();
        assert!(queue.is_empty());
        queue.enqueue(&record("a@gmail.com")).unwrap();
        queue.enqueue(&record("b@gmail.com")).unwrap();
        let emails: Vec<String> = queue.records().into_iter().map(|r| r.email).collect();
        assert_eq!(emails, vec!["a@gmail.com", "b@gmail.com"]);
    }

    #[test]
    fn drain_empties_the_queue() {
        let queue = MemoryQueue::new();
        queue.enqueue(&record("a@gmail.com")).unwrap();
        assert_eq!(queue.drain().len(), 1);
        assert_eq!(queue.len(), 0);
    }
}
