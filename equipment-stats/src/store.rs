use std::sync::{Mutex, PoisonError};

use chrono::Utc;

use crate::record::UploadRecord;
use crate::summary::Summary;

/// Number of most-recent uploads the store keeps.
pub const RETAIN_LAST: usize = 5;

/// Bounded in-memory store of the most recent upload records.
///
/// Owns all retained records; handlers share it behind an `Arc`. Every
/// operation takes the inner lock once, so a concurrent reader never sees
/// the store above [`RETAIN_LAST`] records mid-append.
pub struct HistoryStore {
    inner: Mutex<StoreInner>,
}

struct StoreInner {
    records: Vec<UploadRecord>,
    next_id: u64,
}

impl HistoryStore {
    pub fn new() -> Self {
        HistoryStore {
            inner: Mutex::new(StoreInner {
                records: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Persist a summary as a new record and enforce retention.
    ///
    /// Assigns the next id and the current timestamp, inserts the record,
    /// then evicts oldest-by-`uploaded_at` entries (id as tiebreak) until at
    /// most [`RETAIN_LAST`] remain. Ids keep increasing across evictions and
    /// deletes. Returns the record as persisted.
    pub fn append(&self, filename: &str, summary: Summary) -> UploadRecord {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;

        let record = summary.into_record(id, filename, Utc::now());
        inner.records.push(record.clone());
        inner.enforce_retention();
        record
    }

    /// Up to `limit` records, newest first.
    pub fn list(&self, limit: usize) -> Vec<UploadRecord> {
        let inner = self.lock();
        let mut records = inner.records.clone();
        records.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        records.truncate(limit);
        records
    }

    /// The most recently uploaded record, if any.
    pub fn latest(&self) -> Option<UploadRecord> {
        self.list(1).into_iter().next()
    }

    pub fn get(&self, id: u64) -> Option<UploadRecord> {
        let inner = self.lock();
        inner.records.iter().find(|record| record.id == id).cloned()
    }

    /// Remove a record by id. Returns whether anything was deleted.
    pub fn delete(&self, id: u64) -> bool {
        let mut inner = self.lock();
        let before = inner.records.len();
        inner.records.retain(|record| record.id != id);
        inner.records.len() < before
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        // A poisoned lock only means another append panicked mid-call; the
        // record set itself stays well-formed, so keep serving it.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StoreInner {
    /// Evict until the retention invariant holds. Safe to re-run.
    fn enforce_retention(&mut self) {
        while self.records.len() > RETAIN_LAST {
            let oldest = self
                .records
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    a.uploaded_at
                        .cmp(&b.uploaded_at)
                        .then_with(|| a.id.cmp(&b.id))
                })
                .map(|(idx, _)| idx);
            match oldest {
                Some(idx) => {
                    self.records.remove(idx);
                }
                None => break,
            }
        }
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}
