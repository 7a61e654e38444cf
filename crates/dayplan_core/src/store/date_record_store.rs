//! Date-keyed record store.
//!
//! # Responsibility
//! - Keep the authoritative map from calendar-date key to `DateBucket`.
//! - Serialize mutations per bucket while keeping dates independent.
//! - Expose the boundary operations used by UI and fact-fetcher callers.
//!
//! # Invariants
//! - Buckets are created lazily on first write and never removed.
//! - Read operations never create buckets and never mutate state.
//! - `set_on_this_day` performs its absent-check and write under one bucket
//!   guard, so racing callers observe exactly one success.
//! - The store performs no I/O; persistence goes through snapshots.

use crate::model::bucket::{DateBucket, Note, NoteId, OnThisDayFact};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

type BucketMap = HashMap<String, Arc<Mutex<DateBucket>>>;

/// Concurrent in-memory store of per-date notes and fact caches.
///
/// The date key is treated as an opaque identifier: any distinct string
/// addresses its own bucket, and calendar semantics stay with the caller.
pub struct DateRecordStore {
    buckets: RwLock<BucketMap>,
}

impl Default for DateRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DateRecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
        }
    }

    /// Rebuilds a store from persisted buckets.
    ///
    /// Later entries with a duplicate date key replace earlier ones; the
    /// repository layer never produces duplicates.
    pub fn from_snapshot(buckets: impl IntoIterator<Item = (String, DateBucket)>) -> Self {
        let map: BucketMap = buckets
            .into_iter()
            .map(|(date, bucket)| (date, Arc::new(Mutex::new(bucket))))
            .collect();
        Self {
            buckets: RwLock::new(map),
        }
    }

    /// Appends a note to the date's bucket and returns the issued id.
    ///
    /// # Contract
    /// - Creates the bucket when the date was never written before.
    /// - Accepts any content, including empty text.
    /// - Always succeeds.
    pub fn add_note(&self, date: &str, content: impl Into<String>) -> NoteId {
        let bucket = self.bucket_or_create(date);
        let mut guard = lock_bucket(&bucket);
        guard.add_note(content)
    }

    /// Returns the date's notes in insertion order.
    ///
    /// Empty for a date without a bucket. Never mutates state, so the UI
    /// can poll it freely.
    pub fn get_notes(&self, date: &str) -> Vec<Note> {
        match self.bucket(date) {
            Some(bucket) => lock_bucket(&bucket).notes.clone(),
            None => Vec::new(),
        }
    }

    /// Flips the completion flag of one note.
    ///
    /// Returns `false` as a no-op when the date has no bucket or the bucket
    /// has no note with this id. Never an error: missing ids are an expected
    /// condition at this boundary.
    pub fn toggle_note_complete(&self, date: &str, id: NoteId) -> bool {
        match self.bucket(date) {
            Some(bucket) => lock_bucket(&bucket).toggle_note(id),
            None => false,
        }
    }

    /// Counts the date's notes that are not yet complete.
    ///
    /// Always consistent with [`get_notes`](Self::get_notes): the count is
    /// recomputed from the same note sequence under the same guard.
    pub fn get_incomplete_note_count(&self, date: &str) -> u64 {
        match self.bucket(date) {
            Some(bucket) => lock_bucket(&bucket).incomplete_count(),
            None => 0,
        }
    }

    /// Returns the cached fact for the date, if any.
    ///
    /// Never triggers network access; an absent result means the fetcher
    /// collaborator has not cached anything yet.
    pub fn get_on_this_day(&self, date: &str) -> Option<OnThisDayFact> {
        self.bucket(date)
            .and_then(|bucket| lock_bucket(&bucket).fact.clone())
    }

    /// Caches the fact for the date if none is cached yet.
    ///
    /// Write-once compare-and-set: returns `true` when this call filled the
    /// slot, `false` (state unchanged) when a fact already exists. Two
    /// racing calls for one uncached date yield exactly one `true`.
    pub fn set_on_this_day(&self, date: &str, fact: OnThisDayFact) -> bool {
        let bucket = self.bucket_or_create(date);
        let mut guard = lock_bucket(&bucket);
        guard.set_fact(fact)
    }

    /// Returns a deterministic (date-sorted) copy of the whole store.
    pub fn snapshot(&self) -> Vec<(String, DateBucket)> {
        let map = self
            .buckets
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut entries: Vec<(String, DateBucket)> = map
            .iter()
            .map(|(date, bucket)| (date.clone(), lock_bucket(bucket).clone()))
            .collect();
        entries.sort_by(|left, right| left.0.cmp(&right.0));
        entries
    }

    fn bucket(&self, date: &str) -> Option<Arc<Mutex<DateBucket>>> {
        self.buckets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(date)
            .cloned()
    }

    fn bucket_or_create(&self, date: &str) -> Arc<Mutex<DateBucket>> {
        // Fast path: the bucket usually exists already, and a read lock
        // keeps unrelated dates from contending.
        if let Some(bucket) = self.bucket(date) {
            return bucket;
        }

        let mut map = self
            .buckets
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        map.entry(date.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(DateBucket::new())))
            .clone()
    }
}

// Why: a poisoned guard only records that some other caller panicked while
// holding it; bucket invariants hold after every statement in the mutation
// paths, so recovering the inner value is safe and keeps the boundary
// operations infallible.
fn lock_bucket(bucket: &Mutex<DateBucket>) -> MutexGuard<'_, DateBucket> {
    bucket.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::DateRecordStore;

    #[test]
    fn reads_never_create_buckets() {
        let store = DateRecordStore::new();

        assert!(store.get_notes("2024-03-01").is_empty());
        assert_eq!(store.get_incomplete_note_count("2024-03-01"), 0);
        assert_eq!(store.get_on_this_day("2024-03-01"), None);
        assert!(!store.toggle_note_complete("2024-03-01", 1));

        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn snapshot_is_date_sorted() {
        let store = DateRecordStore::new();
        store.add_note("2024-03-02", "later");
        store.add_note("2024-03-01", "earlier");

        let snapshot = store.snapshot();
        let dates: Vec<&str> = snapshot.iter().map(|(date, _)| date.as_str()).collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-03-02"]);
    }
}
