//! Planner use-case service.
//!
//! # Responsibility
//! - Expose the boundary operations to UI and fact-fetcher callers.
//! - Own snapshot round trips between the live store and a repository.
//!
//! # Invariants
//! - The six record operations keep the store's contract unchanged:
//!   infallible or boolean, never an error for expected misses.
//! - Service errors only wrap repository failures; a failed persist or load
//!   never corrupts the live store.

use crate::model::bucket::{Note, NoteId, OnThisDayFact};
use crate::repo::state_repo::{RepoError, StateRepository};
use crate::store::date_record_store::DateRecordStore;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for snapshot round trips.
#[derive(Debug)]
pub enum ServiceError {
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Facade over one live store plus its snapshot repository.
pub struct PlannerService<R: StateRepository> {
    store: DateRecordStore,
    repo: R,
}

impl<R: StateRepository> PlannerService<R> {
    /// Creates a service with an empty store.
    pub fn new(repo: R) -> Self {
        Self {
            store: DateRecordStore::new(),
            repo,
        }
    }

    /// Creates a service whose store starts from the persisted snapshot.
    pub fn load(repo: R) -> Result<Self, ServiceError> {
        let buckets = repo.load_state()?;
        info!(
            "event=state_load module=service status=ok buckets={}",
            buckets.len()
        );
        Ok(Self {
            store: DateRecordStore::from_snapshot(buckets),
            repo,
        })
    }

    /// Writes the current store state into the repository.
    pub fn persist(&mut self) -> Result<(), ServiceError> {
        let snapshot = self.store.snapshot();
        let bucket_count = snapshot.len();
        self.repo.save_state(&snapshot)?;
        info!("event=state_persist module=service status=ok buckets={bucket_count}");
        Ok(())
    }

    /// Appends a note to the date and returns its id.
    pub fn add_note(&self, date: &str, content: impl Into<String>) -> NoteId {
        self.store.add_note(date, content)
    }

    /// Returns the date's notes in insertion order.
    pub fn get_notes(&self, date: &str) -> Vec<Note> {
        self.store.get_notes(date)
    }

    /// Flips one note's completion flag; `false` for unknown date/id.
    pub fn toggle_note_complete(&self, date: &str, id: NoteId) -> bool {
        self.store.toggle_note_complete(date, id)
    }

    /// Counts the date's incomplete notes.
    pub fn get_incomplete_note_count(&self, date: &str) -> u64 {
        self.store.get_incomplete_note_count(date)
    }

    /// Returns the cached fact, if any. Never touches the network.
    pub fn get_on_this_day(&self, date: &str) -> Option<OnThisDayFact> {
        self.store.get_on_this_day(date)
    }

    /// Caches a fetched fact, write-once per date.
    ///
    /// This is the entry point for the fetcher collaborator: it extracts
    /// title/year/link from the feed response and hands them over here. A
    /// `false` result means another fetch already cached this date.
    pub fn set_on_this_day(
        &self,
        date: &str,
        title: impl Into<String>,
        year: i64,
        wiki_link: impl Into<String>,
    ) -> bool {
        self.store.set_on_this_day(
            date,
            OnThisDayFact {
                title: title.into(),
                year,
                wiki_link: wiki_link.into(),
            },
        )
    }

    /// Direct access to the live store.
    pub fn store(&self) -> &DateRecordStore {
        &self.store
    }
}
