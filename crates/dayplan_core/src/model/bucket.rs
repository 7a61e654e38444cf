//! Per-date record model.
//!
//! # Responsibility
//! - Define `Note`, `OnThisDayFact` and the `DateBucket` that owns them.
//! - Issue bucket-scoped note ids and guard the write-once fact slot.
//!
//! # Invariants
//! - `next_note_id` is strictly greater than every id ever issued by the
//!   bucket and never rewinds.
//! - Note ids are strictly increasing, so insertion order equals id order.
//! - A cached fact is terminal: no operation clears or replaces it.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Bucket-scoped note identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
/// Ids are small per-date counters, not global identifiers.
pub type NoteId = u64;

/// First id a fresh bucket hands out.
pub const FIRST_NOTE_ID: NoteId = 1;

/// One free-text to-do entry attached to a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Bucket-scoped id, assigned by the bucket, never reused.
    pub id: NoteId,
    /// Free text. The store accepts any text; rejecting blank input is
    /// caller policy, not a model rule.
    pub content: String,
    /// Completion flag, `false` at creation.
    pub is_complete: bool,
}

/// Cached "on this day" historical fact for one date.
///
/// At most one per bucket, written once and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnThisDayFact {
    /// Text summary of the event.
    pub title: String,
    /// Event year. Signed: historical facts may predate year 0.
    pub year: i64,
    /// Link to the encyclopedia article.
    pub wiki_link: String,
}

/// Validation error for persisted bucket state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketValidationError {
    /// Note ids are not strictly increasing in storage order.
    NoteIdsNotIncreasing { previous: NoteId, current: NoteId },
    /// The id counter does not exceed an already-issued id.
    NextIdNotAboveIssued { next_note_id: NoteId, issued: NoteId },
    /// The id counter is below the smallest id a bucket can issue.
    NextIdBelowFirst { next_note_id: NoteId },
}

impl Display for BucketValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteIdsNotIncreasing { previous, current } => write!(
                f,
                "note ids must be strictly increasing, got {current} after {previous}"
            ),
            Self::NextIdNotAboveIssued {
                next_note_id,
                issued,
            } => write!(
                f,
                "next_note_id ({next_note_id}) must be greater than issued id ({issued})"
            ),
            Self::NextIdBelowFirst { next_note_id } => write!(
                f,
                "next_note_id ({next_note_id}) must be at least {FIRST_NOTE_ID}"
            ),
        }
    }
}

impl Error for BucketValidationError {}

/// All state the store keeps for one calendar date.
///
/// Buckets are created lazily on first write and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBucket {
    /// Notes in insertion order with bucket-unique ids.
    pub notes: Vec<Note>,
    /// Write-once cached fact.
    pub fact: Option<OnThisDayFact>,
    /// Next id to issue. Strictly increasing, never reset.
    pub next_note_id: NoteId,
}

impl Default for DateBucket {
    fn default() -> Self {
        Self::new()
    }
}

impl DateBucket {
    /// Creates an empty bucket with the id counter at its starting value.
    pub fn new() -> Self {
        Self {
            notes: Vec::new(),
            fact: None,
            next_note_id: FIRST_NOTE_ID,
        }
    }

    /// Appends a note with the next id and returns the id.
    ///
    /// # Contract
    /// - `is_complete` starts as `false`.
    /// - The issued id is never handed out again by this bucket.
    pub fn add_note(&mut self, content: impl Into<String>) -> NoteId {
        let id = self.next_note_id;
        self.next_note_id += 1;
        self.notes.push(Note {
            id,
            content: content.into(),
            is_complete: false,
        });
        id
    }

    /// Flips the completion flag of the note with the given id.
    ///
    /// Returns `false` without touching state when no such note exists.
    pub fn toggle_note(&mut self, id: NoteId) -> bool {
        match self.notes.iter_mut().find(|note| note.id == id) {
            Some(note) => {
                note.is_complete = !note.is_complete;
                true
            }
            None => false,
        }
    }

    /// Counts notes that are not yet complete.
    ///
    /// Recomputed from the live note sequence on every call, so it can
    /// never drift from `notes`.
    pub fn incomplete_count(&self) -> u64 {
        self.notes.iter().filter(|note| !note.is_complete).count() as u64
    }

    /// Fills the fact slot if it is still empty.
    ///
    /// Returns `true` when the fact was stored, `false` when a fact is
    /// already cached (state unchanged).
    pub fn set_fact(&mut self, fact: OnThisDayFact) -> bool {
        if self.fact.is_some() {
            return false;
        }
        self.fact = Some(fact);
        true
    }

    /// Checks the bucket invariants on state that crossed a trust boundary.
    ///
    /// # Errors
    /// - Note ids out of order or duplicated.
    /// - `next_note_id` not strictly above every stored id.
    pub fn validate(&self) -> Result<(), BucketValidationError> {
        if self.next_note_id < FIRST_NOTE_ID {
            return Err(BucketValidationError::NextIdBelowFirst {
                next_note_id: self.next_note_id,
            });
        }

        let mut previous: Option<NoteId> = None;
        for note in &self.notes {
            if let Some(previous) = previous {
                if note.id <= previous {
                    return Err(BucketValidationError::NoteIdsNotIncreasing {
                        previous,
                        current: note.id,
                    });
                }
            }
            if note.id >= self.next_note_id {
                return Err(BucketValidationError::NextIdNotAboveIssued {
                    next_note_id: self.next_note_id,
                    issued: note.id,
                });
            }
            previous = Some(note.id);
        }

        Ok(())
    }
}
