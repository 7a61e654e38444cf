//! Store-state repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist whole-store snapshots and load them back.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate every bucket before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `save_state` replaces the persisted snapshot in a single transaction;
//!   the in-memory store stays the authority between snapshots.

use crate::db::DbError;
use crate::model::bucket::{BucketValidationError, DateBucket, Note, OnThisDayFact};
use rusqlite::{params, Connection, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for snapshot persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Validation(BucketValidationError),
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted planner data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; run migrations first")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<BucketValidationError> for RepoError {
    fn from(value: BucketValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for store-state snapshots.
pub trait StateRepository {
    /// Replaces the persisted snapshot with the given one.
    fn save_state(&mut self, snapshot: &[(String, DateBucket)]) -> RepoResult<()>;
    /// Loads all persisted buckets, date-sorted.
    fn load_state(&self) -> RepoResult<Vec<(String, DateBucket)>>;
}

/// SQLite-backed snapshot repository.
#[derive(Debug)]
pub struct SqliteStateRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteStateRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        for table in ["buckets", "notes"] {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }
}

impl StateRepository for SqliteStateRepository<'_> {
    fn save_state(&mut self, snapshot: &[(String, DateBucket)]) -> RepoResult<()> {
        for (_, bucket) in snapshot {
            bucket.validate()?;
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Full rewrite: the snapshot is the whole truth, and note rows
        // reference bucket rows, so notes go first on delete.
        tx.execute("DELETE FROM notes;", [])?;
        tx.execute("DELETE FROM buckets;", [])?;

        for (date, bucket) in snapshot {
            let (fact_title, fact_year, fact_wiki_link) = match &bucket.fact {
                Some(fact) => (
                    Some(fact.title.as_str()),
                    Some(fact.year),
                    Some(fact.wiki_link.as_str()),
                ),
                None => (None, None, None),
            };

            tx.execute(
                "INSERT INTO buckets (
                    date,
                    next_note_id,
                    fact_title,
                    fact_year,
                    fact_wiki_link
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    date.as_str(),
                    bucket.next_note_id,
                    fact_title,
                    fact_year,
                    fact_wiki_link,
                ],
            )?;

            for note in &bucket.notes {
                tx.execute(
                    "INSERT INTO notes (date, id, content, is_complete)
                     VALUES (?1, ?2, ?3, ?4);",
                    params![
                        date.as_str(),
                        note.id,
                        note.content.as_str(),
                        bool_to_int(note.is_complete),
                    ],
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn load_state(&self) -> RepoResult<Vec<(String, DateBucket)>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                date,
                next_note_id,
                fact_title,
                fact_year,
                fact_wiki_link
             FROM buckets
             ORDER BY date ASC;",
        )?;

        let mut rows = stmt.query([])?;
        let mut buckets = Vec::new();
        while let Some(row) = rows.next()? {
            let date: String = row.get("date")?;
            let next_note_id: u64 = row.get("next_note_id")?;
            let fact = parse_fact_columns(
                &date,
                row.get("fact_title")?,
                row.get("fact_year")?,
                row.get("fact_wiki_link")?,
            )?;
            let notes = load_notes_for_date(self.conn, &date)?;

            let bucket = DateBucket {
                notes,
                fact,
                next_note_id,
            };
            bucket.validate()?;
            buckets.push((date, bucket));
        }

        Ok(buckets)
    }
}

fn load_notes_for_date(conn: &Connection, date: &str) -> RepoResult<Vec<Note>> {
    let mut stmt = conn.prepare(
        "SELECT id, content, is_complete
         FROM notes
         WHERE date = ?1
         ORDER BY id ASC;",
    )?;

    let mut rows = stmt.query([date])?;
    let mut notes = Vec::new();
    while let Some(row) = rows.next()? {
        let is_complete = match row.get::<_, i64>("is_complete")? {
            0 => false,
            1 => true,
            other => {
                return Err(RepoError::InvalidData(format!(
                    "invalid is_complete value `{other}` in notes for date `{date}`"
                )));
            }
        };
        notes.push(Note {
            id: row.get("id")?,
            content: row.get("content")?,
            is_complete,
        });
    }

    Ok(notes)
}

fn parse_fact_columns(
    date: &str,
    title: Option<String>,
    year: Option<i64>,
    wiki_link: Option<String>,
) -> RepoResult<Option<OnThisDayFact>> {
    match (title, year, wiki_link) {
        (Some(title), Some(year), Some(wiki_link)) => Ok(Some(OnThisDayFact {
            title,
            year,
            wiki_link,
        })),
        (None, None, None) => Ok(None),
        _ => Err(RepoError::InvalidData(format!(
            "fact columns for date `{date}` are partially set; expected all or none"
        ))),
    }
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
