//! Note storage contracts and the SQLite implementation.
//!
//! # Responsibility
//! - Define the single storage interface shared by list and edit flows.
//! - Isolate SQL details from controller orchestration.
//!
//! # Invariants
//! - Every operation other than `open` fails with `StorageUnavailable` while
//!   the store is closed.
//! - Store APIs return semantic errors (`NotFound`, `CreateFailed`) in
//!   addition to DB transport errors.

use crate::db::DbError;
use crate::model::note::{Note, NoteId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod note_store;

pub use note_store::{SqliteNoteStore, StoreLocation};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by note store operations.
#[derive(Debug)]
pub enum StoreError {
    /// No note with this id exists.
    NotFound(NoteId),
    /// The store has not been opened, or has been closed.
    StorageUnavailable,
    /// Insertion did not yield a valid identifier.
    CreateFailed,
    /// Opened database lacks the notes table.
    MissingRequiredTable(&'static str),
    /// Opened database has a notes table with an unexpected shape.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    Db(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::StorageUnavailable => write!(f, "note store is not open"),
            Self::CreateFailed => write!(f, "note insert did not yield a valid id"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage interface for note CRUD.
///
/// Implementations are single-writer/single-reader. Callers borrow one
/// store for each operation instead of owning a handle per controller.
pub trait NoteStore {
    /// Acquires the underlying connection. No-op when already open.
    fn open(&mut self) -> StoreResult<()>;
    /// Releases the underlying connection. No-op when already closed.
    fn close(&mut self) -> StoreResult<()>;
    fn is_open(&self) -> bool;
    /// Inserts a note and returns its newly assigned id.
    fn create_note(&self, title: &str, body: &str) -> StoreResult<NoteId>;
    fn fetch_note(&self, id: NoteId) -> StoreResult<Note>;
    /// Returns all notes ordered by id ascending.
    fn fetch_all_notes(&self) -> StoreResult<Vec<Note>>;
    /// Overwrites title and body of an existing note.
    fn update_note(&self, id: NoteId, title: &str, body: &str) -> StoreResult<()>;
    fn delete_note(&self, id: NoteId) -> StoreResult<()>;
}
