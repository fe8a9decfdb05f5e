//! SQLite-backed note store.
//!
//! # Invariants
//! - All queries target the single `notes` table created by migration 1.
//! - Dropping the store releases its connection.

use super::{NoteStore, StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use crate::model::note::{Note, NoteId};
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;

const NOTE_SELECT_SQL: &str = "SELECT id, title, body FROM notes";

/// Where the store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Database file; created on first open.
    File(PathBuf),
    /// Private in-memory database; contents are lost on close.
    Memory,
}

impl StoreLocation {
    fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

/// Note store over one lazily opened SQLite connection.
pub struct SqliteNoteStore {
    location: StoreLocation,
    conn: Option<Connection>,
}

impl SqliteNoteStore {
    /// Creates a closed store for `location`. Call [`NoteStore::open`] before use.
    pub fn new(location: StoreLocation) -> Self {
        Self {
            location,
            conn: None,
        }
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    fn connection(&self) -> StoreResult<&Connection> {
        self.conn.as_ref().ok_or(StoreError::StorageUnavailable)
    }
}

impl NoteStore for SqliteNoteStore {
    fn open(&mut self) -> StoreResult<()> {
        if self.conn.is_some() {
            return Ok(());
        }

        let conn = match &self.location {
            StoreLocation::File(path) => open_db(path)?,
            StoreLocation::Memory => open_db_in_memory()?,
        };
        ensure_notes_table_ready(&conn)?;
        self.conn = Some(conn);
        info!(
            "event=store_open module=store status=ok mode={}",
            self.location.mode()
        );
        Ok(())
    }

    fn close(&mut self) -> StoreResult<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        match conn.close() {
            Ok(()) => {
                info!(
                    "event=store_close module=store status=ok mode={}",
                    self.location.mode()
                );
                Ok(())
            }
            // The returned connection is dropped here, which still releases it.
            Err((_conn, err)) => {
                warn!(
                    "event=store_close module=store status=error mode={} error={}",
                    self.location.mode(),
                    err
                );
                Err(err.into())
            }
        }
    }

    fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    fn create_note(&self, title: &str, body: &str) -> StoreResult<NoteId> {
        let conn = self.connection()?;
        let changed = conn.execute(
            "INSERT INTO notes (title, body) VALUES (?1, ?2);",
            params![title, body],
        )?;
        if changed == 0 {
            return Err(StoreError::CreateFailed);
        }

        let id = conn.last_insert_rowid();
        if id <= 0 {
            return Err(StoreError::CreateFailed);
        }
        Ok(id)
    }

    fn fetch_note(&self, id: NoteId) -> StoreResult<Note> {
        let conn = self.connection()?;
        conn.query_row(
            &format!("{NOTE_SELECT_SQL} WHERE id = ?1;"),
            [id],
            parse_note_row,
        )
        .optional()?
        .ok_or(StoreError::NotFound(id))
    }

    fn fetch_all_notes(&self) -> StoreResult<Vec<Note>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&format!("{NOTE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn update_note(&self, id: NoteId, title: &str, body: &str) -> StoreResult<()> {
        let changed = self.connection()?.execute(
            "UPDATE notes SET title = ?2, body = ?3 WHERE id = ?1;",
            params![id, title, body],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> StoreResult<()> {
        let changed = self
            .connection()?
            .execute("DELETE FROM notes WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_note_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        body: row.get("body")?,
    })
}

fn ensure_notes_table_ready(conn: &Connection) -> StoreResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(StoreError::MissingRequiredTable("notes"));
    }

    for column in ["id", "title", "body"] {
        if !table_has_column(conn, "notes", column)? {
            return Err(StoreError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
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

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
