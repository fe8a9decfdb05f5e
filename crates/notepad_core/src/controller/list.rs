//! Note list flow.

use super::EditRequest;
use crate::model::note::{list_row, NoteId, NoteRow};
use crate::store::{NoteStore, StoreResult};
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Inactive,
    Active,
}

/// Controller for the screen listing note titles.
///
/// Every `show` rebuilds the rows from the store; there is no diffing.
#[derive(Debug)]
pub struct NoteListController {
    state: ListState,
    rows: Vec<NoteRow>,
}

impl Default for NoteListController {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteListController {
    pub fn new() -> Self {
        Self {
            state: ListState::Inactive,
            rows: Vec::new(),
        }
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    /// Rows from the last successful `show`; empty while inactive.
    pub fn rows(&self) -> &[NoteRow] {
        &self.rows
    }

    /// Activates the list and re-reads all notes.
    ///
    /// On failure the list stays inactive with no rows.
    pub fn show(&mut self, store: &impl NoteStore) -> StoreResult<&[NoteRow]> {
        self.rows.clear();
        let notes = match store.fetch_all_notes() {
            Ok(notes) => notes,
            Err(err) => {
                self.state = ListState::Inactive;
                warn!("event=list_show module=list status=error error={err}");
                return Err(err);
            }
        };

        self.rows = notes.iter().map(list_row).collect();
        self.state = ListState::Active;
        info!(
            "event=list_show module=list status=ok count={}",
            self.rows.len()
        );
        Ok(self.rows.as_slice())
    }

    pub fn hide(&mut self) {
        self.state = ListState::Inactive;
        self.rows.clear();
    }

    /// Opens the edit flow for an existing note.
    pub fn select_note(&self, id: NoteId) -> EditRequest {
        info!("event=list_select module=list status=ok note_id={id}");
        EditRequest { note_id: Some(id) }
    }

    /// Opens the edit flow for a new note.
    pub fn new_note(&self) -> EditRequest {
        info!("event=list_new module=list status=ok");
        EditRequest { note_id: None }
    }
}
