//! List and edit flow controllers.
//!
//! # Responsibility
//! - Model the list and edit screens as explicit state machines.
//! - Borrow the shared note store per operation; controllers never own it.
//!
//! # Invariants
//! - The only navigation state passed from list to edit is an optional
//!   `NoteId` (`EditRequest`).

use crate::model::note::NoteId;

pub mod edit;
pub mod list;

pub use edit::{
    EditError, EditSnapshot, EditState, EnterOutcome, ExitOutcome, ExitVia, NoteEditController,
};
pub use list::{ListState, NoteListController};

/// Navigation request from the list flow into the edit flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditRequest {
    /// `None` starts a new, not yet persisted note.
    pub note_id: Option<NoteId>,
}
