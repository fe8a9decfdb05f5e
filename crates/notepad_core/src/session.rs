//! Host-facing navigator between the list and edit flows.
//!
//! # Responsibility
//! - Own the single injected note store and lend it to each controller call.
//! - Sequence `List -> Edit -> List`, re-reading notes on every return.
//!
//! # Invariants
//! - Exactly one screen is active; an edit controller exists only on `Edit`.
//! - The store is opened by `start` and released by `shutdown` or drop.

use crate::config::EditPolicy;
use crate::controller::{
    EditError, EditRequest, EditSnapshot, EnterOutcome, ExitOutcome, ExitVia, NoteEditController,
    NoteListController,
};
use crate::model::note::{NoteFields, NoteId, NoteRow};
use crate::store::{NoteStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,
    Edit,
}

#[derive(Debug)]
pub enum SessionError {
    /// Operation requires a different screen to be active.
    WrongScreen {
        expected: Screen,
        operation: &'static str,
    },
    Edit(EditError),
    Store(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongScreen {
                expected,
                operation,
            } => write!(f, "cannot {operation} outside the {expected:?} screen"),
            Self::Edit(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Edit(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::WrongScreen { .. } => None,
        }
    }
}

impl From<EditError> for SessionError {
    fn from(value: EditError) -> Self {
        Self::Edit(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Notepad navigation over one shared store.
pub struct NotepadSession<S: NoteStore> {
    store: S,
    policy: EditPolicy,
    list: NoteListController,
    edit: Option<NoteEditController>,
}

impl<S: NoteStore> NotepadSession<S> {
    pub fn new(store: S, policy: EditPolicy) -> Self {
        Self {
            store,
            policy,
            list: NoteListController::new(),
            edit: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn screen(&self) -> Screen {
        if self.edit.is_some() {
            Screen::Edit
        } else {
            Screen::List
        }
    }

    /// Rows of the list screen; empty while editing.
    pub fn rows(&self) -> &[NoteRow] {
        self.list.rows()
    }

    /// Current edit fields, when on the edit screen.
    pub fn edit_fields(&self) -> Option<&NoteFields> {
        self.edit.as_ref().map(NoteEditController::fields)
    }

    pub fn edit_note_id(&self) -> Option<NoteId> {
        self.edit.as_ref().and_then(NoteEditController::note_id)
    }

    /// Opens the store and shows the list.
    ///
    /// Refused while a note is being edited; leave the edit screen first.
    pub fn start(&mut self) -> SessionResult<&[NoteRow]> {
        self.require(Screen::List, "start")?;
        self.store.open()?;
        info!("event=session_start module=session status=ok");
        Ok(self.list.show(&self.store)?)
    }

    /// Opens an existing note from the list.
    pub fn open_note(&mut self, id: NoteId) -> SessionResult<EnterOutcome> {
        self.require(Screen::List, "open note")?;
        let request = self.list.select_note(id);
        self.enter_edit(request)
    }

    /// Starts a new note from the list.
    pub fn new_note(&mut self) -> SessionResult<EnterOutcome> {
        self.require(Screen::List, "create note")?;
        let request = self.list.new_note();
        self.enter_edit(request)
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> SessionResult<()> {
        Ok(self.editor("set title")?.set_title(title)?)
    }

    pub fn set_body(&mut self, body: impl Into<String>) -> SessionResult<()> {
        Ok(self.editor("set body")?.set_body(body)?)
    }

    /// Back navigation: save and return to the list.
    pub fn back(&mut self) -> SessionResult<ExitOutcome> {
        self.leave_edit(ExitVia::Back)
    }

    /// Up navigation: save and return to the list.
    pub fn up(&mut self) -> SessionResult<ExitOutcome> {
        self.leave_edit(ExitVia::Up)
    }

    /// Deletes the edited note and returns to the list.
    pub fn delete(&mut self) -> SessionResult<ExitOutcome> {
        let edit = self.edit.as_mut().ok_or(SessionError::WrongScreen {
            expected: Screen::Edit,
            operation: "delete",
        })?;
        let outcome = edit.delete_and_exit(&self.store)?;
        self.return_to_list()?;
        Ok(outcome)
    }

    pub fn suspend(&self) -> SessionResult<EditSnapshot> {
        let edit = self.edit.as_ref().ok_or(SessionError::WrongScreen {
            expected: Screen::Edit,
            operation: "suspend",
        })?;
        Ok(edit.suspend()?)
    }

    /// Restores a suspended edit, switching to the edit screen if needed.
    pub fn resume(&mut self, snapshot: EditSnapshot) -> SessionResult<()> {
        match self.edit.as_mut() {
            Some(edit) => edit.resume(snapshot)?,
            None => {
                let mut edit = NoteEditController::new(self.policy);
                edit.resume(snapshot)?;
                self.list.hide();
                self.edit = Some(edit);
            }
        }
        Ok(())
    }

    /// Drops any open edit without saving and closes the store.
    pub fn shutdown(&mut self) -> SessionResult<()> {
        self.edit = None;
        self.list.hide();
        self.store.close()?;
        info!("event=session_shutdown module=session status=ok");
        Ok(())
    }

    fn enter_edit(&mut self, request: EditRequest) -> SessionResult<EnterOutcome> {
        let mut edit = NoteEditController::new(self.policy);
        let outcome = edit.enter(&self.store, request.note_id)?;
        match outcome {
            EnterOutcome::Ready => {
                self.list.hide();
                self.edit = Some(edit);
            }
            EnterOutcome::ReturnToList => {
                self.list.show(&self.store)?;
            }
        }
        Ok(outcome)
    }

    fn leave_edit(&mut self, via: ExitVia) -> SessionResult<ExitOutcome> {
        let edit = self.edit.as_mut().ok_or(SessionError::WrongScreen {
            expected: Screen::Edit,
            operation: "save",
        })?;
        let outcome = edit.save_and_exit(&self.store, via)?;
        self.return_to_list()?;
        Ok(outcome)
    }

    fn return_to_list(&mut self) -> SessionResult<()> {
        self.edit = None;
        self.list.show(&self.store)?;
        Ok(())
    }

    fn editor(&mut self, operation: &'static str) -> SessionResult<&mut NoteEditController> {
        self.edit.as_mut().ok_or(SessionError::WrongScreen {
            expected: Screen::Edit,
            operation,
        })
    }

    fn require(&self, expected: Screen, operation: &'static str) -> SessionResult<()> {
        if self.screen() == expected {
            Ok(())
        } else {
            Err(SessionError::WrongScreen {
                expected,
                operation,
            })
        }
    }
}
