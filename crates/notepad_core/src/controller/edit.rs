//! Note edit flow.
//!
//! # Responsibility
//! - Load one note into editable fields, or start a blank one.
//! - Persist or remove the note when the flow is left.
//! - Snapshot and restore in-progress edits across suspension.
//!
//! # Invariants
//! - Transitions: `Uninitialized -> Loaded -> Editing -> Closed`; `Loaded`
//!   may close directly. Nothing leaves `Closed`.
//! - An id, once assigned by the store, is never replaced while its note
//!   exists. A save that finds the note gone follows `MissingNotePolicy`.
//! - Delete supersedes save: a deleted note is never written back.
//! - A failed store write leaves the controller open so the host can retry.

use crate::config::{EditPolicy, MissingNotePolicy, SavePolicy};
use crate::model::note::{edit_fields, NoteFields, NoteId};
use crate::store::{NoteStore, StoreError};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    /// Created but not entered yet.
    Uninitialized,
    /// Fields populated from the store (or blank for a new note).
    Loaded,
    /// At least one field was changed or restored from a snapshot.
    Editing,
    /// Flow left; no further operations accepted.
    Closed,
}

impl EditState {
    fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Loaded => "loaded",
            Self::Editing => "editing",
            Self::Closed => "closed",
        }
    }

    fn is_open(self) -> bool {
        matches!(self, Self::Loaded | Self::Editing)
    }
}

impl Display for EditState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the user left the edit screen through the saving path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitVia {
    Back,
    Up,
}

impl ExitVia {
    fn as_str(self) -> &'static str {
        match self {
            Self::Back => "back",
            Self::Up => "up",
        }
    }
}

/// Result of entering the edit flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterOutcome {
    /// Fields are ready for editing.
    Ready,
    /// The requested note is gone and policy asked to return to the list.
    ReturnToList,
}

/// What leaving the edit flow did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Created(NoteId),
    Updated(NoteId),
    /// Existing note left untouched because nothing changed.
    Unchanged(NoteId),
    /// Blank new note not created.
    Skipped,
    Deleted(NoteId),
    /// Note vanished before the save and policy dropped the edits.
    Missing(NoteId),
    /// Delete requested with nothing persisted to remove.
    Discarded,
}

#[derive(Debug)]
pub enum EditError {
    InvalidTransition {
        state: EditState,
        operation: &'static str,
    },
    Store(StoreError),
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTransition { state, operation } => {
                write!(f, "cannot {operation} while edit flow is {state}")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::InvalidTransition { .. } => None,
        }
    }
}

impl From<StoreError> for EditError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// In-progress edit state captured on suspension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSnapshot {
    pub note_id: Option<NoteId>,
    pub title: String,
    pub body: String,
    /// Fields as last loaded or saved; drives `SavePolicy::Changed`.
    #[serde(default)]
    pub baseline: Option<NoteFields>,
}

/// Controller for creating, updating or deleting one note.
#[derive(Debug)]
pub struct NoteEditController {
    policy: EditPolicy,
    state: EditState,
    note_id: Option<NoteId>,
    fields: NoteFields,
    baseline: Option<NoteFields>,
}

impl NoteEditController {
    pub fn new(policy: EditPolicy) -> Self {
        Self {
            policy,
            state: EditState::Uninitialized,
            note_id: None,
            fields: NoteFields::default(),
            baseline: None,
        }
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn policy(&self) -> EditPolicy {
        self.policy
    }

    pub fn note_id(&self) -> Option<NoteId> {
        self.note_id
    }

    pub fn fields(&self) -> &NoteFields {
        &self.fields
    }

    /// Enters the flow, loading `note_id` when given.
    ///
    /// A missing note is handled by `MissingNotePolicy`; any other store
    /// failure is returned and the controller stays uninitialized.
    pub fn enter(
        &mut self,
        store: &impl NoteStore,
        note_id: Option<NoteId>,
    ) -> Result<EnterOutcome, EditError> {
        self.require(self.state == EditState::Uninitialized, "enter")?;

        let Some(id) = note_id else {
            self.state = EditState::Loaded;
            info!("event=edit_enter module=edit status=ok mode=new");
            return Ok(EnterOutcome::Ready);
        };

        match store.fetch_note(id) {
            Ok(note) => {
                let fields = edit_fields(&note);
                self.note_id = Some(note.id);
                self.baseline = Some(fields.clone());
                self.fields = fields;
                self.state = EditState::Loaded;
                info!("event=edit_enter module=edit status=ok mode=existing note_id={id}");
                Ok(EnterOutcome::Ready)
            }
            Err(StoreError::NotFound(_)) => match self.policy.missing_note {
                MissingNotePolicy::ShowEmpty => {
                    self.state = EditState::Loaded;
                    warn!(
                        "event=edit_enter module=edit status=missing note_id={id} policy=show_empty"
                    );
                    Ok(EnterOutcome::Ready)
                }
                MissingNotePolicy::ReturnToList => {
                    self.state = EditState::Closed;
                    warn!(
                        "event=edit_enter module=edit status=missing note_id={id} policy=return_to_list"
                    );
                    Ok(EnterOutcome::ReturnToList)
                }
            },
            Err(err) => {
                warn!("event=edit_enter module=edit status=error note_id={id} error={err}");
                Err(err.into())
            }
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), EditError> {
        self.require(self.state.is_open(), "set title")?;
        self.fields.title = title.into();
        self.state = EditState::Editing;
        Ok(())
    }

    pub fn set_body(&mut self, body: impl Into<String>) -> Result<(), EditError> {
        self.require(self.state.is_open(), "set body")?;
        self.fields.body = body.into();
        self.state = EditState::Editing;
        Ok(())
    }

    /// Leaves the flow through back/up navigation, saving per `SavePolicy`.
    pub fn save_and_exit(
        &mut self,
        store: &impl NoteStore,
        via: ExitVia,
    ) -> Result<ExitOutcome, EditError> {
        self.require(self.state.is_open(), "save")?;

        let note_id = self.note_id;
        let outcome = match note_id {
            None if self.policy.save != SavePolicy::Always && self.fields.is_empty() => {
                ExitOutcome::Skipped
            }
            None => {
                let id = store.create_note(&self.fields.title, &self.fields.body)?;
                self.note_id = Some(id);
                self.baseline = Some(self.fields.clone());
                ExitOutcome::Created(id)
            }
            Some(id)
                if self.policy.save == SavePolicy::Changed
                    && self.baseline.as_ref() == Some(&self.fields) =>
            {
                ExitOutcome::Unchanged(id)
            }
            Some(id) => match store.update_note(id, &self.fields.title, &self.fields.body) {
                Ok(()) => {
                    self.baseline = Some(self.fields.clone());
                    ExitOutcome::Updated(id)
                }
                Err(StoreError::NotFound(_)) => self.save_over_missing(store, id)?,
                Err(err) => return Err(err.into()),
            },
        };

        self.state = EditState::Closed;
        info!(
            "event=edit_exit module=edit status=ok via={} outcome={:?}",
            via.as_str(),
            outcome
        );
        Ok(outcome)
    }

    /// Handles a save whose note was removed behind the flow's back.
    ///
    /// `ShowEmpty` keeps the typed fields as a new note; `ReturnToList`
    /// drops them and reports the loss.
    fn save_over_missing(
        &mut self,
        store: &impl NoteStore,
        missing_id: NoteId,
    ) -> Result<ExitOutcome, EditError> {
        match self.policy.missing_note {
            MissingNotePolicy::ShowEmpty => {
                let id = store.create_note(&self.fields.title, &self.fields.body)?;
                warn!(
                    "event=edit_save module=edit status=missing note_id={missing_id} policy=show_empty new_note_id={id}"
                );
                self.note_id = Some(id);
                self.baseline = Some(self.fields.clone());
                Ok(ExitOutcome::Created(id))
            }
            MissingNotePolicy::ReturnToList => {
                warn!(
                    "event=edit_save module=edit status=missing note_id={missing_id} policy=return_to_list"
                );
                self.note_id = None;
                Ok(ExitOutcome::Missing(missing_id))
            }
        }
    }

    /// Deletes the current note, if persisted, and leaves without saving.
    ///
    /// A note that is already gone is treated as deleted elsewhere.
    pub fn delete_and_exit(&mut self, store: &impl NoteStore) -> Result<ExitOutcome, EditError> {
        self.require(self.state.is_open(), "delete")?;

        let outcome = match self.note_id {
            None => ExitOutcome::Discarded,
            Some(id) => match store.delete_note(id) {
                Ok(()) => ExitOutcome::Deleted(id),
                Err(StoreError::NotFound(_)) => {
                    warn!("event=edit_delete module=edit status=missing note_id={id}");
                    ExitOutcome::Discarded
                }
                Err(err) => return Err(err.into()),
            },
        };

        self.state = EditState::Closed;
        info!("event=edit_exit module=edit status=ok via=delete outcome={outcome:?}");
        Ok(outcome)
    }

    /// Captures id and fields for later `resume`.
    pub fn suspend(&self) -> Result<EditSnapshot, EditError> {
        self.require(self.state.is_open(), "suspend")?;
        Ok(EditSnapshot {
            note_id: self.note_id,
            title: self.fields.title.clone(),
            body: self.fields.body.clone(),
            baseline: self.baseline.clone(),
        })
    }

    /// Restores a snapshot verbatim, on this or a freshly created controller.
    pub fn resume(&mut self, snapshot: EditSnapshot) -> Result<(), EditError> {
        self.require(self.state != EditState::Closed, "resume")?;
        self.note_id = snapshot.note_id;
        self.fields = NoteFields::new(snapshot.title, snapshot.body);
        self.baseline = snapshot.baseline;
        self.state = EditState::Editing;
        info!("event=edit_resume module=edit status=ok has_id={}", self.note_id.is_some());
        Ok(())
    }

    fn require(&self, allowed: bool, operation: &'static str) -> Result<(), EditError> {
        if allowed {
            Ok(())
        } else {
            Err(EditError::InvalidTransition {
                state: self.state,
                operation,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EditError, EditState, EnterOutcome, ExitOutcome, ExitVia, NoteEditController};
    use crate::config::{EditPolicy, MissingNotePolicy, SavePolicy};
    use crate::store::{NoteStore, SqliteNoteStore, StoreLocation};

    fn open_store() -> SqliteNoteStore {
        let mut store = SqliteNoteStore::new(StoreLocation::Memory);
        store.open().unwrap();
        store
    }

    fn policy(missing_note: MissingNotePolicy, save: SavePolicy) -> EditPolicy {
        EditPolicy { missing_note, save }
    }

    #[test]
    fn editing_before_enter_is_rejected() {
        let mut edit = NoteEditController::new(EditPolicy::default());
        let err = edit.set_title("x").unwrap_err();
        assert!(matches!(
            err,
            EditError::InvalidTransition {
                state: EditState::Uninitialized,
                ..
            }
        ));
    }

    #[test]
    fn closed_controller_rejects_everything() {
        let store = open_store();
        let mut edit = NoteEditController::new(EditPolicy::default());
        edit.enter(&store, None).unwrap();
        edit.save_and_exit(&store, ExitVia::Back).unwrap();

        assert!(edit.set_body("late").is_err());
        assert!(edit.save_and_exit(&store, ExitVia::Up).is_err());
        assert!(edit.delete_and_exit(&store).is_err());
        assert!(edit.suspend().is_err());
        assert!(edit.enter(&store, None).is_err());
    }

    #[test]
    fn enter_existing_populates_fields() {
        let store = open_store();
        let id = store.create_note("Groceries", "Milk,Eggs").unwrap();

        let mut edit = NoteEditController::new(EditPolicy::default());
        assert_eq!(edit.enter(&store, Some(id)).unwrap(), EnterOutcome::Ready);
        assert_eq!(edit.state(), EditState::Loaded);
        assert_eq!(edit.note_id(), Some(id));
        assert_eq!(edit.fields().title, "Groceries");
        assert_eq!(edit.fields().body, "Milk,Eggs");
    }

    #[test]
    fn missing_note_show_empty_continues_as_new_note() {
        let store = open_store();
        let mut edit = NoteEditController::new(EditPolicy::default());
        assert_eq!(edit.enter(&store, Some(42)).unwrap(), EnterOutcome::Ready);
        assert_eq!(edit.note_id(), None);
        assert!(edit.fields().is_empty());

        edit.set_title("fresh").unwrap();
        let outcome = edit.save_and_exit(&store, ExitVia::Back).unwrap();
        assert!(matches!(outcome, ExitOutcome::Created(id) if id != 42));
    }

    #[test]
    fn missing_note_return_to_list_closes_immediately() {
        let store = open_store();
        let mut edit = NoteEditController::new(policy(
            MissingNotePolicy::ReturnToList,
            SavePolicy::Always,
        ));
        assert_eq!(
            edit.enter(&store, Some(42)).unwrap(),
            EnterOutcome::ReturnToList
        );
        assert_eq!(edit.state(), EditState::Closed);
        assert!(store.fetch_all_notes().unwrap().is_empty());
    }

    #[test]
    fn always_policy_creates_blank_note() {
        let store = open_store();
        let mut edit = NoteEditController::new(EditPolicy::default());
        edit.enter(&store, None).unwrap();

        let outcome = edit.save_and_exit(&store, ExitVia::Back).unwrap();
        let ExitOutcome::Created(id) = outcome else {
            panic!("unexpected outcome: {outcome:?}");
        };
        let note = store.fetch_note(id).unwrap();
        assert_eq!(note.title, "");
        assert_eq!(note.body, "");
    }

    #[test]
    fn non_empty_policy_skips_blank_note() {
        let store = open_store();
        let mut edit =
            NoteEditController::new(policy(MissingNotePolicy::ShowEmpty, SavePolicy::NonEmpty));
        edit.enter(&store, None).unwrap();

        assert_eq!(
            edit.save_and_exit(&store, ExitVia::Up).unwrap(),
            ExitOutcome::Skipped
        );
        assert!(store.fetch_all_notes().unwrap().is_empty());
    }

    #[test]
    fn changed_policy_skips_untouched_existing_note() {
        let store = open_store();
        let id = store.create_note("t", "b").unwrap();
        let mut edit =
            NoteEditController::new(policy(MissingNotePolicy::ShowEmpty, SavePolicy::Changed));
        edit.enter(&store, Some(id)).unwrap();
        edit.set_title("t").unwrap();

        assert_eq!(
            edit.save_and_exit(&store, ExitVia::Back).unwrap(),
            ExitOutcome::Unchanged(id)
        );
    }

    #[test]
    fn changed_policy_writes_modified_note() {
        let store = open_store();
        let id = store.create_note("t", "b").unwrap();
        let mut edit =
            NoteEditController::new(policy(MissingNotePolicy::ShowEmpty, SavePolicy::Changed));
        edit.enter(&store, Some(id)).unwrap();
        edit.set_body("b2").unwrap();

        assert_eq!(
            edit.save_and_exit(&store, ExitVia::Back).unwrap(),
            ExitOutcome::Updated(id)
        );
        assert_eq!(store.fetch_note(id).unwrap().body, "b2");
    }

    #[test]
    fn always_policy_rewrites_unchanged_note() {
        let store = open_store();
        let id = store.create_note("t", "b").unwrap();
        let mut edit = NoteEditController::new(EditPolicy::default());
        edit.enter(&store, Some(id)).unwrap();

        assert_eq!(
            edit.save_and_exit(&store, ExitVia::Up).unwrap(),
            ExitOutcome::Updated(id)
        );
    }

    #[test]
    fn delete_supersedes_pending_edits() {
        let store = open_store();
        let id = store.create_note("t", "b").unwrap();
        let mut edit = NoteEditController::new(EditPolicy::default());
        edit.enter(&store, Some(id)).unwrap();
        edit.set_title("never saved").unwrap();

        assert_eq!(
            edit.delete_and_exit(&store).unwrap(),
            ExitOutcome::Deleted(id)
        );
        assert!(store.fetch_all_notes().unwrap().is_empty());
    }

    #[test]
    fn delete_of_new_note_discards() {
        let store = open_store();
        let mut edit = NoteEditController::new(EditPolicy::default());
        edit.enter(&store, None).unwrap();
        edit.set_title("draft").unwrap();

        assert_eq!(edit.delete_and_exit(&store).unwrap(), ExitOutcome::Discarded);
        assert!(store.fetch_all_notes().unwrap().is_empty());
    }

    #[test]
    fn delete_of_already_removed_note_discards() {
        let store = open_store();
        let id = store.create_note("t", "b").unwrap();
        let mut edit = NoteEditController::new(EditPolicy::default());
        edit.enter(&store, Some(id)).unwrap();
        store.delete_note(id).unwrap();

        assert_eq!(edit.delete_and_exit(&store).unwrap(), ExitOutcome::Discarded);
        assert_eq!(edit.state(), EditState::Closed);
    }

    #[test]
    fn failed_save_keeps_flow_open() {
        let mut store = open_store();
        let mut edit = NoteEditController::new(EditPolicy::default());
        edit.enter(&store, None).unwrap();
        edit.set_title("draft").unwrap();
        store.close().unwrap();

        assert!(edit.save_and_exit(&store, ExitVia::Back).is_err());
        assert_eq!(edit.state(), EditState::Editing);
        assert_eq!(edit.note_id(), None);
    }

    #[test]
    fn save_after_note_vanished_recreates_it_under_show_empty() {
        let store = open_store();
        let id = store.create_note("t", "b").unwrap();
        let mut edit = NoteEditController::new(EditPolicy::default());
        edit.enter(&store, Some(id)).unwrap();
        edit.set_body("unsaved work").unwrap();
        store.delete_note(id).unwrap();

        let outcome = edit.save_and_exit(&store, ExitVia::Back).unwrap();
        let ExitOutcome::Created(new_id) = outcome else {
            panic!("unexpected outcome: {outcome:?}");
        };
        assert_ne!(new_id, id);
        assert_eq!(edit.note_id(), Some(new_id));
        assert_eq!(store.fetch_note(new_id).unwrap().body, "unsaved work");
    }

    #[test]
    fn save_after_note_vanished_closes_under_return_to_list() {
        let store = open_store();
        let id = store.create_note("t", "b").unwrap();
        let mut edit = NoteEditController::new(policy(
            MissingNotePolicy::ReturnToList,
            SavePolicy::Always,
        ));
        edit.enter(&store, Some(id)).unwrap();
        store.delete_note(id).unwrap();

        assert_eq!(
            edit.save_and_exit(&store, ExitVia::Up).unwrap(),
            ExitOutcome::Missing(id)
        );
        assert_eq!(edit.state(), EditState::Closed);
        assert!(store.fetch_all_notes().unwrap().is_empty());
    }

    #[test]
    fn suspend_and_resume_restore_fields_verbatim() {
        let store = open_store();
        let id = store.create_note("t", "b").unwrap();
        let mut edit = NoteEditController::new(EditPolicy::default());
        edit.enter(&store, Some(id)).unwrap();
        edit.set_title("half typed ").unwrap();
        edit.set_body("line1\nline2").unwrap();
        let snapshot = edit.suspend().unwrap();

        let mut restored = NoteEditController::new(EditPolicy::default());
        restored.resume(snapshot.clone()).unwrap();
        assert_eq!(restored.state(), EditState::Editing);
        assert_eq!(restored.note_id(), Some(id));
        assert_eq!(restored.fields().title, "half typed ");
        assert_eq!(restored.fields().body, "line1\nline2");
        assert_eq!(restored.suspend().unwrap(), snapshot);
    }
}
