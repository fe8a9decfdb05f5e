//! Core of a minimal notepad: one SQLite notes table, a list flow and an
//! edit flow.
//! Host UIs drive the explicit state machines here and render the plain
//! row/field projections they return.

pub mod config;
pub mod controller;
pub mod db;
pub mod logging;
pub mod model;
pub mod session;
pub mod store;

pub use config::{load_config, ConfigError, EditPolicy, MissingNotePolicy, NotepadConfig, SavePolicy};
pub use controller::{
    EditError, EditRequest, EditSnapshot, EditState, EnterOutcome, ExitOutcome, ExitVia,
    ListState, NoteEditController, NoteListController,
};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::note::{edit_fields, list_row, Note, NoteFields, NoteId, NoteRow};
pub use session::{NotepadSession, Screen, SessionError, SessionResult};
pub use store::{NoteStore, SqliteNoteStore, StoreError, StoreLocation, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
