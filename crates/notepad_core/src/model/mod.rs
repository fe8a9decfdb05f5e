//! Domain model for notes and their presentation projections.
//!
//! # Invariants
//! - A persisted note is identified by a store-assigned `NoteId` that never
//!   changes.
//! - A note without an id exists only as editor fields.

pub mod note;
