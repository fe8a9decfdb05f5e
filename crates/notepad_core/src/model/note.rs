//! Note domain model and pure presentation mappings.
//!
//! # Responsibility
//! - Define the persisted `Note` record and the transient `NoteFields` shape.
//! - Map a note to what list and edit screens render, without touching
//!   storage.

use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a persisted note.
///
/// Valid ids are always positive; SQLite rowids start at 1.
pub type NoteId = i64;

/// A persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub body: String,
}

/// Editable title/body pair, with or without a backing record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFields {
    pub title: String,
    pub body: String,
}

impl NoteFields {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Returns whether both title and body are empty strings.
    ///
    /// Whitespace counts as content.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.body.is_empty()
    }
}

/// One row of the note list screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRow {
    pub id: NoteId,
    pub title: String,
}

/// Maps a note to the row rendered by the list screen.
pub fn list_row(note: &Note) -> NoteRow {
    NoteRow {
        id: note.id,
        title: note.title.clone(),
    }
}

/// Maps a note to the editable fields shown by the edit screen.
pub fn edit_fields(note: &Note) -> NoteFields {
    NoteFields::new(note.title.as_str(), note.body.as_str())
}

#[cfg(test)]
mod tests {
    use super::{edit_fields, list_row, Note, NoteFields};

    fn sample() -> Note {
        Note {
            id: 7,
            title: "Groceries".to_string(),
            body: "Milk,Eggs".to_string(),
        }
    }

    #[test]
    fn list_row_keeps_id_and_title_only() {
        let row = list_row(&sample());
        assert_eq!(row.id, 7);
        assert_eq!(row.title, "Groceries");
    }

    #[test]
    fn edit_fields_copies_title_and_body() {
        let fields = edit_fields(&sample());
        assert_eq!(fields, NoteFields::new("Groceries", "Milk,Eggs"));
    }

    #[test]
    fn fields_with_whitespace_are_not_empty() {
        assert!(NoteFields::default().is_empty());
        assert!(!NoteFields::new(" ", "").is_empty());
        assert!(!NoteFields::new("", "body").is_empty());
    }
}
