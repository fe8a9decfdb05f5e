//! Notepad configuration and editor policies.
//!
//! # Responsibility
//! - Describe where notes live and how logging is set up.
//! - Make the edit-flow policies explicit instead of implied by lifecycle.
//!
//! # Invariants
//! - Defaults reproduce the classic note-pad behavior: a missing note opens
//!   as an empty new note and every exit saves.
//! - A missing config file yields defaults; a malformed one is an error.

use crate::logging::default_log_level;
use crate::store::StoreLocation;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// What the edit flow does when asked to open a note that no longer exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingNotePolicy {
    /// Forget the id and continue editing a blank new note.
    #[default]
    ShowEmpty,
    /// Close the edit flow immediately and go back to the list.
    ReturnToList,
}

/// When leaving the edit flow through back/up writes to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavePolicy {
    /// Create or update on every exit, including blank new notes.
    #[default]
    Always,
    /// Never create a note whose title and body are both empty.
    NonEmpty,
    /// Like `NonEmpty`, and skip updates when nothing differs from the
    /// loaded note.
    Changed,
}

/// Edit-flow policy bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditPolicy {
    pub missing_note: MissingNotePolicy,
    pub save: SavePolicy,
}

/// Top-level notepad configuration, persisted as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotepadConfig {
    /// Database file. `None` keeps notes in memory only.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` disables file logs.
    pub log_dir: Option<String>,
    pub edit_policy: EditPolicy,
}

impl Default for NotepadConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
            edit_policy: EditPolicy::default(),
        }
    }
}

impl NotepadConfig {
    pub fn store_location(&self) -> StoreLocation {
        match &self.db_path {
            Some(path) => StoreLocation::File(path.clone()),
            None => StoreLocation::Memory,
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(ConfigError::Parse)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read notepad config: {err}"),
            Self::Parse(err) => write!(f, "invalid notepad config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

/// Loads configuration from a JSON file.
///
/// Returns defaults when the file does not exist.
pub fn load_config(path: impl AsRef<Path>) -> Result<NotepadConfig, ConfigError> {
    match std::fs::read_to_string(path.as_ref()) {
        Ok(text) => NotepadConfig::from_json(&text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(NotepadConfig::default()),
        Err(err) => Err(ConfigError::Io(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::{load_config, ConfigError, MissingNotePolicy, NotepadConfig, SavePolicy};
    use crate::store::StoreLocation;
    use std::path::PathBuf;

    #[test]
    fn defaults_keep_classic_behavior() {
        let config = NotepadConfig::default();
        assert_eq!(config.edit_policy.missing_note, MissingNotePolicy::ShowEmpty);
        assert_eq!(config.edit_policy.save, SavePolicy::Always);
        assert_eq!(config.store_location(), StoreLocation::Memory);
    }

    #[test]
    fn partial_json_fills_remaining_defaults() {
        let config = NotepadConfig::from_json(
            r#"{"db_path": "/tmp/notes.db", "edit_policy": {"save": "non_empty"}}"#,
        )
        .unwrap();
        assert_eq!(
            config.store_location(),
            StoreLocation::File(PathBuf::from("/tmp/notes.db"))
        );
        assert_eq!(config.edit_policy.save, SavePolicy::NonEmpty);
        assert_eq!(config.edit_policy.missing_note, MissingNotePolicy::ShowEmpty);
    }

    #[test]
    fn unknown_policy_value_is_a_parse_error() {
        let err = NotepadConfig::from_json(r#"{"edit_policy": {"save": "sometimes"}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, NotepadConfig::default());
    }

    #[test]
    fn config_file_is_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notepad.json");
        std::fs::write(&path, r#"{"edit_policy": {"missing_note": "return_to_list"}}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(
            config.edit_policy.missing_note,
            MissingNotePolicy::ReturnToList
        );
    }
}
