//! Notes schema installation.
//!
//! Single-version policy: a fresh file (`user_version = 0`) gets
//! `0001_init.sql` and is stamped with version 1. Version 1 is left alone.
//! Anything higher came from a newer build and is rejected.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;
use std::cmp::Ordering;

const NOTES_SCHEMA_VERSION: u32 = 1;
const NOTES_SCHEMA_SQL: &str = include_str!("0001_init.sql");

/// Schema version this build writes and reads.
pub fn latest_version() -> u32 {
    NOTES_SCHEMA_VERSION
}

/// Installs the notes table on a fresh database, or checks an existing one.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;

    match found.cmp(&NOTES_SCHEMA_VERSION) {
        Ordering::Equal => Ok(()),
        Ordering::Greater => Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: NOTES_SCHEMA_VERSION,
        }),
        Ordering::Less => {
            let tx = conn.transaction()?;
            tx.execute_batch(NOTES_SCHEMA_SQL)?;
            tx.pragma_update(None, "user_version", NOTES_SCHEMA_VERSION)?;
            tx.commit()?;
            info!(
                "event=db_schema module=db status=ok action=install version={NOTES_SCHEMA_VERSION}"
            );
            Ok(())
        }
    }
}
