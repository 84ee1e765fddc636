//! `blog_posts` schema setup.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`; 0 means a fresh file.
//! - Table creation and the version bump commit together.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Schema version written by this binary.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates the `blog_posts` table on a fresh database.
///
/// A database already at `SCHEMA_VERSION` is left untouched; one written by a
/// newer binary is refused.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(DbError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    if found == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;

    info!("event=db_schema module=db status=created version={SCHEMA_VERSION}");
    Ok(())
}

/// Reads the version recorded in `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
