//! Connection setup for the bill database.
//!
//! The `vbill` till and the HTTP server may open the same database file at
//! once, so every connection runs in WAL mode and waits on a busy writer
//! instead of failing. The schema lives in `migrations/` and is applied with
//! `rusqlite_migration`, which tracks progress in `user_version`.

use std::time::Duration;

use rusqlite::Connection;
use rusqlite_migration::{Migrations, M};

use crate::error::StorageError;

/// How long a writer waits for another process holding the database lock.
/// A save is a single-row insert, so contention is short.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Bill history schema, oldest migration first.
fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(include_str!("migrations/001_initial_schema.sql"))])
}

/// Opens (or creates) the bill database at `path`, migrated to the latest
/// schema.
pub fn open_database(path: &str) -> Result<Connection, StorageError> {
    let mut conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    prepare(&mut conn)?;
    Ok(conn)
}

/// Opens a throwaway in-memory bill database (for tests and ephemeral tills).
pub fn open_in_memory() -> Result<Connection, StorageError> {
    let mut conn = Connection::open_in_memory()?;
    prepare(&mut conn)?;
    Ok(conn)
}

fn prepare(conn: &mut Connection) -> Result<(), StorageError> {
    // Readers (history listings) never block the till's saves.
    conn.pragma_update(None, "journal_mode", "WAL")?;
    // A saved bill may be lost on power failure, never half-written.
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    migrations()
        .to_latest(conn)
        .map_err(|e| StorageError::Migration(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_valid() {
        assert!(migrations().validate().is_ok());
    }

    #[test]
    fn in_memory_database_has_tables() {
        let conn = open_in_memory().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('settings', 'saved_bills', 'enrollment')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn file_database_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("till.db");
        let conn = open_database(path.to_str().unwrap()).unwrap();
        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn reopening_does_not_rerun_migrations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("till.db");
        let path = path.to_str().unwrap();
        drop(open_database(path).unwrap());
        assert!(open_database(path).is_ok());
    }
}
