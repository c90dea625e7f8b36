//! Database migrations
//!
//! The schema version is kept in `schema_version`. Each migration runs once,
//! in order, and the version is bumped after all pending ones succeed.
//!
//! ## Adding New Migrations
//!
//! 1. Increment `SCHEMA_VERSION`
//! 2. Add a `migrate_vN` function and an entry in `MIGRATIONS`

use rusqlite::Connection;
use tracing::{debug, error, info};

use super::connection::DatabaseError;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

type Migration = fn(&Connection) -> Result<(), DatabaseError>;

const MIGRATIONS: [(i32, &str, Migration); 2] = [
    (1, "user preferences", migrate_v1),
    (2, "preference timestamps", migrate_v2),
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = schema_version(conn)?;

    if current_version >= SCHEMA_VERSION {
        debug!(version = current_version, "Database schema is up to date");
        return Ok(());
    }

    info!(
        from_version = current_version,
        to_version = SCHEMA_VERSION,
        "Running database migrations"
    );

    for (version, name, migrate) in MIGRATIONS {
        if current_version >= version {
            continue;
        }
        if let Err(e) = migrate(conn) {
            error!(version, migration = name, error = %e, "Migration failed");
            return Err(e);
        }
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    info!(version = SCHEMA_VERSION, "Database migrations complete");
    Ok(())
}

/// Current schema version, 0 for a fresh database
pub fn schema_version(conn: &Connection) -> Result<i32, DatabaseError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Version 1: one stop count per chat
fn migrate_v1(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V001: user preferences");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS user_preferences (
            chat_id INTEGER PRIMARY KEY,
            stop_count INTEGER NOT NULL CHECK(stop_count > 0)
        );
        ",
    )
    .map_err(|e| DatabaseError::Migration(format!("V001: {e}")))
}

/// Version 2: remember when a preference was last changed
fn migrate_v2(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V002: preference timestamps");

    conn.execute_batch(
        "
        ALTER TABLE user_preferences ADD COLUMN updated_at TEXT;
        UPDATE user_preferences SET updated_at = datetime('now') WHERE updated_at IS NULL;
        ",
    )
    .map_err(|e| DatabaseError::Migration(format!("V002: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_is_version_zero() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);
    }

    #[test]
    fn migrations_reach_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);

        conn.execute(
            "INSERT INTO user_preferences (chat_id, stop_count, updated_at) VALUES (1, 3, 'now')",
            [],
        )
        .unwrap();
    }

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn upgrade_from_v1_keeps_rows() {
        let conn = Connection::open_in_memory().unwrap();
        schema_version(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        set_schema_version(&conn, 1).unwrap();
        conn.execute(
            "INSERT INTO user_preferences (chat_id, stop_count) VALUES (42, 5)",
            [],
        )
        .unwrap();

        run_migrations(&conn).unwrap();

        let (count, stamped): (i64, bool) = conn
            .query_row(
                "SELECT stop_count, updated_at IS NOT NULL FROM user_preferences WHERE chat_id = 42",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(count, 5);
        assert!(stamped);
    }

    #[test]
    fn zero_stop_count_is_rejected_by_schema() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO user_preferences (chat_id, stop_count) VALUES (1, 0)",
            [],
        );
        assert!(result.is_err());
    }
}
