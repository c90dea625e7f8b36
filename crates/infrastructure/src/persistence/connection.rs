//! SQLite connection pool for the preference database

use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DatabaseConfig;

/// Errors opening or migrating the preference database
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Could not get a database connection: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Failed to create database directory {path}: {source}")]
    Directory {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Shared pool of SQLite connections
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Open the database, creating its directory and schema as needed
///
/// An in-memory database (`:memory:`) exists once per connection, so such a
/// pool is limited to a single connection.
pub fn create_pool(config: &DatabaseConfig) -> Result<ConnectionPool, DatabaseError> {
    info!(path = %config.path, max_connections = config.max_connections, "Opening preference database");

    let in_memory = config.path == ":memory:";
    let manager = if in_memory {
        SqliteConnectionManager::memory()
    } else {
        let parent = Path::new(&config.path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty());
        if let Some(parent) = parent {
            std::fs::create_dir_all(parent).map_err(|source| DatabaseError::Directory {
                path: parent.display().to_string(),
                source,
            })?;
        }
        SqliteConnectionManager::file(&config.path)
    };

    let manager = manager.with_init(initialize_connection);
    let max_size = if in_memory { 1 } else { config.max_connections.max(1) };

    let pool = Pool::builder().max_size(max_size).build(manager)?;

    if config.run_migrations {
        let conn = pool.get()?;
        crate::persistence::migrations::run_migrations(&conn)?;
    }

    debug!("Preference database ready");
    Ok(pool)
}

/// Per-connection settings
fn initialize_connection(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
}
