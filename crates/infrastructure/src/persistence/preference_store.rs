//! SQLite preference store implementation
//!
//! Implements the `PreferenceStore` port using SQLite.

use std::sync::Arc;

use application::{ApplicationError, PreferenceStore};
use async_trait::async_trait;
use domain::{ChatId, StopCount};
use rusqlite::{OptionalExtension, params};
use tokio::task;
use tracing::{debug, instrument, warn};

use super::connection::ConnectionPool;

/// SQLite-based per-chat preference store
#[derive(Debug, Clone)]
pub struct SqlitePreferenceStore {
    pool: Arc<ConnectionPool>,
}

impl SqlitePreferenceStore {
    /// Create a new SQLite preference store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

fn internal(e: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Internal(e.to_string())
}

#[async_trait]
impl PreferenceStore for SqlitePreferenceStore {
    #[instrument(skip(self), fields(chat_id = %chat_id))]
    async fn get(&self, chat_id: ChatId) -> Result<Option<StopCount>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;

            let stored: Option<i64> = conn
                .query_row(
                    "SELECT stop_count FROM user_preferences WHERE chat_id = ?1",
                    [chat_id.as_i64()],
                    |row| row.get(0),
                )
                .optional()
                .map_err(internal)?;

            let count = stored.map(|value| {
                let count = StopCount::from_stored(value);
                if i64::from(count.get()) != value {
                    warn!(stored = value, "Stored stop count out of range, using default");
                }
                count
            });

            debug!(found = count.is_some(), "Retrieved preference");
            Ok::<_, ApplicationError>(count)
        })
        .await
        .map_err(internal)?
    }

    #[instrument(skip(self), fields(chat_id = %chat_id, count = count.get()))]
    async fn put(&self, chat_id: ChatId, count: StopCount) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(internal)?;

            conn.execute(
                "INSERT INTO user_preferences (chat_id, stop_count, updated_at)
                 VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(chat_id) DO UPDATE SET
                     stop_count = excluded.stop_count,
                     updated_at = excluded.updated_at",
                params![chat_id.as_i64(), count.get()],
            )
            .map_err(internal)?;

            debug!("Saved preference");
            Ok::<_, ApplicationError>(())
        })
        .await
        .map_err(internal)?
    }
}
