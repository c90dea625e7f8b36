//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer.
//! Contains the AMT timetable adapter, the Telegram transport, SQLite
//! preference storage, stop catalog loading and configuration.

pub mod adapters;
pub mod catalog_loader;
pub mod config;
pub mod markers;
pub mod persistence;
pub mod retry;
pub mod telemetry;

pub use adapters::*;
pub use catalog_loader::{CatalogEntry, CatalogLoadError, load_catalog, parse_catalog, write_catalog};
pub use config::{
    AppConfig, BotConfig, CatalogConfig, ConfigError, DatabaseConfig, LoggingConfig,
    TelegramAppConfig,
};
pub use markers::{MarkerError, MarkerImport, import_markers};
pub use persistence::{ConnectionPool, DatabaseError, SqlitePreferenceStore, create_pool};
pub use retry::{RetryConfig, RetryOutcome, Retryable, with_retry};
pub use telemetry::init_logging;
