//! Application configuration
//!
//! Loaded in layers: built-in defaults, an optional `config.toml`, then
//! `FERMATA_*` environment variables (`FERMATA_TELEGRAM__BOT_TOKEN`,
//! `FERMATA_BOT__MAX_STOP_COUNT`, ...). Nested keys are separated by `__`.

use std::{fmt, path::Path, str::FromStr};

use application::BotSettings;
use chrono_tz::Tz;
use integration_amt::AmtConfig;
use integration_telegram::TelegramConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::retry::RetryConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "FERMATA";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Telegram bot configuration
    #[serde(default)]
    pub telegram: TelegramAppConfig,

    /// AMT timetable site configuration
    #[serde(default)]
    pub amt: AmtConfig,

    /// Stop catalog configuration
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Retry policy for timetable requests
    #[serde(default)]
    pub retry: RetryConfig,

    /// Bot behaviour
    #[serde(default)]
    pub bot: BotConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Telegram configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramAppConfig {
    /// Bot token from @BotFather
    #[serde(default)]
    pub bot_token: String,

    /// Bot API root URL
    #[serde(default = "default_telegram_api_url")]
    pub api_base_url: String,

    /// Long polling timeout in seconds
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,

    /// Timeout for a single request on top of the polling timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Pause after a failed poll before trying again
    #[serde(default = "default_error_pause_secs")]
    pub error_pause_secs: u64,
}

impl fmt::Debug for TelegramAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramAppConfig")
            .field(
                "bot_token",
                &if self.bot_token.is_empty() {
                    "[NOT SET]"
                } else {
                    "[REDACTED]"
                },
            )
            .field("api_base_url", &self.api_base_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("error_pause_secs", &self.error_pause_secs)
            .finish()
    }
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

const fn default_poll_timeout_secs() -> u64 {
    30
}

const fn default_request_timeout_secs() -> u64 {
    10
}

const fn default_error_pause_secs() -> u64 {
    5
}

impl Default for TelegramAppConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_base_url: default_telegram_api_url(),
            poll_timeout_secs: default_poll_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            error_pause_secs: default_error_pause_secs(),
        }
    }
}

impl TelegramAppConfig {
    /// Client configuration for the Telegram integration
    #[must_use]
    pub fn client_config(&self) -> TelegramConfig {
        TelegramConfig {
            bot_token: self.bot_token.clone(),
            api_base_url: self.api_base_url.clone(),
            poll_timeout_secs: self.poll_timeout_secs,
            request_timeout_secs: self.request_timeout_secs,
        }
    }
}

/// Stop catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the stop catalog JSON file
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

fn default_catalog_path() -> String {
    "stops.json".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Whether to run migrations on startup
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

fn default_db_path() -> String {
    "fermata.db".to_string()
}

const fn default_max_connections() -> u32 {
    4
}

const fn default_true() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
            run_migrations: true,
        }
    }
}

/// Bot behaviour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Largest value accepted by `/stops`
    #[serde(default = "default_max_stop_count")]
    pub max_stop_count: u32,

    /// IANA timezone of the transit network, used to pick the service day
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

const fn default_max_stop_count() -> u32 {
    10
}

fn default_timezone() -> String {
    "Europe/Rome".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            max_stop_count: default_max_stop_count(),
            timezone: default_timezone(),
        }
    }
}

impl BotConfig {
    /// Settings for the bot service
    pub fn settings(&self) -> Result<BotSettings, ConfigError> {
        let network_timezone = Tz::from_str(&self.timezone).map_err(|e| {
            ConfigError::Invalid(vec![format!("bot.timezone '{}': {e}", self.timezone)])
        })?;
        Ok(BotSettings {
            max_stop_count: self.max_stop_count,
            network_timezone,
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(
            config::File::with_name("config").required(false),
            Self::environment(),
        )
    }

    /// Load configuration from an explicit file and the environment
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(config::File::from(path).required(true), Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    pub(crate) fn load_with<F>(file: F, env: config::Environment) -> Result<Self, ConfigError>
    where
        F: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Check settings the types alone cannot enforce
    ///
    /// The Telegram token is only required by the bot binary, so it is not
    /// checked here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if let Err(e) = self.amt.validate() {
            problems.push(format!("amt: {e}"));
        }
        if self.catalog.path.trim().is_empty() {
            problems.push("catalog.path must not be empty".to_string());
        }
        if self.database.max_connections == 0 {
            problems.push("database.max_connections must be greater than 0".to_string());
        }
        if self.bot.max_stop_count == 0 {
            problems.push("bot.max_stop_count must be greater than 0".to_string());
        }
        if Tz::from_str(&self.bot.timezone).is_err() {
            problems.push(format!("bot.timezone '{}' is not a known timezone", self.bot.timezone));
        }
        if let Err(e) = self.retry.validate() {
            problems.push(format!("retry: {e}"));
        }
        if self.telegram.poll_timeout_secs > 50 {
            problems.push("telegram.poll_timeout_secs must be 50 or less".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }
}
