//! Fermata bot
//!
//! Answers AMT Genova timetable questions on Telegram.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, bail};
use application::BotService;
use clap::Parser;
use infrastructure::{
    AmtTimetableAdapter, AppConfig, SqlitePreferenceStore, TelegramTransport, create_pool,
    init_logging, load_catalog,
};
use integration_telegram::TelegramClient;
use presentation_bot::{PollingRunner, shutdown_signal};
use tracing::info;

/// Fermata Telegram bot
#[derive(Parser)]
#[command(name = "fermata-bot")]
#[command(author, version, about = "AMT Genova timetables on Telegram", long_about = None)]
struct Args {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, env = "FERMATA_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;

    init_logging(&config.logging);
    info!(version = env!("CARGO_PKG_VERSION"), "Fermata bot starting");

    config.validate().context("Invalid configuration")?;
    if config.telegram.bot_token.trim().is_empty() {
        bail!("telegram.bot_token is not set (FERMATA_TELEGRAM__BOT_TOKEN)");
    }

    let catalog = load_catalog(Path::new(&config.catalog.path))
        .with_context(|| format!("Failed to load stop catalog {}", config.catalog.path))?;

    let pool = create_pool(&config.database).context("Failed to open preference database")?;
    let preferences = SqlitePreferenceStore::new(Arc::new(pool));

    let timetable = AmtTimetableAdapter::new(&config.amt, config.retry.clone())
        .context("Failed to initialize AMT client")?;

    let service = BotService::new(
        Arc::new(catalog),
        Arc::new(timetable),
        Arc::new(preferences),
        config.bot.settings()?,
    );

    let client = TelegramClient::new(config.telegram.client_config())?;
    let me = client
        .get_me()
        .await
        .context("Telegram rejected the bot token")?;
    info!(
        bot_id = me.id,
        username = me.username.as_deref().unwrap_or("-"),
        "Connected to Telegram"
    );

    let runner = PollingRunner::new(
        TelegramTransport::new(client),
        Arc::new(service),
        Duration::from_secs(config.telegram.error_pause_secs),
    );
    runner.run(shutdown_signal()).await;

    info!("Shutdown complete");
    Ok(())
}
