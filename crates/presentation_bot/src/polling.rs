//! Telegram long-polling loop
//!
//! Updates are processed one at a time: fetch, answer, deliver, then the
//! next update. The offset only advances past updates that were handled, so a
//! crash replays at most the batch in flight.

use std::{future::Future, sync::Arc, time::Duration};

use application::BotService;
use infrastructure::{TelegramTransport, update_to_incoming};
use integration_telegram::{TelegramError, Update};
use tracing::{debug, info, instrument, warn};

/// Drives the bot service from Telegram updates
#[derive(Debug)]
pub struct PollingRunner {
    transport: TelegramTransport,
    service: Arc<BotService>,
    error_pause: Duration,
}

impl PollingRunner {
    /// Create a runner
    ///
    /// `error_pause` is how long to wait after a failed `getUpdates` call.
    pub fn new(transport: TelegramTransport, service: Arc<BotService>, error_pause: Duration) -> Self {
        Self {
            transport,
            service,
            error_pause,
        }
    }

    /// Poll until `shutdown` resolves
    ///
    /// Shutdown interrupts the long poll or the error pause, never the
    /// handling of an update already received.
    pub async fn run<S>(&self, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut offset = None;

        info!("Polling for updates");

        loop {
            let updates = tokio::select! {
                () = &mut shutdown => break,
                result = self.transport.client().get_updates(offset) => result,
            };

            match updates {
                Ok(updates) => offset = self.process(&updates, offset).await,
                Err(e) => {
                    warn!(
                        error = %e,
                        pause_secs = self.error_pause.as_secs(),
                        "Failed to fetch updates"
                    );
                    tokio::select! {
                        () = &mut shutdown => break,
                        () = tokio::time::sleep(self.error_pause) => {},
                    }
                },
            }
        }

        info!("Polling stopped");
    }

    /// Fetch one batch of updates and answer it
    ///
    /// Returns the offset to use for the next call.
    pub async fn poll_once(&self, offset: Option<i64>) -> Result<Option<i64>, TelegramError> {
        let updates = self.transport.client().get_updates(offset).await?;
        Ok(self.process(&updates, offset).await)
    }

    async fn process(&self, updates: &[Update], offset: Option<i64>) -> Option<i64> {
        let mut next = offset;
        for update in updates {
            self.handle_update(update).await;
            next = Some(next.map_or(update.update_id + 1, |n| n.max(update.update_id + 1)));
        }
        next
    }

    #[instrument(skip(self, update), fields(update_id = update.update_id))]
    async fn handle_update(&self, update: &Update) {
        let Some(message) = update_to_incoming(update) else {
            debug!("Ignoring update without text or location");
            return;
        };

        let replies = self.service.handle(&message).await;
        for reply in &replies {
            if let Err(e) = self.transport.deliver(message.chat_id, reply).await {
                warn!(
                    chat_id = %message.chat_id,
                    error = %e,
                    "Failed to deliver reply, dropping the rest"
                );
                break;
            }
        }
    }
}
