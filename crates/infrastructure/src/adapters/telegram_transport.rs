//! Telegram transport - maps bot replies onto Bot API calls

use application::{IncomingMessage, RenderMode, Reply, ReplyKeyboard};
use domain::ChatId;
use integration_telegram::{
    ParseMode, ReplyKeyboardMarkup, ReplyKeyboardRemove, ReplyMarkup, TelegramClient,
    TelegramError, Update, escape_html,
};
use tracing::{debug, instrument};

/// Delivers [`Reply`] values through the Telegram Bot API
#[derive(Debug)]
pub struct TelegramTransport {
    client: TelegramClient,
}

impl TelegramTransport {
    /// Wrap a configured client
    #[must_use]
    pub const fn new(client: TelegramClient) -> Self {
        Self { client }
    }

    /// Underlying Bot API client
    #[must_use]
    pub const fn client(&self) -> &TelegramClient {
        &self.client
    }

    /// Send one reply to a chat
    #[instrument(skip(self, reply), fields(chat_id = %chat_id))]
    pub async fn deliver(&self, chat_id: ChatId, reply: &Reply) -> Result<(), TelegramError> {
        match reply {
            Reply::Text { text, keyboard } => {
                let markup = keyboard.as_ref().map(to_markup);
                let (body, parse_mode) = format_text(&text.text, text.mode);
                self.client
                    .send_message(chat_id.as_i64(), &body, parse_mode, markup.as_ref())
                    .await?;
            },
            Reply::Location(location) => {
                self.client
                    .send_location(chat_id.as_i64(), location.latitude(), location.longitude())
                    .await?;
            },
        }
        debug!("Reply delivered");
        Ok(())
    }
}

/// Message body and parse mode for a rendered text
///
/// Monospace blocks are sent as HTML `<pre>` so column alignment survives.
pub fn format_text(text: &str, mode: RenderMode) -> (String, Option<ParseMode>) {
    match mode {
        RenderMode::PlainText => (text.to_string(), None),
        RenderMode::MonospaceBlock => (
            format!("<pre>{}</pre>", escape_html(text)),
            Some(ParseMode::Html),
        ),
    }
}

fn to_markup(keyboard: &ReplyKeyboard) -> ReplyMarkup {
    match keyboard {
        ReplyKeyboard::Buttons(rows) => {
            ReplyMarkup::Keyboard(ReplyKeyboardMarkup::one_time(rows.iter().cloned()))
        },
        ReplyKeyboard::Remove => ReplyMarkup::Remove(ReplyKeyboardRemove::default()),
    }
}

/// Convert a Bot API update into a bot message
///
/// Updates without a message, or messages carrying neither text nor a
/// location (stickers, photos), yield `None`.
pub fn update_to_incoming(update: &Update) -> Option<IncomingMessage> {
    let message = update.message.as_ref()?;
    let chat_id = ChatId::new(message.chat.id);

    if let Some(location) = message.location {
        return Some(IncomingMessage::location(
            chat_id,
            location.latitude,
            location.longitude,
        ));
    }

    message
        .text
        .as_ref()
        .map(|text| IncomingMessage::text(chat_id, text.clone()))
}
