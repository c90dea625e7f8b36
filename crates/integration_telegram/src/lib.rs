//! Telegram integration
//!
//! Minimal Bot API client: long polling for updates, sending text messages
//! with optional HTML formatting and reply keyboards, and sending locations.

pub mod client;
pub mod types;

pub use client::{TelegramClient, TelegramConfig, TelegramError, escape_html};
pub use types::{
    Chat, KeyboardButton, Location, Message, ParseMode, ReplyKeyboardMarkup, ReplyKeyboardRemove,
    ReplyMarkup, Update, User,
};
