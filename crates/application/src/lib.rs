//! Application layer - Use cases and orchestration
//!
//! Contains the nearest-stop locator, the reply renderer, the chat input
//! parser and the bot service that ties them together, plus the port traits
//! implemented by the infrastructure layer.

pub mod command_parser;
pub mod error;
pub mod messages;
pub mod ports;
pub mod services;

pub use command_parser::{BotCommand, CommandParser, ParsedInput};
pub use error::ApplicationError;
pub use messages::{IncomingMessage, MessageContent, Reply, ReplyKeyboard};
pub use ports::*;
pub use services::*;

#[cfg(test)]
mod test_support;
