//! Transport-neutral chat messages exchanged with the bot service

use domain::{ChatId, GeoLocation};

use crate::services::DisplayText;

/// Payload of an incoming chat message
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    /// Free text or a slash command
    Text(String),
    /// A shared position, as sent by the messenger (not validated yet)
    Location {
        /// Latitude in decimal degrees
        latitude: f64,
        /// Longitude in decimal degrees
        longitude: f64,
    },
}

/// A message received from a chat
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingMessage {
    /// Conversation the message belongs to
    pub chat_id: ChatId,
    /// Message payload
    pub content: MessageContent,
}

impl IncomingMessage {
    /// Create a text message
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Create a location message
    pub const fn location(chat_id: ChatId, latitude: f64, longitude: f64) -> Self {
        Self {
            chat_id,
            content: MessageContent::Location {
                latitude,
                longitude,
            },
        }
    }
}

/// Custom keyboard change attached to a text reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyKeyboard {
    /// Show a one-time keyboard with these button rows
    Buttons(Vec<Vec<String>>),
    /// Hide a previously shown keyboard
    Remove,
}

/// Something the bot wants to send back to the chat
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A text message
    Text {
        /// Rendered text and its presentation mode
        text: DisplayText,
        /// Optional keyboard change
        keyboard: Option<ReplyKeyboard>,
    },
    /// A map pin
    Location(GeoLocation),
}

impl Reply {
    /// Text reply without keyboard changes
    pub const fn text(text: DisplayText) -> Self {
        Self::Text {
            text,
            keyboard: None,
        }
    }

    /// Text reply with a keyboard change
    pub const fn text_with_keyboard(text: DisplayText, keyboard: ReplyKeyboard) -> Self {
        Self::Text {
            text,
            keyboard: Some(keyboard),
        }
    }

    /// The text of a text reply
    pub fn as_text(&self) -> Option<&DisplayText> {
        match self {
            Self::Text { text, .. } => Some(text),
            Self::Location(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_constructor() {
        let msg = IncomingMessage::text(ChatId::new(7), "1234");
        assert_eq!(msg.content, MessageContent::Text("1234".to_string()));
    }

    #[test]
    fn as_text_on_location_is_none() {
        let reply = Reply::Location(GeoLocation::new(44.4, 8.9).unwrap());
        assert!(reply.as_text().is_none());
    }

    #[test]
    fn as_text_on_text_reply() {
        let reply = Reply::text(DisplayText::plain("hi"));
        assert_eq!(reply.as_text().map(|t| t.text.as_str()), Some("hi"));
    }
}
