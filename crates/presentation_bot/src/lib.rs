//! Fermata Telegram bot
//!
//! Long-polling runner that feeds Telegram updates to the bot service and
//! delivers its replies.

pub mod polling;
pub mod shutdown;

pub use polling::PollingRunner;
pub use shutdown::shutdown_signal;
