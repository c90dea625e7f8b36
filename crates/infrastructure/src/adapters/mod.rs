//! Adapters implementing application ports and delivering replies

mod amt_timetable_adapter;
mod telegram_transport;

pub use amt_timetable_adapter::AmtTimetableAdapter;
pub use telegram_transport::{TelegramTransport, format_text, update_to_incoming};
