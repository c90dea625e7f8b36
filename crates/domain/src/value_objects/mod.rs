//! Value Objects - Immutable, identity-less domain primitives

mod chat_id;
mod geo_location;
mod line_number;
mod stop_code;
mod stop_count;

pub use chat_id::ChatId;
pub use geo_location::GeoLocation;
pub use line_number::LineNumber;
pub use stop_code::StopCode;
pub use stop_count::StopCount;
