//! Domain entities - catalog stops and timetable records

mod nearby_stop;
mod stop;
mod timetable;

pub use nearby_stop::NearbyStop;
pub use stop::Stop;
pub use timetable::{Departure, LineDirection, LineTimetable, StopTimetable};
