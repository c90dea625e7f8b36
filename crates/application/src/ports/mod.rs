//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod preference_store;
mod timetable_port;

#[cfg(test)]
pub use preference_store::MockPreferenceStore;
pub use preference_store::PreferenceStore;
#[cfg(test)]
pub use timetable_port::MockTimetablePort;
pub use timetable_port::TimetablePort;
