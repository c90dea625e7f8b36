//! Domain layer for Fermata
//!
//! Contains the transit vocabulary shared by every other crate: stop codes,
//! line numbers, coordinates, catalog stops and the timetable records produced
//! by the vendor scraper. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
