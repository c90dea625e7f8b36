//! Result entry of a nearest-stop query

use serde::{Deserialize, Serialize};

use super::Stop;

/// A catalog stop together with its distance from the query point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyStop {
    /// The catalog stop
    pub stop: Stop,
    /// Great-circle distance in kilometers
    pub distance_km: f64,
}

impl NearbyStop {
    /// Distance in whole meters, rounded down
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn distance_meters(&self) -> u64 {
        (self.distance_km * 1000.0).floor().max(0.0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{GeoLocation, StopCode};

    fn nearby(distance_km: f64) -> NearbyStop {
        NearbyStop {
            stop: Stop::new(
                StopCode::parse("0001").unwrap(),
                None,
                GeoLocation::new(44.4, 8.9).unwrap(),
            ),
            distance_km,
        }
    }

    #[test]
    fn meters_are_floored() {
        assert_eq!(nearby(0.123_9).distance_meters(), 123);
        assert_eq!(nearby(1.0).distance_meters(), 1000);
    }

    #[test]
    fn zero_distance() {
        assert_eq!(nearby(0.0).distance_meters(), 0);
    }
}
