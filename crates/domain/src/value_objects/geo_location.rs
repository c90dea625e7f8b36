//! Geographic location value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic location with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
}

impl GeoLocation {
    /// Create a new location with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinate` if latitude is not in [-90, 90],
    /// longitude is not in [-180, 180], or either value is not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::InvalidCoordinate(format!(
                "latitude {latitude} is outside -90..90"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinate(format!(
                "longitude {longitude} is outside -180..180"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse a location from decimal-degree text, as found in the stop catalog
    /// or typed on the command line
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, DomainError> {
        let lat = parse_degrees(latitude)?;
        let lon = parse_degrees(longitude)?;
        Self::new(lat, lon)
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another location in kilometers
    ///
    /// Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_KM`].
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        let lat1_rad = self.latitude.to_radians();
        let lat2_rad = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
            (delta_lon / 2.0).sin().powi(2),
            (delta_lat / 2.0).sin().powi(2),
        );
        // Rounding can push `a` a hair above 1 for antipodal points
        let c = 2.0 * a.min(1.0).sqrt().asin();

        EARTH_RADIUS_KM * c
    }
}

fn parse_degrees(text: &str) -> Result<f64, DomainError> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| DomainError::InvalidCoordinate(format!("'{text}' is not a number")))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DomainError::InvalidCoordinate(format!(
            "'{text}' is not a finite number"
        )))
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}
