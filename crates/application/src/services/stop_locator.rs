//! Nearest-stop locator over the static stop catalog

use std::collections::HashSet;

use domain::{GeoLocation, NearbyStop, Stop, StopCode, StopCount};
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors raised while assembling the catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog has no stops at all
    #[error("Stop catalog is empty")]
    Empty,

    /// Two entries share the same code
    #[error("Duplicate stop code in catalog: {0}")]
    DuplicateCode(StopCode),
}

/// Immutable, non-empty set of known stops
///
/// Built once at startup and shared read-only afterwards. Iteration order is
/// the order of the source file and is used to break distance ties.
#[derive(Debug, Clone)]
pub struct StopCatalog {
    stops: Vec<Stop>,
}

impl StopCatalog {
    /// Build a catalog, rejecting empty input and duplicate codes
    pub fn from_stops(stops: Vec<Stop>) -> Result<Self, CatalogError> {
        if stops.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(stops.len());
        for stop in &stops {
            if !seen.insert(&stop.code) {
                return Err(CatalogError::DuplicateCode(stop.code.clone()));
            }
        }

        Ok(Self { stops })
    }

    /// Number of stops
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Always false; an empty catalog cannot be built
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Iterate stops in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter()
    }

    /// Look up a stop by code
    pub fn get(&self, code: &StopCode) -> Option<&Stop> {
        self.stops.iter().find(|stop| &stop.code == code)
    }

    /// The `count` stops closest to `origin`, nearest first
    ///
    /// Returns `min(count, len)` entries ranked by haversine distance. The
    /// sort is stable, so stops at equal distance keep catalog order.
    #[instrument(skip(self), fields(catalog_size = self.stops.len()))]
    pub fn find_nearest(&self, origin: &GeoLocation, count: StopCount) -> Vec<NearbyStop> {
        let mut ranked: Vec<(usize, f64)> = self
            .stops
            .iter()
            .enumerate()
            .map(|(index, stop)| (index, origin.distance_km(&stop.location)))
            .collect();

        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

        let nearest: Vec<NearbyStop> = ranked
            .into_iter()
            .take(count.as_usize())
            .map(|(index, distance_km)| NearbyStop {
                stop: self.stops[index].clone(),
                distance_km,
            })
            .collect();

        debug!(returned = nearest.len(), "Ranked nearest stops");
        nearest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(code: &str, lat: f64, lon: f64) -> Stop {
        Stop::new(
            StopCode::parse(code).unwrap(),
            Some(format!("Stop {code}")),
            GeoLocation::new(lat, lon).unwrap(),
        )
    }

    /// Five stops spread along a line going north from the origin
    fn five_stop_catalog() -> StopCatalog {
        StopCatalog::from_stops(vec![
            stop("0005", 44.450, 8.900),
            stop("0001", 44.401, 8.900),
            stop("0003", 44.420, 8.900),
            stop("0002", 44.410, 8.900),
            stop("0004", 44.430, 8.900),
        ])
        .unwrap()
    }

    fn origin() -> GeoLocation {
        GeoLocation::new(44.400, 8.900).unwrap()
    }

    fn count(n: u32) -> StopCount {
        StopCount::new(n, 100).unwrap()
    }

    fn codes(result: &[NearbyStop]) -> Vec<&str> {
        result.iter().map(|n| n.stop.code.as_str()).collect()
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert_eq!(StopCatalog::from_stops(vec![]).unwrap_err(), CatalogError::Empty);
    }

    #[test]
    fn duplicate_codes_are_rejected() {
        let err = StopCatalog::from_stops(vec![
            stop("0001", 44.4, 8.9),
            stop("0001", 44.5, 8.9),
        ])
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateCode(code) if code.as_str() == "0001"));
    }

    #[test]
    fn get_by_code() {
        let catalog = five_stop_catalog();
        let code = StopCode::parse("0003").unwrap();
        assert_eq!(catalog.get(&code).unwrap().display_name(), "Stop 0003");
        assert!(catalog.get(&StopCode::parse("9999").unwrap()).is_none());
    }

    #[test]
    fn returns_requested_count_sorted_by_distance() {
        let result = five_stop_catalog().find_nearest(&origin(), count(3));
        assert_eq!(codes(&result), vec!["0001", "0002", "0003"]);
        assert!(result.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[test]
    fn count_larger_than_catalog_returns_everything() {
        let result = five_stop_catalog().find_nearest(&origin(), count(10));
        assert_eq!(result.len(), 5);
        assert_eq!(codes(&result), vec!["0001", "0002", "0003", "0004", "0005"]);
    }

    #[test]
    fn default_count_returns_single_stop() {
        let result = five_stop_catalog().find_nearest(&origin(), StopCount::default());
        assert_eq!(codes(&result), vec!["0001"]);
    }

    #[test]
    fn distances_match_haversine() {
        let catalog = five_stop_catalog();
        let result = catalog.find_nearest(&origin(), count(5));
        for entry in &result {
            let expected = origin().distance_km(&entry.stop.location);
            assert!((entry.distance_km - expected).abs() < f64::EPSILON);
        }
        // 0.001 degrees of latitude is about 111 meters
        assert_eq!(result[0].distance_meters(), 111);
    }

    #[test]
    fn ties_keep_catalog_order() {
        let catalog = StopCatalog::from_stops(vec![
            stop("0009", 44.410, 8.900),
            stop("0007", 44.450, 8.900),
            stop("0008", 44.410, 8.900),
        ])
        .unwrap();
        let result = catalog.find_nearest(&origin(), count(3));
        assert_eq!(codes(&result), vec!["0009", "0008", "0007"]);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let catalog = five_stop_catalog();
        let first = catalog.find_nearest(&origin(), count(4));
        let second = catalog.find_nearest(&origin(), count(4));
        assert_eq!(first, second);
    }
}
