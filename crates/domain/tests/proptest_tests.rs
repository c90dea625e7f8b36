//! Property-based tests for domain value objects
//!
//! Coordinates, identifiers and stop counts checked over random inputs.

use domain::value_objects::{GeoLocation, LineNumber, StopCode, StopCount};
use proptest::prelude::*;

// ============================================================================
// GeoLocation Property Tests
// ============================================================================

mod geo_location_tests {
    use super::*;

    proptest! {
        #[test]
        fn any_in_range_coordinate_is_accepted(
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64
        ) {
            let result = GeoLocation::new(lat, lon);
            prop_assert!(result.is_ok());
        }

        #[test]
        fn latitude_outside_range_is_rejected(
            lat in prop_oneof![
                (-1000.0f64..-90.1f64),
                (90.1f64..1000.0f64)
            ],
            lon in -180.0f64..=180.0f64
        ) {
            prop_assert!(GeoLocation::new(lat, lon).is_err());
        }

        #[test]
        fn distance_to_self_is_zero(
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64
        ) {
            let loc = GeoLocation::new(lat, lon).unwrap();
            prop_assert!(loc.distance_km(&loc).abs() < 1e-9);
        }

        #[test]
        fn distance_is_symmetric(
            lat1 in -90.0f64..=90.0f64,
            lon1 in -180.0f64..=180.0f64,
            lat2 in -90.0f64..=90.0f64,
            lon2 in -180.0f64..=180.0f64
        ) {
            let a = GeoLocation::new(lat1, lon1).unwrap();
            let b = GeoLocation::new(lat2, lon2).unwrap();
            prop_assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 1e-6);
        }

        #[test]
        fn distance_is_bounded_by_half_circumference(
            lat1 in -90.0f64..=90.0f64,
            lon1 in -180.0f64..=180.0f64,
            lat2 in -90.0f64..=90.0f64,
            lon2 in -180.0f64..=180.0f64
        ) {
            let a = GeoLocation::new(lat1, lon1).unwrap();
            let b = GeoLocation::new(lat2, lon2).unwrap();
            let d = a.distance_km(&b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * 6371.0 + 1e-6);
        }
    }
}

// ============================================================================
// Identifier Property Tests
// ============================================================================

mod identifier_tests {
    use super::*;

    proptest! {
        #[test]
        fn any_four_digits_is_a_stop_code(code in "[0-9]{4}") {
            prop_assert!(StopCode::parse(&code).is_ok());
            prop_assert!(LineNumber::parse(&code).is_err());
        }

        #[test]
        fn short_numbers_are_lines(line in "[0-9]{1,3}") {
            prop_assert!(LineNumber::parse(&line).is_ok());
            prop_assert!(StopCode::parse(&line).is_err());
        }

        #[test]
        fn letters_only_are_never_identifiers(token in "[a-zA-Z]{1,8}") {
            prop_assert!(LineNumber::parse(&token).is_err());
            prop_assert!(StopCode::parse(&token).is_err());
        }
    }
}

// ============================================================================
// StopCount Property Tests
// ============================================================================

mod stop_count_tests {
    use super::*;

    proptest! {
        #[test]
        fn counts_within_bounds_round_trip(max in 1u32..100, value in 1u32..100) {
            let result = StopCount::new(value, max);
            if value <= max {
                prop_assert_eq!(result.unwrap().get(), value);
            } else {
                prop_assert!(result.is_err());
            }
        }
    }
}
