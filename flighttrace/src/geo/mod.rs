//! Geometry kernel.
//!
//! Pure great-circle helpers used by both the statistics aggregator and the
//! replay sequencer. All angles are decimal degrees, distances are kilometres.

use crate::model::GeoPoint;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometres (haversine).
///
/// Symmetric in its arguments and exactly 0 for identical points.
#[inline]
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    // Rounding can push h a hair above 1 for antipodal points
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Initial bearing from point 1 to point 2.
///
/// Returns degrees in `[0, 360)`, where 0 = North, 90 = East.
/// Identical points produce 0.
#[inline]
pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let x = dlon.sin() * lat2_rad.cos();
    let y = lat1_rad.cos() * lat2_rad.sin() - lat1_rad.sin() * lat2_rad.cos() * dlon.cos();

    normalize_bearing(x.atan2(y).to_degrees())
}

/// Bearing between two [`GeoPoint`]s.
#[inline]
pub fn bearing_between(from: GeoPoint, to: GeoPoint) -> f64 {
    bearing(from.lat, from.lon, to.lat, to.lon)
}

/// Normalize any angle in degrees to `[0, 360)`.
pub fn normalize_bearing(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Format decimal degrees as degrees/minutes/seconds.
///
/// The hemisphere letter is picked from the sign: N/S for latitude, E/W for
/// longitude. Seconds carry one decimal place, e.g. `37°24'36.0"N`.
pub fn to_dms(decimal_degrees: f64, is_latitude: bool) -> String {
    let hemisphere = match (is_latitude, decimal_degrees < 0.0) {
        (true, false) => 'N',
        (true, true) => 'S',
        (false, false) => 'E',
        (false, true) => 'W',
    };

    let absolute = decimal_degrees.abs();
    let mut degrees = absolute.trunc();
    let minutes_full = (absolute - degrees) * 60.0;
    let mut minutes = minutes_full.trunc();
    let mut seconds = (minutes_full - minutes) * 60.0;

    // Carry when seconds round up to 60.0 at one decimal place
    if (seconds * 10.0).round() >= 600.0 {
        seconds = 0.0;
        minutes += 1.0;
    }
    if minutes >= 60.0 {
        minutes -= 60.0;
        degrees += 1.0;
    }

    format!(
        "{}°{}'{:.1}\"{}",
        degrees as u32, minutes as u32, seconds, hemisphere
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon)
    }

    #[test]
    fn test_distance_identical_points_is_zero() {
        let p = point(37.4611, -122.1150);
        assert_eq!(distance(p, p), 0.0);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        // One degree of latitude is ~111.19 km on a 6371 km sphere
        let d = distance(point(0.0, 0.0), point(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "Expected ~111.195 km, got {}", d);
    }

    #[test]
    fn test_distance_known_city_pair() {
        // San Francisco (KSFO) to Los Angeles (KLAX), ~543 km
        let sfo = point(37.6188, -122.3750);
        let lax = point(33.9416, -118.4085);
        let d = distance(sfo, lax);
        assert!((d - 543.0).abs() < 5.0, "Expected ~543 km, got {}", d);
    }

    #[test]
    fn test_distance_antipodal_is_half_circumference() {
        let d = distance(point(0.0, 0.0), point(0.0, 180.0));
        let expected = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((d - expected).abs() < 1e-6);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        assert!((bearing(0.0, 0.0, 1.0, 0.0) - 0.0).abs() < 0.1);
        assert!((bearing(0.0, 0.0, 0.0, 1.0) - 90.0).abs() < 0.1);
        assert!((bearing(0.0, 0.0, -1.0, 0.0) - 180.0).abs() < 0.1);
        assert!((bearing(0.0, 0.0, 0.0, -1.0) - 270.0).abs() < 0.1);
    }

    #[test]
    fn test_bearing_identical_points_in_range() {
        let b = bearing(53.5, 10.0, 53.5, 10.0);
        assert!((0.0..360.0).contains(&b));
    }

    #[test]
    fn test_normalize_bearing() {
        assert_eq!(normalize_bearing(-90.0), 270.0);
        assert_eq!(normalize_bearing(720.0), 0.0);
        assert_eq!(normalize_bearing(-1e-18), 0.0);
        assert_eq!(normalize_bearing(f64::NAN), 0.0);
    }

    #[test]
    fn test_to_dms_latitude() {
        assert_eq!(to_dms(37.41, true), "37°24'36.0\"N");
        assert_eq!(to_dms(-33.5, true), "33°30'0.0\"S");
    }

    #[test]
    fn test_to_dms_longitude() {
        assert_eq!(to_dms(-122.25, false), "122°15'0.0\"W");
        assert_eq!(to_dms(10.0, false), "10°0'0.0\"E");
    }

    #[test]
    fn test_to_dms_carries_rounded_seconds() {
        // 59.99 seconds rounds to 60.0 and must carry into minutes
        let value = 10.0 + 59.0 / 60.0 + 59.99 / 3600.0;
        assert_eq!(to_dms(value, false), "11°0'0.0\"E");
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_distance_self_is_zero(
                lat in -90.0..90.0_f64,
                lon in -180.0..180.0_f64,
            ) {
                let p = point(lat, lon);
                prop_assert_eq!(distance(p, p), 0.0);
            }

            #[test]
            fn test_distance_symmetric(
                lat1 in -90.0..90.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64,
            ) {
                let a = point(lat1, lon1);
                let b = point(lat2, lon2);
                let ab = distance(a, b);
                let ba = distance(b, a);
                prop_assert!(
                    (ab - ba).abs() < 1e-9,
                    "distance not symmetric: {} vs {}", ab, ba
                );
            }

            #[test]
            fn test_bearing_always_in_range(
                lat1 in -90.0..90.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64,
            ) {
                let b = bearing(lat1, lon1, lat2, lon2);
                prop_assert!((0.0..360.0).contains(&b), "bearing out of range: {}", b);
            }
        }
    }
}
