//! Haversine great-circle distance on a spherical Earth.
//!
//! All distances in quake-map are in statute miles.

use quake_map_event_models::Coordinate;

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Great-circle distance in miles between `a` and `b`.
///
/// Symmetric and non-negative; zero when both points are equal. Both
/// coordinates are in range by construction, so there is no error path.
#[must_use]
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude().to_radians();
    let lat_b = b.latitude().to_radians();
    let d_lat = (b.latitude() - a.latitude()).to_radians();
    let d_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push `h` a hair past 1.0 for antipodal points.
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_MILES * c
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn same_point_is_zero() {
        for (lat, lon) in [(0.0, 0.0), (32.7787, -96.8217), (-89.9, 179.9), (90.0, 0.0)] {
            let p = coord(lat, lon);
            assert!(distance(p, p).abs() < 1e-9, "non-zero for ({lat}, {lon})");
        }
    }

    #[test]
    fn symmetric() {
        let dallas = coord(32.7787, -96.8217);
        let tokyo = coord(35.6762, 139.6503);
        assert!((distance(dallas, tokyo) - distance(tokyo, dallas)).abs() < 1e-9);
    }

    #[test]
    fn quarter_circumference_on_equator() {
        let d = distance(coord(0.0, 0.0), coord(0.0, 90.0));
        let expected = PI * EARTH_RADIUS_MILES / 2.0;
        assert!((d - expected).abs() < 1e-6, "got {d}, expected {expected}");
        assert!((d - 6218.5).abs() < 1.0);
    }

    #[test]
    fn antipodes_are_half_circumference() {
        let d = distance(coord(0.0, -180.0), coord(0.0, 0.0));
        assert!((d - PI * EARTH_RADIUS_MILES).abs() < 1e-6);
    }

    #[test]
    fn known_city_pair() {
        // Dallas to Los Angeles is roughly 1,240 miles.
        let d = distance(coord(32.7787, -96.8217), coord(34.0522, -118.2437));
        assert!((1200.0..1280.0).contains(&d), "got {d}");
    }
}
