//! Great-circle distance between two coordinates

use crate::Location;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two points given in degrees
pub fn haversine_km(from: Location, to: Location) -> f64 {
    let lat_1 = from.latitude.to_radians();
    let lat_2 = to.latitude.to_radians();
    let d_lat = lat_2 - lat_1;
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat_1.cos() * lat_2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1.0 for antipodal points
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHILADELPHIA: Location = Location {
        latitude: 40.0,
        longitude: -75.0,
    };
    const LOS_ANGELES: Location = Location {
        latitude: 34.0,
        longitude: -118.0,
    };

    #[test]
    fn test_identity() {
        for loc in [PHILADELPHIA, LOS_ANGELES, Location::new(-33.9, 151.2)] {
            assert_eq!(haversine_km(loc, loc), 0.0);
        }
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            (PHILADELPHIA, LOS_ANGELES),
            (Location::new(51.5, -0.1), Location::new(-36.8, 174.8)),
            (Location::new(0.0, 179.0), Location::new(0.0, -179.0)),
        ];
        for (a, b) in pairs {
            assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cross_country() {
        let d = haversine_km(LOS_ANGELES, PHILADELPHIA);
        assert!((d - 3_838.65).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn test_quarter_meridian() {
        let d = haversine_km(Location::new(0.0, 0.0), Location::new(90.0, 0.0));
        let expected = std::f64::consts::PI * EARTH_RADIUS_KM / 2.0;
        assert!((d - expected).abs() < 1e-6);
    }

    #[test]
    fn test_antipodal() {
        let d = haversine_km(Location::new(0.0, 0.0), Location::new(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }
}
