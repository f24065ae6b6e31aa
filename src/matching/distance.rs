//! Great-circle distance.

use crate::registry::GeoPoint;

/// Mean Earth radius used for every distance in the crate.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two points on a sphere of
/// radius [`EARTH_RADIUS_KM`].
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());
    let sin_dlat = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon = ((lon2 - lon1) * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    // Rounding can push h a hair above 1 for antipodal points.
    2.0 * EARTH_RADIUS_KM * h.min(1.0).sqrt().asin()
}

/// Round a distance to two decimals for reporting.
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELHI: GeoPoint = GeoPoint { lat: 28.6139, lon: 77.2090 };
    const MUMBAI: GeoPoint = GeoPoint { lat: 19.0760, lon: 72.8777 };

    #[test]
    fn test_identity_is_zero() {
        assert_eq!(haversine_km(DELHI, DELHI), 0.0);
        assert_eq!(haversine_km(GeoPoint::new(-90.0, 180.0), GeoPoint::new(-90.0, 180.0)), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let points = [
            DELHI,
            MUMBAI,
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(-33.8688, 151.2093),
            GeoPoint::new(89.9, -179.9),
            GeoPoint::new(-45.0, 45.0),
        ];
        for a in points {
            for b in points {
                let ab = haversine_km(a, b);
                let ba = haversine_km(b, a);
                assert!((ab - ba).abs() < 1e-9, "{a:?} {b:?}: {ab} vs {ba}");
            }
        }
    }

    #[test]
    fn test_known_distances() {
        // Delhi to Mumbai is roughly 1150 km
        let d = haversine_km(DELHI, MUMBAI);
        assert!((d - 1148.1).abs() < 2.0, "got {d}");

        // One degree of latitude along a meridian
        let d = haversine_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0));
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_antipodal_points() {
        let d = haversine_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_round_km() {
        assert_eq!(round_km(1.23456), 1.23);
        assert_eq!(round_km(2.999), 3.0);
        assert_eq!(round_km(0.0), 0.0);
    }
}
