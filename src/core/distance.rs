use crate::models::GeoPoint;

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers
#[inline]
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Whether two points lie within `radius_km` of each other
#[inline]
pub fn within_radius(a: &GeoPoint, b: &GeoPoint, radius_km: f64) -> bool {
    haversine_distance(a, b) <= radius_km
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(latitude: f64, longitude: f64) -> GeoPoint {
        GeoPoint { latitude, longitude }
    }

    #[test]
    fn test_haversine_distance() {
        // London to Paris is approximately 344 km
        let london = point(51.5074, -0.1278);
        let paris = point(48.8566, 2.3522);

        let distance = haversine_distance(&london, &paris);
        assert!((distance - 344.0).abs() < 5.0, "Distance should be ~344km");
    }

    #[test]
    fn test_haversine_same_point() {
        let p = point(40.7128, -74.0060);
        assert!(haversine_distance(&p, &p) < 0.001);
    }

    #[test]
    fn test_within_radius() {
        let manhattan = point(40.7580, -73.9855);
        let brooklyn = point(40.6782, -73.9442);
        let boston = point(42.3601, -71.0589);

        assert!(within_radius(&manhattan, &brooklyn, 15.0));
        assert!(!within_radius(&manhattan, &boston, 15.0));
    }
}
