// Great-circle distance on a spherical Earth.

use std::f64::consts::PI;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Degrees to radians. Zero maps to exactly `0.0`; unset coordinates are
/// commonly stored as zero.
pub fn to_radians(deg: f64) -> f64 {
    if deg == 0.0 {
        return 0.0;
    }
    deg * PI / 180.0
}

/// Distance in kilometres between two points, by the spherical law of
/// cosines. Always `>= 0`, and `0` for coincident points.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = to_radians(lat1);
    let phi2 = to_radians(lat2);
    let delta_lambda = to_radians(lon2 - lon1);

    let cos_angle = phi1.sin() * phi2.sin() + phi1.cos() * phi2.cos() * delta_lambda.cos();
    // Rounding can push the cosine just past +-1 for (near) coincident or
    // antipodal points, where acos would return NaN.
    EARTH_RADIUS_KM * cos_angle.clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE_KM: f64 = 1e-6;

    #[test]
    fn zero_degrees_is_exactly_zero_radians() {
        assert_eq!(to_radians(0.0), 0.0);
        assert!((to_radians(180.0) - PI).abs() < 1e-12);
        assert!((to_radians(-90.0) + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn coincident_points_are_zero_apart() {
        assert_eq!(distance_km(0.0, 0.0, 0.0, 0.0), 0.0);
        let d = distance_km(55.7558, 37.6173, 55.7558, 37.6173);
        assert!(!d.is_nan());
        assert!(d.abs() < 1e-3, "got {d}");
    }

    #[test]
    fn half_circumference_along_equator() {
        let d = distance_km(0.0, 0.0, 0.0, 180.0);
        assert!((d - EARTH_RADIUS_KM * PI).abs() < TOLERANCE_KM);
        assert!((d - 20015.0).abs() < 1.0, "got {d}");
    }

    #[test]
    fn pole_to_pole_is_half_circumference() {
        let d = distance_km(90.0, 0.0, -90.0, 0.0);
        assert!((d - EARTH_RADIUS_KM * PI).abs() < TOLERANCE_KM);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = distance_km(40.7128, -74.0060, 51.5074, -0.1278);
        let back = distance_km(51.5074, -0.1278, 40.7128, -74.0060);
        assert!((there - back).abs() < TOLERANCE_KM);
        // New York to London is roughly 5570 km.
        assert!((there - 5570.0).abs() < 10.0, "got {there}");
    }
}
