//! Angles and ground geometry

/// Meters per degree of latitude
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Linear blend
#[must_use]
pub fn lerp(a: f64, b: f64, ratio: f64) -> f64 {
    a + (b - a) * ratio
}

/// Blend two compass angles along the shorter arc; result in `[0, 360)`
#[must_use]
pub fn lerp_angle(a: f64, b: f64, ratio: f64) -> f64 {
    let diff = (b - a + 540.0).rem_euclid(360.0) - 180.0;
    (a + diff * ratio + 360.0).rem_euclid(360.0)
}

/// Ground segment `[[lon, lat], [lon, lat]]` from the object to the shadow tip.
///
/// `direction` is a compass bearing (0° north, 90° east). Degenerate input
/// (non-finite or non-positive length, non-finite direction) has no segment.
#[must_use]
pub fn shadow_endpoint(lat: f64, lon: f64, length: f64, direction: f64) -> Option<[[f64; 2]; 2]> {
    if !length.is_finite() || length <= 0.0 || !direction.is_finite() {
        return None;
    }

    let bearing = direction.to_radians();
    let north = length * bearing.cos();
    let east = length * bearing.sin();

    let end_lat = lat + north / METERS_PER_DEGREE;
    let end_lon = lon + east / (METERS_PER_DEGREE * lat.to_radians().cos());

    if !end_lat.is_finite() || !end_lon.is_finite() {
        return None;
    }
    Some([[lon, lat], [end_lon, end_lat]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lerp_angle_wraps_through_north() {
        assert!((lerp_angle(350.0, 10.0, 0.5) - 0.0).abs() < 1e-9);
        assert!((lerp_angle(10.0, 350.0, 0.25) - 5.0).abs() < 1e-9);
        assert!((lerp_angle(90.0, 180.0, 0.5) - 135.0).abs() < 1e-9);
    }

    #[test]
    fn test_shadow_endpoint_north_and_east() {
        let [start, north] = shadow_endpoint(37.5, 127.0, 111_320.0, 0.0).unwrap();
        assert_eq!(start, [127.0, 37.5]);
        assert!((north[1] - 38.5).abs() < 1e-9);
        assert!((north[0] - 127.0).abs() < 1e-9);

        let [_, east] = shadow_endpoint(0.0, 0.0, 111_320.0, 90.0).unwrap();
        assert!((east[0] - 1.0).abs() < 1e-9);
        assert!(east[1].abs() < 1e-9);
    }

    #[test]
    fn test_shadow_endpoint_rejects_degenerate() {
        assert!(shadow_endpoint(37.5, 127.0, 0.0, 180.0).is_none());
        assert!(shadow_endpoint(37.5, 127.0, -3.0, 180.0).is_none());
        assert!(shadow_endpoint(37.5, 127.0, f64::INFINITY, 180.0).is_none());
        assert!(shadow_endpoint(37.5, 127.0, 10.0, f64::NAN).is_none());
    }

    proptest! {
        #[test]
        fn lerp_angle_stays_in_range(a in 0.0f64..360.0, b in 0.0f64..360.0, r in 0.0f64..=1.0) {
            let v = lerp_angle(a, b, r);
            prop_assert!((0.0..360.0).contains(&v));
        }

        #[test]
        fn lerp_angle_hits_endpoints(a in 0.0f64..360.0, b in 0.0f64..360.0) {
            prop_assert!((lerp_angle(a, b, 0.0) - a).abs() < 1e-9);
            let end = lerp_angle(a, b, 1.0);
            let gap = (end - b).abs();
            prop_assert!(gap < 1e-9 || (gap - 360.0).abs() < 1e-9);
        }
    }
}
