//! Great-circle geometry.

/// Mean Earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Haversine great-circle distance between two lat/lon points, in
/// nautical miles. Pure, no failure modes.
pub fn distance_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    EARTH_RADIUS_NM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        assert!(distance_nm(35.0, -82.0, 35.0, -82.0) < 1e-9);
        assert!(distance_nm(-45.0, 170.0, -45.0, 170.0) < 1e-9);
    }

    #[test]
    fn test_symmetric() {
        let d1 = distance_nm(35.4362, -82.5418, 35.2140, -80.9431);
        let d2 = distance_nm(35.2140, -80.9431, 35.4362, -82.5418);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn test_known_distance() {
        // Asheville to Charlotte: ~96nm
        let d = distance_nm(35.4362, -82.5418, 35.2140, -80.9431);
        assert!(d > 70.0 && d < 120.0, "AVL-CLT should be ~96nm, got {d}");
    }

    #[test]
    fn test_one_minute_of_latitude() {
        // One minute of latitude is one nautical mile by definition.
        let d = distance_nm(35.0, -82.0, 35.0 + 1.0 / 60.0, -82.0);
        assert!((d - 1.0).abs() < 0.01, "got {d}");
    }
}
