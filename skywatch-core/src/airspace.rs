//! Monitored airspace volume — a cylinder over the field.
//!
//! Horizontal containment is a radius test around the center point;
//! vertical containment is an AGL band derived from barometric altitude
//! and the field elevation.

use serde::Deserialize;

use crate::geo;
use crate::types::{AircraftSnapshot, M_TO_FT};

/// The 3-D volume being watched, straight from the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct Airspace {
    pub center_lat: f64,
    pub center_lon: f64,
    pub radius_nm: f64,
    #[serde(default)]
    pub floor_ft_agl: f64,
    #[serde(default = "default_ceiling")]
    pub ceiling_ft_agl: f64,
    #[serde(default)]
    pub field_elevation_ft_msl: f64,
}

fn default_ceiling() -> f64 {
    3000.0
}

/// One snapshot evaluated against the volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub distance_nm: f64,
    /// Zero when the snapshot carries no altitude.
    pub altitude_msl_ft: f64,
    /// Zero when the snapshot carries no altitude.
    pub altitude_agl_ft: f64,
    pub in_airspace: bool,
}

impl Airspace {
    /// Evaluate a snapshot against the volume.
    ///
    /// When altitude is unknown the vertical test falls back to the feed's
    /// ground-contact flag: a grounded aircraft with no altitude report is
    /// treated as vertically inside, an airborne one is not.
    pub fn evaluate(&self, lat: f64, lon: f64, snap: &AircraftSnapshot) -> Fix {
        let distance_nm = geo::distance_nm(self.center_lat, self.center_lon, lat, lon);
        let in_horizontal = distance_nm <= self.radius_nm;

        let (altitude_msl_ft, altitude_agl_ft, in_vertical) = match snap.baro_altitude_m {
            Some(alt_m) => {
                let msl = alt_m * M_TO_FT;
                let agl = msl - self.field_elevation_ft_msl;
                (
                    msl,
                    agl,
                    self.floor_ft_agl <= agl && agl <= self.ceiling_ft_agl,
                )
            }
            None => (0.0, 0.0, snap.on_ground),
        };

        Fix {
            distance_nm,
            altitude_msl_ft,
            altitude_agl_ft,
            in_airspace: in_horizontal && in_vertical,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FT_TO_M;

    fn test_airspace() -> Airspace {
        Airspace {
            center_lat: 35.0,
            center_lon: -82.0,
            radius_nm: 5.0,
            floor_ft_agl: 0.0,
            ceiling_ft_agl: 3000.0,
            field_elevation_ft_msl: 2000.0,
        }
    }

    fn snap(alt_ft_msl: Option<f64>, on_ground: bool) -> AircraftSnapshot {
        AircraftSnapshot {
            icao: [0xA1, 0xB2, 0xC3],
            callsign: "N12345".into(),
            latitude: Some(35.0),
            longitude: Some(-82.0),
            baro_altitude_m: alt_ft_msl.map(|ft| ft * FT_TO_M),
            on_ground,
            velocity_ms: Some(60.0),
        }
    }

    #[test]
    fn test_inside_volume() {
        let a = test_airspace();
        // 2nm north, 1000ft AGL
        let fix = a.evaluate(35.0 + 2.0 / 60.0, -82.0, &snap(Some(3000.0), false));
        assert!(fix.in_airspace);
        assert!((fix.distance_nm - 2.0).abs() < 0.05);
        assert!((fix.altitude_agl_ft - 1000.0).abs() < 1.0);
    }

    #[test]
    fn test_outside_horizontal() {
        let a = test_airspace();
        let fix = a.evaluate(35.0 + 8.0 / 60.0, -82.0, &snap(Some(3000.0), false));
        assert!(!fix.in_airspace);
        assert!(fix.distance_nm > 5.0);
    }

    #[test]
    fn test_above_ceiling() {
        let a = test_airspace();
        // 6000ft MSL = 4000ft AGL, above the 3000ft ceiling
        let fix = a.evaluate(35.0, -82.0, &snap(Some(6000.0), false));
        assert!(!fix.in_airspace);
        assert!((fix.altitude_agl_ft - 4000.0).abs() < 1.0);
    }

    #[test]
    fn test_unknown_altitude_grounded_is_inside() {
        let a = test_airspace();
        let fix = a.evaluate(35.0, -82.0, &snap(None, true));
        assert!(fix.in_airspace);
        assert_eq!(fix.altitude_agl_ft, 0.0);
    }

    #[test]
    fn test_unknown_altitude_airborne_is_outside() {
        let a = test_airspace();
        let fix = a.evaluate(35.0, -82.0, &snap(None, false));
        assert!(!fix.in_airspace);
    }

    #[test]
    fn test_config_defaults() {
        let a: Airspace = serde_json::from_str(
            r#"{"center_lat": 35.0, "center_lon": -82.0, "radius_nm": 5.0}"#,
        )
        .unwrap();
        assert_eq!(a.floor_ft_agl, 0.0);
        assert_eq!(a.ceiling_ft_agl, 3000.0);
        assert_eq!(a.field_elevation_ft_msl, 0.0);
    }
}
