//! Shared types, error enum, and event types for skywatch-core.

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

/// All errors produced by skywatch-core.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("config error: {0}")]
    Config(String),
    #[error("invalid icao24 address: {0}")]
    InvalidIcao(String),
    #[error("invalid quiet hours time: {0}")]
    QuietHours(String),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WatchError>;

// ---------------------------------------------------------------------------
// ICAO address helpers
// ---------------------------------------------------------------------------

/// 3-byte ICAO 24-bit transponder address. Stored as raw bytes so state
/// tables can key on it without per-poll String allocation.
pub type Icao = [u8; 3];

/// Format ICAO address as 6-char uppercase hex string.
pub fn icao_to_string(icao: &Icao) -> String {
    format!("{:02X}{:02X}{:02X}", icao[0], icao[1], icao[2])
}

/// Parse a 6-char hex string into an ICAO address. Case-insensitive.
pub fn icao_from_hex(hex: &str) -> Option<Icao> {
    if hex.len() != 6 {
        return None;
    }
    let val = u32::from_str_radix(hex, 16).ok()?;
    Some([
        ((val >> 16) & 0xFF) as u8,
        ((val >> 8) & 0xFF) as u8,
        (val & 0xFF) as u8,
    ])
}

// ---------------------------------------------------------------------------
// Unit conversions
// ---------------------------------------------------------------------------

pub const FT_TO_M: f64 = 0.3048;
pub const M_TO_FT: f64 = 3.28084;
pub const KTS_TO_MS: f64 = 0.514444;
pub const MS_TO_KTS: f64 = 1.94384;

// ---------------------------------------------------------------------------
// Position snapshot (feed adapter output)
// ---------------------------------------------------------------------------

/// One normalized position report for a tracked aircraft, produced fresh
/// each poll by the feed adapter. Never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct AircraftSnapshot {
    pub icao: Icao,
    pub callsign: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Barometric altitude, meters MSL. `None` when the feed reports the
    /// ground marker or no altitude at all.
    pub baro_altitude_m: Option<f64>,
    pub on_ground: bool,
    /// Ground speed, meters per second.
    pub velocity_ms: Option<f64>,
}

// ---------------------------------------------------------------------------
// Alert thresholds
// ---------------------------------------------------------------------------

/// Identity of one configured alert distance, stored in tenths of a
/// nautical mile so it hashes and compares exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Threshold(u32);

impl Threshold {
    pub fn from_nm(nm: f64) -> Self {
        Threshold((nm * 10.0).round() as u32)
    }

    pub fn nm(self) -> f64 {
        self.0 as f64 / 10.0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}nm", self.nm())
    }
}

/// Per-aircraft set of thresholds already announced this approach cycle.
pub type ThresholdsSent = HashSet<Threshold>;

// ---------------------------------------------------------------------------
// Watch events (output)
// ---------------------------------------------------------------------------

/// Cooldown key space: one timer per aircraft per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Landing,
    Takeoff,
    Distance(Threshold),
}

/// Why a landing was inferred. Carried into the notification text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingReason {
    /// 10 → 5 → 2 nm crossed in order while airborne.
    SequentialApproach,
    /// Left the volume slow and at field elevation.
    Touchdown,
    /// Reported ground contact inside the volume after being airborne.
    GroundContact,
    /// Vanished from the feed while airborne inside the volume.
    SignalLostInAirspace,
    /// Left the volume, then vanished from the feed shortly after.
    LeftAirspaceSignalLost,
}

/// Events emitted by the watcher. Each one has already passed the cooldown
/// gate; the caller applies quiet hours and delivers to webhooks.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchEvent {
    pub icao: Icao,
    pub callsign: String,
    pub kind: WatchEventKind,
    pub timestamp: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WatchEventKind {
    Approach {
        threshold: Threshold,
        distance_nm: f64,
        eta_min: u32,
        altitude_agl_ft: f64,
    },
    Landing {
        reason: LandingReason,
    },
    Takeoff {
        distance_nm: f64,
    },
}

impl WatchEvent {
    /// The cooldown key this event was gated under.
    pub fn kind_key(&self) -> EventKind {
        match &self.kind {
            WatchEventKind::Approach { threshold, .. } => EventKind::Distance(*threshold),
            WatchEventKind::Landing { .. } => EventKind::Landing,
            WatchEventKind::Takeoff { .. } => EventKind::Takeoff,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icao_roundtrip() {
        let icao = icao_from_hex("a1b2c3").unwrap();
        assert_eq!(icao, [0xA1, 0xB2, 0xC3]);
        assert_eq!(icao_to_string(&icao), "A1B2C3");
    }

    #[test]
    fn test_icao_rejects_bad_input() {
        assert!(icao_from_hex("a1b2").is_none()); // too short
        assert!(icao_from_hex("a1b2c3d4").is_none()); // too long
        assert!(icao_from_hex("zzzzzz").is_none()); // not hex
    }

    #[test]
    fn test_threshold_exact_identity() {
        assert_eq!(Threshold::from_nm(10.0), Threshold::from_nm(10.0));
        assert_ne!(Threshold::from_nm(10.0), Threshold::from_nm(5.0));
        assert_eq!(Threshold::from_nm(2.0).nm(), 2.0);
    }

    #[test]
    fn test_threshold_label() {
        assert_eq!(Threshold::from_nm(10.0).to_string(), "10.0nm");
        assert_eq!(Threshold::from_nm(2.5).to_string(), "2.5nm");
    }

    #[test]
    fn test_event_kind_key() {
        let ev = WatchEvent {
            icao: [1, 2, 3],
            callsign: "N12345".into(),
            kind: WatchEventKind::Landing {
                reason: LandingReason::GroundContact,
            },
            timestamp: 0.0,
        };
        assert_eq!(ev.kind_key(), EventKind::Landing);
    }
}
