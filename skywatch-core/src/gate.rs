//! Notification gating — per-(aircraft, kind) cooldown plus quiet hours.
//!
//! The cooldown gate is always consulted first and consumes the attempt
//! whether or not the caller ultimately delivers; quiet hours suppress
//! delivery downstream without touching gate state.

use std::collections::HashMap;

use chrono::NaiveTime;

use crate::types::{EventKind, Icao, WatchError};

/// Default minimum gap between two notifications of the same kind for the
/// same aircraft, in minutes.
pub const DEFAULT_COOLDOWN_MINUTES: f64 = 2.0;

/// Stateful cooldown gate. Timestamps are f64 epoch seconds supplied by
/// the caller, which keeps the gate deterministic under test.
#[derive(Debug)]
pub struct NotificationGate {
    cooldown_secs: f64,
    last_attempt: HashMap<(Icao, EventKind), f64>,
}

impl NotificationGate {
    pub fn new(cooldown_minutes: f64) -> Self {
        NotificationGate {
            cooldown_secs: cooldown_minutes * 60.0,
            last_attempt: HashMap::new(),
        }
    }

    /// True iff no attempt for this key is on record, or the prior attempt
    /// is older than the cooldown window. A true result records the attempt;
    /// a suppressed attempt does NOT reset the timer.
    pub fn should_notify(&mut self, icao: Icao, kind: EventKind, now: f64) -> bool {
        if let Some(&prev) = self.last_attempt.get(&(icao, kind)) {
            if now - prev < self.cooldown_secs {
                return false;
            }
        }
        self.last_attempt.insert((icao, kind), now);
        true
    }
}

// ---------------------------------------------------------------------------
// Quiet hours
// ---------------------------------------------------------------------------

/// Configured local-time window during which notifications are computed
/// (and their cooldown slots consumed) but not delivered. `start > end`
/// means the window spans midnight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuietHours {
    pub enabled: bool,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl QuietHours {
    /// Always-off window.
    pub fn disabled() -> Self {
        QuietHours {
            enabled: false,
            start: NaiveTime::MIN,
            end: NaiveTime::MIN,
        }
    }

    /// Parse "HH:MM" bounds from config.
    pub fn parse(enabled: bool, start: &str, end: &str) -> Result<Self, WatchError> {
        let parse = |s: &str| {
            NaiveTime::parse_from_str(s, "%H:%M")
                .map_err(|_| WatchError::QuietHours(s.to_string()))
        };
        Ok(QuietHours {
            enabled,
            start: parse(start)?,
            end: parse(end)?,
        })
    }

    /// True if `now` falls in the half-open window `[start, end)`.
    pub fn is_quiet(&self, now: NaiveTime) -> bool {
        if !self.enabled {
            return false;
        }
        if self.start <= self.end {
            self.start <= now && now < self.end
        } else {
            // Overnight wraparound
            now >= self.start || now < self.end
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const ICAO: Icao = [0xA1, 0xB2, 0xC3];

    #[test]
    fn test_first_attempt_passes() {
        let mut gate = NotificationGate::new(2.0);
        assert!(gate.should_notify(ICAO, EventKind::Landing, 1000.0));
    }

    #[test]
    fn test_second_attempt_within_window_suppressed() {
        let mut gate = NotificationGate::new(2.0);
        assert!(gate.should_notify(ICAO, EventKind::Landing, 1000.0));
        assert!(!gate.should_notify(ICAO, EventKind::Landing, 1060.0));
    }

    #[test]
    fn test_attempt_after_window_passes() {
        let mut gate = NotificationGate::new(2.0);
        assert!(gate.should_notify(ICAO, EventKind::Landing, 1000.0));
        assert!(gate.should_notify(ICAO, EventKind::Landing, 1121.0));
    }

    #[test]
    fn test_suppressed_attempt_does_not_reset_timer() {
        let mut gate = NotificationGate::new(2.0);
        assert!(gate.should_notify(ICAO, EventKind::Landing, 1000.0));
        // Suppressed attempts at 60s and 119s must not extend the window.
        assert!(!gate.should_notify(ICAO, EventKind::Landing, 1060.0));
        assert!(!gate.should_notify(ICAO, EventKind::Landing, 1119.0));
        assert!(gate.should_notify(ICAO, EventKind::Landing, 1121.0));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut gate = NotificationGate::new(2.0);
        let other: Icao = [0x01, 0x02, 0x03];
        assert!(gate.should_notify(ICAO, EventKind::Landing, 1000.0));
        assert!(gate.should_notify(ICAO, EventKind::Takeoff, 1000.0));
        assert!(gate.should_notify(other, EventKind::Landing, 1000.0));
        assert!(!gate.should_notify(ICAO, EventKind::Landing, 1001.0));
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_quiet_hours_overnight() {
        let q = QuietHours::parse(true, "23:00", "06:00").unwrap();
        assert!(q.is_quiet(hm(2, 0)));
        assert!(q.is_quiet(hm(23, 30)));
        assert!(!q.is_quiet(hm(12, 0)));
        assert!(!q.is_quiet(hm(6, 0))); // end is exclusive
        assert!(q.is_quiet(hm(23, 0))); // start is inclusive
    }

    #[test]
    fn test_quiet_hours_same_day() {
        let q = QuietHours::parse(true, "13:00", "14:00").unwrap();
        assert!(q.is_quiet(hm(13, 30)));
        assert!(!q.is_quiet(hm(14, 0)));
        assert!(!q.is_quiet(hm(12, 59)));
    }

    #[test]
    fn test_quiet_hours_disabled() {
        let q = QuietHours::parse(false, "23:00", "06:00").unwrap();
        assert!(!q.is_quiet(hm(2, 0)));
        assert!(!QuietHours::disabled().is_quiet(hm(2, 0)));
    }

    #[test]
    fn test_quiet_hours_bad_time_rejected() {
        assert!(QuietHours::parse(true, "25:00", "06:00").is_err());
        assert!(QuietHours::parse(true, "23:00", "six").is_err());
    }
}
