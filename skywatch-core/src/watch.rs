//! Per-aircraft watch state machine.
//!
//! Pure logic — no I/O, no clocks. The caller feeds one snapshot (or
//! absence) per aircraft per poll tick together with an epoch timestamp;
//! the watcher mutates persistent per-aircraft state and returns
//! notification events that have already passed the cooldown gate. The
//! caller applies quiet hours and delivers to webhooks.

use std::collections::{HashMap, HashSet};

use crate::airspace::{Airspace, Fix};
use crate::gate::NotificationGate;
use crate::types::{
    AircraftSnapshot, EventKind, Icao, LandingReason, Threshold, ThresholdsSent, WatchEvent,
    WatchEventKind, MS_TO_KTS,
};

/// Beyond this distance the aircraft has fully departed the monitored
/// shell: the per-cycle alert set clears and the high-water mark re-pins.
pub const DEPARTURE_RESET_NM: f64 = 12.0;

/// Fixed approach-speed heuristic for ETA text, nm per minute (90 kt).
const APPROACH_RATE_NM_PER_MIN: f64 = 1.5;

/// Below this ground speed an aircraft leaving the volume is judged to be
/// rolling out rather than departing.
const LANDING_SPEED_KTS: f64 = 60.0;

/// MSL band around field elevation treated as "at ground level".
const LANDING_ALT_BAND_FT: f64 = 200.0;

/// Consecutive absent ticks before an in-airspace aircraft is presumed down.
const SIGNAL_LOST_TICKS: u32 = 2;

/// Window after leaving the volume during which signal loss implies landing.
const LEFT_AIRSPACE_WINDOW_SECS: f64 = 300.0;

// ---------------------------------------------------------------------------
// Aircraft state
// ---------------------------------------------------------------------------

/// Persistent state for one watched aircraft, first sighting to deletion.
#[derive(Debug, Clone)]
pub struct AircraftState {
    pub callsign: String,
    pub in_airspace: bool,
    pub on_ground: bool,
    pub last_distance_nm: Option<f64>,
    /// High-water distance since the last full-departure reset.
    pub max_distance_nm: Option<f64>,
    /// Sticky: suppresses further landing events until a takeoff clears it.
    pub landed: bool,
    /// Set once, the instant the aircraft was first seen leaving the volume
    /// while airborne. Cleared on takeoff.
    pub left_airspace_time: Option<f64>,
    pub consecutive_missing: u32,
    pub last_update: f64,
}

impl AircraftState {
    fn new(callsign: &str, now: f64) -> Self {
        AircraftState {
            callsign: callsign.to_string(),
            in_airspace: false,
            on_ground: false,
            last_distance_nm: None,
            max_distance_nm: None,
            landed: false,
            left_airspace_time: None,
            consecutive_missing: 0,
            last_update: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Watcher
// ---------------------------------------------------------------------------

/// Tracks the full watchlist: owns the per-aircraft state table, the
/// per-approach alert set, and the notification cooldown gate.
pub struct Watcher {
    airspace: Airspace,
    /// Alert distances, sorted descending; the last entry is the innermost.
    thresholds: Vec<Threshold>,
    gate: NotificationGate,
    aircraft: HashMap<Icao, AircraftState>,
    alerts_sent: HashMap<Icao, ThresholdsSent>,
}

impl Watcher {
    pub fn new(airspace: Airspace, alert_distances_nm: &[f64], cooldown_minutes: f64) -> Self {
        let mut thresholds: Vec<Threshold> = alert_distances_nm
            .iter()
            .map(|&d| Threshold::from_nm(d))
            .collect();
        thresholds.sort();
        thresholds.reverse();
        Watcher {
            airspace,
            thresholds,
            gate: NotificationGate::new(cooldown_minutes),
            aircraft: HashMap::new(),
            alerts_sent: HashMap::new(),
        }
    }

    /// Last-known state for one aircraft, if it is currently tracked.
    pub fn state(&self, icao: &Icao) -> Option<&AircraftState> {
        self.aircraft.get(icao)
    }

    pub fn tracked(&self) -> usize {
        self.aircraft.len()
    }

    /// Consume one position snapshot. Returns gate-passed events.
    ///
    /// A snapshot without a position is a no-op for this tick: the aircraft
    /// neither advances its state nor counts as missing.
    pub fn observe(&mut self, snap: &AircraftSnapshot, now: f64) -> Vec<WatchEvent> {
        let (lat, lon) = match (snap.latitude, snap.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Vec::new(),
        };
        let fix = self.airspace.evaluate(lat, lon, snap);

        // Edge-triggered logic keys off the prior tick's booleans. A first
        // sighting has no prior ground state at all.
        let was_in_airspace = self
            .aircraft
            .get(&snap.icao)
            .map(|s| s.in_airspace)
            .unwrap_or(false);
        let was_on_ground: Option<bool> = self.aircraft.get(&snap.icao).map(|s| s.on_ground);

        let mut st = self
            .aircraft
            .remove(&snap.icao)
            .unwrap_or_else(|| AircraftState::new(&snap.callsign, now));
        st.callsign = snap.callsign.clone();
        let mut sent = self.alerts_sent.remove(&snap.icao).unwrap_or_default();

        let mut events = Vec::new();

        // Distance-threshold alerting, only while airborne.
        if !snap.on_ground {
            self.check_thresholds(snap, &fix, &mut st, &mut sent, now, &mut events);
        }

        if was_in_airspace && was_on_ground != Some(true) && !fix.in_airspace {
            // Left the volume while airborne. Record the departure instant
            // once; slow and at field elevation means it just touched down
            // below the radio horizon.
            if st.left_airspace_time.is_none() && !st.landed {
                st.left_airspace_time = Some(now);
                let speed_kts = snap.velocity_ms.unwrap_or(0.0) * MS_TO_KTS;
                let at_field_level = (fix.altitude_msl_ft
                    - self.airspace.field_elevation_ft_msl)
                    .abs()
                    < LANDING_ALT_BAND_FT;
                if at_field_level
                    && speed_kts < LANDING_SPEED_KTS
                    && self.gate.should_notify(snap.icao, EventKind::Landing, now)
                {
                    events.push(landing(snap.icao, &st.callsign, LandingReason::Touchdown, now));
                    st.landed = true;
                }
            }
        } else if fix.in_airspace && snap.on_ground && was_on_ground == Some(false) {
            // Direct ground contact after being airborne inside the volume.
            if !st.landed && self.gate.should_notify(snap.icao, EventKind::Landing, now) {
                events.push(landing(
                    snap.icao,
                    &st.callsign,
                    LandingReason::GroundContact,
                    now,
                ));
                st.landed = true;
            }
        }

        st.in_airspace = fix.in_airspace;
        st.on_ground = snap.on_ground;
        st.last_update = now;
        st.consecutive_missing = 0;

        // Takeoff re-arm: the only path that un-sticks `landed`.
        if fix.in_airspace && !snap.on_ground && was_on_ground == Some(true) {
            sent.clear();
            st.landed = false;
            st.max_distance_nm = Some(fix.distance_nm);
            st.left_airspace_time = None;
            if self.gate.should_notify(snap.icao, EventKind::Takeoff, now) {
                events.push(WatchEvent {
                    icao: snap.icao,
                    callsign: st.callsign.clone(),
                    kind: WatchEventKind::Takeoff {
                        distance_nm: fix.distance_nm,
                    },
                    timestamp: now,
                });
            }
        }

        self.alerts_sent.insert(snap.icao, sent);
        self.aircraft.insert(snap.icao, st);
        events
    }

    fn check_thresholds(
        &mut self,
        snap: &AircraftSnapshot,
        fix: &Fix,
        st: &mut AircraftState,
        sent: &mut ThresholdsSent,
        now: f64,
        events: &mut Vec<WatchEvent>,
    ) {
        let prev_distance = st.last_distance_nm;
        let mut max_distance = st.max_distance_nm;
        if max_distance.map_or(true, |m| fix.distance_nm > m) {
            max_distance = Some(fix.distance_nm);
        }

        // A crossing only counts against a prior tick's distance, and only
        // when the high-water mark proves the aircraft was genuinely beyond
        // the threshold. Cold starts with no prior distance announce nothing.
        if let (Some(prev), Some(max)) = (prev_distance, max_distance) {
            for i in 0..self.thresholds.len() {
                let th = self.thresholds[i];
                let crossed = prev > th.nm() && fix.distance_nm <= th.nm();
                if !crossed || max <= th.nm() || sent.contains(&th) {
                    continue;
                }

                let innermost = i + 1 == self.thresholds.len();
                let outer_confirmed =
                    i > 0 && self.thresholds[..i].iter().all(|t| sent.contains(t));

                if innermost && outer_confirmed {
                    // Sequential approach: every outer ring was announced,
                    // so the final crossing is the landing call.
                    if self.gate.should_notify(snap.icao, EventKind::Landing, now) && !st.landed
                    {
                        events.push(landing(
                            snap.icao,
                            &st.callsign,
                            LandingReason::SequentialApproach,
                            now,
                        ));
                        st.landed = true;
                        sent.insert(th);
                    }
                } else if self
                    .gate
                    .should_notify(snap.icao, EventKind::Distance(th), now)
                {
                    let eta_min = (fix.distance_nm / APPROACH_RATE_NM_PER_MIN) as u32;
                    events.push(WatchEvent {
                        icao: snap.icao,
                        callsign: st.callsign.clone(),
                        kind: WatchEventKind::Approach {
                            threshold: th,
                            distance_nm: fix.distance_nm,
                            eta_min,
                            altitude_agl_ft: fix.altitude_agl_ft,
                        },
                        timestamp: now,
                    });
                    sent.insert(th);
                }
            }
        }

        // Full departure: treat any later return as a fresh approach cycle.
        if fix.distance_nm > DEPARTURE_RESET_NM {
            sent.clear();
            max_distance = Some(fix.distance_nm);
        }

        st.last_distance_nm = Some(fix.distance_nm);
        st.max_distance_nm = max_distance;
    }

    /// Run missing-aircraft inference over every tracked aircraft absent
    /// from this tick's snapshot set. Returns gate-passed events.
    pub fn sweep_missing(&mut self, seen: &HashSet<Icao>, now: f64) -> Vec<WatchEvent> {
        let mut events = Vec::new();
        let absent: Vec<Icao> = self
            .aircraft
            .keys()
            .filter(|icao| !seen.contains(*icao))
            .copied()
            .collect();

        for icao in absent {
            let Some(mut st) = self.aircraft.remove(&icao) else {
                continue;
            };
            st.consecutive_missing += 1;

            let recently_left = st
                .left_airspace_time
                .map_or(false, |t| now - t < LEFT_AIRSPACE_WINDOW_SECS);

            if st.in_airspace && !st.on_ground && st.consecutive_missing >= SIGNAL_LOST_TICKS {
                // Airborne inside the volume and gone from the feed for two
                // ticks: presume it landed below coverage. State is dropped.
                if !st.landed && self.gate.should_notify(icao, EventKind::Landing, now) {
                    events.push(landing(
                        icao,
                        &st.callsign,
                        LandingReason::SignalLostInAirspace,
                        now,
                    ));
                }
            } else if recently_left && !st.on_ground {
                // Left the volume moments ago and vanished: same inference,
                // one missing tick is enough.
                if !st.landed && self.gate.should_notify(icao, EventKind::Landing, now) {
                    events.push(landing(
                        icao,
                        &st.callsign,
                        LandingReason::LeftAirspaceSignalLost,
                        now,
                    ));
                }
            } else {
                // Transient feed gap: retain with the incremented count.
                self.aircraft.insert(icao, st);
            }
        }
        events
    }
}

fn landing(icao: Icao, callsign: &str, reason: LandingReason, now: f64) -> WatchEvent {
    WatchEvent {
        icao,
        callsign: callsign.to_string(),
        kind: WatchEventKind::Landing { reason },
        timestamp: now,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
