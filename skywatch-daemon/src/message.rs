//! Notification message text, one block per event kind.
//!
//! Markdown bold renders natively on Discord and acceptably on Slack and
//! Teams, so a single text form serves all channels.

use skywatch_core::types::{LandingReason, WatchEvent, WatchEventKind};

/// Render an event as webhook text. `clock` is the local wall time as
/// "HH:MM", passed in so rendering stays deterministic under test.
pub fn render(event: &WatchEvent, clock: &str) -> String {
    let callsign = &event.callsign;
    match &event.kind {
        WatchEventKind::Approach {
            threshold,
            eta_min,
            altitude_agl_ft,
            ..
        } => format!(
            "**{callsign} - {:.0}nm out**\nETA ~{eta_min}min, Alt {altitude_agl_ft:.0}ft AGL",
            threshold.nm()
        ),
        WatchEventKind::Landing { reason } => {
            let (verb, note) = match reason {
                LandingReason::SequentialApproach => ("LANDING", Some("(Sequential approach)")),
                LandingReason::Touchdown | LandingReason::GroundContact => ("LANDED", None),
                LandingReason::SignalLostInAirspace => {
                    ("LANDED", Some("(Signal lost in airspace)"))
                }
                LandingReason::LeftAirspaceSignalLost => {
                    ("LANDED", Some("(Left airspace then signal lost)"))
                }
            };
            let mut text = format!("**{callsign} {verb}**\nTime: {clock}\nReady to put away");
            if let Some(note) = note {
                text.push('\n');
                text.push_str(note);
            }
            text
        }
        WatchEventKind::Takeoff { distance_nm } => format!(
            "**{callsign} DEPARTED**\nTime: {clock}\nClimbing out at {distance_nm:.1}nm"
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
