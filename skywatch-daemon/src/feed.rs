//! Live-position feed client (adsb.lol v2) and snapshot normalization.
//!
//! One GET per tick returns every aircraft within the query radius of the
//! airspace center; normalization filters to the watchlist and converts
//! feed units (feet, knots) to the core's meters and m/s.

use std::time::Duration;

use serde::Deserialize;

use skywatch_core::config::Watchlist;
use skywatch_core::types::{icao_from_hex, AircraftSnapshot, FT_TO_M, KTS_TO_MS};

/// Reports slower than this are treated as on the ground even when the
/// feed omits its ground marker.
const GROUND_SPEED_KTS: f64 = 30.0;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// One raw feed record, straight off the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAircraft {
    pub hex: String,
    #[serde(default)]
    pub flight: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub alt_baro: Option<AltBaro>,
    /// Ground speed, knots.
    #[serde(default)]
    pub gs: Option<f64>,
}

/// Barometric altitude field: numeric feet, or the literal "ground" marker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AltBaro {
    Feet(f64),
    Marker(String),
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    ac: Vec<RawAircraft>,
}

/// HTTP client for the position feed.
pub struct FeedClient {
    client: reqwest::Client,
    url: String,
}

impl FeedClient {
    pub fn new(center_lat: f64, center_lon: f64, radius_nm: f64) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(FeedClient {
            client,
            url: format!("https://api.adsb.lol/v2/lat/{center_lat}/lon/{center_lon}/dist/{radius_nm}"),
        })
    }

    /// Fetch every aircraft currently within the query radius.
    pub async fn fetch(&self) -> reqwest::Result<Vec<RawAircraft>> {
        let resp = self.client.get(&self.url).send().await?.error_for_status()?;
        let body: FeedResponse = resp.json().await?;
        Ok(body.ac)
    }
}

/// Convert one raw record into a normalized snapshot.
///
/// Returns `None` for aircraft outside the watchlist or records with an
/// unparseable hex identity. The callsign falls back to the configured
/// tail number when the feed carries none. A zero altitude reading maps
/// to unknown: the feed reports grounded aircraft with the ground marker,
/// so a literal 0 is noise.
pub fn normalize(raw: &RawAircraft, watchlist: &Watchlist) -> Option<AircraftSnapshot> {
    let icao = icao_from_hex(raw.hex.trim())?;
    if !watchlist.contains(&icao) {
        return None;
    }
    let tail = watchlist.tail_for(&icao)?;

    let callsign = raw
        .flight
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(tail)
        .to_string();

    let grounded = matches!(&raw.alt_baro, Some(AltBaro::Marker(m)) if m == "ground");
    let baro_altitude_m = match raw.alt_baro {
        Some(AltBaro::Feet(ft)) if ft != 0.0 => Some(ft * FT_TO_M),
        _ => None,
    };

    let gs_kts = raw.gs.unwrap_or(0.0);
    let velocity_ms = match raw.gs {
        Some(gs) if gs != 0.0 => Some(gs * KTS_TO_MS),
        _ => None,
    };

    Some(AircraftSnapshot {
        icao,
        callsign,
        latitude: raw.lat,
        longitude: raw.lon,
        baro_altitude_m,
        on_ground: grounded || gs_kts < GROUND_SPEED_KTS,
        velocity_ms,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
