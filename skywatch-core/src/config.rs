//! Static JSON configuration — watchlist, airspace volume, alert
//! thresholds, monitoring cadence, and notification policy.
//!
//! Configuration errors are fatal: the daemon validates everything up
//! front and refuses to start on a bad file.

use std::path::Path;

use serde::Deserialize;

use crate::airspace::Airspace;
use crate::gate::{QuietHours, DEFAULT_COOLDOWN_MINUTES};
use crate::types::{icao_from_hex, Icao, Result, WatchError};

/// Full configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub aircraft: WatchlistConfig,
    pub airspace: AirspaceConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub integrations: IntegrationsConfig,
}

/// Parallel arrays of tail numbers and icao24 hex codes.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchlistConfig {
    #[serde(default)]
    pub tail_numbers: Vec<String>,
    pub icao24_codes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirspaceConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub volume: Airspace,
    #[serde(default = "default_alert_distances")]
    pub alert_distances_nm: Vec<f64>,
    /// Feed query radius. Defaults to the widest alert distance plus a
    /// 5nm margin.
    #[serde(default)]
    pub query_radius_nm: Option<f64>,
}

fn default_alert_distances() -> Vec<f64> {
    vec![10.0, 5.0, 2.0]
}

impl AirspaceConfig {
    pub fn query_radius_nm(&self) -> f64 {
        self.query_radius_nm.unwrap_or_else(|| {
            self.alert_distances_nm
                .iter()
                .fold(f64::NEG_INFINITY, |m, &d| m.max(d))
                + 5.0
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
}

fn default_poll_interval() -> u64 {
    10
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        MonitoringConfig {
            poll_interval_seconds: default_poll_interval(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_cooldown_minutes")]
    pub cooldown_minutes: f64,
    #[serde(default)]
    pub quiet_hours: QuietHoursConfig,
}

fn default_cooldown_minutes() -> f64 {
    DEFAULT_COOLDOWN_MINUTES
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        NotificationsConfig {
            cooldown_minutes: default_cooldown_minutes(),
            quiet_hours: QuietHoursConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuietHoursConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_quiet_start")]
    pub start: String,
    #[serde(default = "default_quiet_end")]
    pub end: String,
}

fn default_quiet_start() -> String {
    "23:00".into()
}

fn default_quiet_end() -> String {
    "06:00".into()
}

impl Default for QuietHoursConfig {
    fn default() -> Self {
        QuietHoursConfig {
            enabled: false,
            start: default_quiet_start(),
            end: default_quiet_end(),
        }
    }
}

impl QuietHoursConfig {
    pub fn to_quiet_hours(&self) -> Result<QuietHours> {
        QuietHours::parse(self.enabled, &self.start, &self.end)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntegrationsConfig {
    #[serde(default)]
    pub discord: ChannelConfig,
    #[serde(default)]
    pub slack: ChannelConfig,
    #[serde(default)]
    pub teams: ChannelConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub webhook_url: String,
}

impl ChannelConfig {
    pub fn url(&self) -> Option<&str> {
        if self.enabled && !self.webhook_url.is_empty() {
            Some(&self.webhook_url)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Resolved watchlist
// ---------------------------------------------------------------------------

/// The watchlist with icao24 codes parsed and paired with tail numbers.
/// A missing tail number falls back to the hex code.
#[derive(Debug, Clone)]
pub struct Watchlist {
    entries: Vec<(Icao, String)>,
}

impl Watchlist {
    pub fn from_config(cfg: &WatchlistConfig) -> Result<Self> {
        if cfg.icao24_codes.is_empty() {
            return Err(WatchError::Config("no aircraft configured".into()));
        }
        let mut entries = Vec::with_capacity(cfg.icao24_codes.len());
        for (i, hex) in cfg.icao24_codes.iter().enumerate() {
            let icao =
                icao_from_hex(hex).ok_or_else(|| WatchError::InvalidIcao(hex.clone()))?;
            let tail = cfg
                .tail_numbers
                .get(i)
                .cloned()
                .unwrap_or_else(|| hex.to_uppercase());
            entries.push((icao, tail));
        }
        Ok(Watchlist { entries })
    }

    pub fn contains(&self, icao: &Icao) -> bool {
        self.entries.iter().any(|(i, _)| i == icao)
    }

    pub fn tail_for(&self, icao: &Icao) -> Option<&str> {
        self.entries
            .iter()
            .find(|(i, _)| i == icao)
            .map(|(_, t)| t.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Icao, String)> {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load and validate a config file. Any failure here is fatal to the
/// caller: a tracker with a bad config must not enter its poll loop.
pub fn load_config(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&text)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        Watchlist::from_config(&self.aircraft)?;
        if self.airspace.alert_distances_nm.is_empty() {
            return Err(WatchError::Config("no alert distances configured".into()));
        }
        self.notifications.quiet_hours.to_quiet_hours()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
