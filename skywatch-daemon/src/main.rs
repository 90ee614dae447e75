//! skywatch: polls a live position feed for a fixed watchlist of aircraft
//! and raises approach/landing/takeoff notifications to webhook channels.

use std::collections::HashSet;
use std::path::PathBuf;
use std::process;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::Local;
use clap::Parser;
use tracing::{error, info, warn};

use skywatch_core::airspace::Airspace;
use skywatch_core::config::{load_config, Config, Watchlist};
use skywatch_core::gate::QuietHours;
use skywatch_core::types::{icao_to_string, WatchError};
use skywatch_core::watch::Watcher;

mod feed;
mod message;
mod webhook;

use feed::FeedClient;
use webhook::WebhookSender;

#[derive(Parser)]
#[command(name = "skywatch", version, about = "Watchlist aircraft monitor")]
struct Cli {
    /// Path to the JSON config file
    #[arg(env = "SKYWATCH_CONFIG", default_value = "tracker_config.json")]
    config: PathBuf,
}

fn now_epoch() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = match load_config(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!("config {}: {e}", cli.config.display());
            process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        error!("{e}");
        process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), WatchError> {
    // All fallible setup happens before the loop; nothing inside it is fatal.
    let watchlist = Watchlist::from_config(&config.aircraft)?;
    let quiet = config.notifications.quiet_hours.to_quiet_hours()?;

    let sender = WebhookSender::from_config(&config.integrations)
        .map_err(|e| WatchError::Config(format!("http client: {e}")))?;
    if sender.is_empty() {
        warn!("no webhook channels configured - notifications will not be sent");
    } else {
        info!("notifications enabled: {}", sender.channel_names().join(", "));
    }

    let airspace = config.airspace.volume.clone();
    let query_radius = config.airspace.query_radius_nm();
    let feed = FeedClient::new(airspace.center_lat, airspace.center_lon, query_radius)
        .map_err(|e| WatchError::Config(format!("http client: {e}")))?;

    let mut watcher = Watcher::new(
        airspace.clone(),
        &config.airspace.alert_distances_nm,
        config.notifications.cooldown_minutes,
    );

    info!("tracking {} aircraft:", watchlist.len());
    for (icao, tail) in watchlist.iter() {
        info!("  {} ({})", tail, icao_to_string(icao));
    }
    info!(
        "location: {} within {:.0}nm",
        config.airspace.name.as_deref().unwrap_or("airspace center"),
        query_radius
    );
    info!(
        "poll interval: {}s",
        config.monitoring.poll_interval_seconds
    );
    info!("tracker running, waiting for aircraft");

    let mut ticker = tokio::time::interval(Duration::from_secs(
        config.monitoring.poll_interval_seconds.max(1),
    ));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, shutting down");
                return Ok(());
            }
            _ = ticker.tick() => {
                run_tick(&feed, &watchlist, &airspace, &mut watcher, &quiet, &sender).await;
            }
        }
    }
}

/// One poll tick: fetch, evaluate every returned aircraft, infer over the
/// absent ones, deliver. Every failure in here degrades to a log line.
async fn run_tick(
    feed: &FeedClient,
    watchlist: &Watchlist,
    airspace: &Airspace,
    watcher: &mut Watcher,
    quiet: &QuietHours,
    sender: &WebhookSender,
) {
    let now = now_epoch();
    let raw = match feed.fetch().await {
        Ok(list) => list,
        Err(e) => {
            // No data this tick; every tracked aircraft counts as missing.
            warn!("feed fetch failed: {e}");
            Vec::new()
        }
    };

    let mut seen: HashSet<_> = HashSet::new();
    let mut events = Vec::new();

    for record in &raw {
        let Some(snap) = feed::normalize(record, watchlist) else {
            continue;
        };
        seen.insert(snap.icao);
        if let (Some(lat), Some(lon)) = (snap.latitude, snap.longitude) {
            let fix = airspace.evaluate(lat, lon, &snap);
            info!(
                "{} - {} - {} - {:.1}nm",
                snap.callsign,
                if fix.in_airspace { "IN RANGE" } else { "Outside" },
                if snap.on_ground { "On Ground" } else { "Airborne" },
                fix.distance_nm
            );
        }
        events.extend(watcher.observe(&snap, now));
    }
    if seen.is_empty() {
        info!("no tracked aircraft found");
    }

    events.extend(watcher.sweep_missing(&seen, now));

    for event in &events {
        let local = Local::now();
        let text = message::render(event, &local.format("%H:%M").to_string());
        if quiet.is_quiet(local.time()) {
            info!(
                "quiet hours, suppressed: {}",
                text.lines().next().unwrap_or_default()
            );
            continue;
        }
        if !sender.send(&text).await && !sender.is_empty() {
            warn!(
                "all webhook channels failed: {}",
                text.lines().next().unwrap_or_default()
            );
        }
    }
}
