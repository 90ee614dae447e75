//! skywatch-core: pure watch logic for a fixed-watchlist aircraft monitor.
//!
//! No async, no I/O — just algorithms. This crate is the shared core used
//! by the `skywatch` daemon: great-circle geometry, the 3-D airspace test,
//! the per-aircraft state machine, notification gating, and configuration.

pub mod airspace;
pub mod config;
pub mod gate;
pub mod geo;
pub mod types;
pub mod watch;

// Re-export commonly used types at crate root
pub use airspace::{Airspace, Fix};
pub use config::{load_config, Config, Watchlist};
pub use gate::{NotificationGate, QuietHours};
pub use types::*;
pub use watch::{AircraftState, Watcher};
